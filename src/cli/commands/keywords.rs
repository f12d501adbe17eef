//! Keywords command: extraction only.

use wikilinker::config::Config;
use wikilinker::PipelineError;

use crate::cli::icons::warning;

/// Print the extracted keywords, one per line, in extraction order.
pub async fn cmd_keywords(config: &Config, input: &str, api_key: Option<&str>) -> anyhow::Result<()> {
    if input.trim().is_empty() {
        eprintln!("{} No text to extract keywords from", warning());
        return Ok(());
    }

    let pipeline = config.build_pipeline()?;
    let keywords = match pipeline.extract(input, api_key).await {
        Ok(keywords) => keywords,
        Err(PipelineError::MissingCredential) => {
            anyhow::bail!("{}", config.llm.credential_hint());
        }
        Err(e) => return Err(e.into()),
    };

    for keyword in &keywords {
        println!("{}", keyword);
    }
    tracing::info!("Extracted {} keywords", keywords.len());

    Ok(())
}
