//! Annotate command: the full extract → lookup → link pipeline.

use std::path::Path;

use console::style;

use wikilinker::config::Config;
use wikilinker::{GenerateRequest, PipelineError, ReportStatus};

use crate::cli::icons::{arrow, success, warning};

/// Annotate `input` and print (or write) the result.
pub async fn cmd_annotate(
    config: &Config,
    input: String,
    api_key: Option<String>,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let pipeline = config.build_pipeline()?;
    let request = GenerateRequest::new(input).with_credentials(api_key);

    let report = match pipeline.generate(&request).await {
        Ok(report) => report,
        Err(PipelineError::MissingCredential) => {
            anyhow::bail!("{}", config.llm.credential_hint());
        }
        Err(e) => return Err(e.into()),
    };

    let rendered = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.annotated_text.clone()
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, &rendered).await?;
            eprintln!("{} Wrote {}", success(), path.display());
        }
        None => println!("{}", rendered),
    }

    if report.status == ReportStatus::EmptyInput {
        eprintln!("{} No text to annotate", warning());
        return Ok(());
    }

    eprintln!(
        "{} {} keywords, {} linked",
        arrow(),
        report.keywords.len(),
        style(report.links.len()).green()
    );
    for degraded in &report.degraded {
        eprintln!(
            "  {} Lookup failed for '{}': {}",
            warning(),
            degraded.keyword,
            style(&degraded.reason).dim()
        );
    }

    Ok(())
}
