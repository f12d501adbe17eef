//! Lookup command: check article existence without extraction.

use console::style;

use wikilinker::config::Config;
use wikilinker::resolver::{ReferenceResolver, WikiResolver};
use wikilinker::Keyword;

use super::helpers::truncate;
use crate::cli::icons::{error, success, warning};

/// Look up each keyword and print the outcome.
pub async fn cmd_lookup(config: &Config, keywords: &[String]) -> anyhow::Result<()> {
    let resolver = WikiResolver::new(config.wiki.clone())?;

    for raw in keywords {
        let Some(keyword) = Keyword::parse(raw) else {
            eprintln!("{} Skipping blank keyword", warning());
            continue;
        };

        match resolver.resolve(&keyword).await {
            Ok(Some(url)) => println!("{} {} {}", success(), keyword, style(url).dim()),
            Ok(None) => println!("{} {} (no article)", error(), keyword),
            Err(degraded) => println!(
                "{} {} (lookup failed: {})",
                warning(),
                keyword,
                truncate(&degraded.reason, 80)
            ),
        }
    }

    Ok(())
}
