//! Configuration display command.

use console::style;

use wikilinker::config::Config;

use crate::cli::icons::{success, warning};

/// Print the effective configuration. The API key is never printed.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", success(), path.display()),
        None => eprintln!(
            "{} No config file found, using defaults and environment",
            warning()
        ),
    }

    println!("{}", serde_json::to_string_pretty(config)?);

    let key_state = if config.llm.default_api_key().is_some() {
        style("set").green()
    } else {
        style("not set").yellow()
    };
    eprintln!("  {} API key: {}", style("→").dim(), key_state);

    Ok(())
}
