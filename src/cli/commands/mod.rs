//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod annotate;
mod config_cmd;
mod helpers;
mod keywords;
mod lookup;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wikilinker::config::Config;

#[derive(Parser)]
#[command(name = "wikilinker")]
#[command(about = "Annotate text with links to encyclopedia articles")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract keywords, look them up and print the linked text
    Annotate {
        /// Input file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
        /// Annotate this text instead of reading a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// API key for the language model (overrides the configured key)
        #[arg(long, env = "WIKILINKER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract keywords only
    Keywords {
        /// Input file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
        /// Use this text instead of reading a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// API key for the language model (overrides the configured key)
        #[arg(long, env = "WIKILINKER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Check whether articles exist for the given keywords
    Lookup {
        /// Keywords to look up
        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// Start the HTTP API
    Serve {
        /// Address to bind: port, host, or host:port (default from config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_with(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Annotate {
            file,
            text,
            api_key,
            output,
            json,
        } => {
            let input = helpers::read_input(file.as_deref(), text).await?;
            annotate::cmd_annotate(&config, input, api_key, output.as_deref(), json).await
        }
        Commands::Keywords {
            file,
            text,
            api_key,
        } => {
            let input = helpers::read_input(file.as_deref(), text).await?;
            keywords::cmd_keywords(&config, &input, api_key.as_deref()).await
        }
        Commands::Lookup { keywords } => lookup::cmd_lookup(&config, &keywords).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve::cmd_serve(&config, &bind).await
        }
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
