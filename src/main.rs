//! wikilinker - annotate prose with encyclopedia links.
//!
//! Command-line entry point for the annotation pipeline and its HTTP API.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "wikilinker=info"
    } else {
        "wikilinker=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run().await
}
