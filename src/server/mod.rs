//! HTTP API for annotating text.
//!
//! - `POST /api/generate` runs the pipeline on `{text, credentials}`
//! - `GET /api/result` returns the last published annotated text

mod handlers;
mod latest;
mod routes;

pub use handlers::ApiError;
pub use latest::LatestResult;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::services::Pipeline;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub latest: Arc<LatestResult>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            latest: Arc::new(LatestResult::new()),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.build_pipeline()?))
    }
}

/// Start the web server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
