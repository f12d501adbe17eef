//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/result", get(handlers::latest_result))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
