//! HTTP request handlers for the annotation API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::AppState;
use crate::services::{GenerateRequest, PipelineError};

/// Errors surfaced to HTTP callers as `{ "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    /// A newer request started before this one finished.
    Superseded,
    NoResult,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::MissingCredential) => StatusCode::UNAUTHORIZED,
            ApiError::Pipeline(PipelineError::ExtractionFailed(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Superseded => StatusCode::CONFLICT,
            ApiError::NoResult => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Pipeline(e) => e.to_string(),
            ApiError::Superseded => "Superseded by a newer request".to_string(),
            ApiError::NoResult => "No text to copy".to_string(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Run the pipeline on `{text, credentials}` and publish the result.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    let ticket = state.latest.begin();
    let outcome = state.pipeline.generate(&request).await;

    match outcome {
        Ok(report) => {
            if !state.latest.publish(ticket, report.clone()) {
                tracing::debug!("Discarding superseded result (ticket {})", ticket);
                return Err(ApiError::Superseded);
            }
            Ok(Json(report).into_response())
        }
        Err(e) => {
            if !state.latest.is_current(ticket) {
                return Err(ApiError::Superseded);
            }
            tracing::warn!("Generate failed: {}", e);
            Err(e.into())
        }
    }
}

/// The last published annotated text, for copying.
pub async fn latest_result(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.latest.get() {
        Some(report) if !report.annotated_text.is_empty() => {
            Ok(Json(json!({ "annotatedText": report.annotated_text })).into_response())
        }
        _ => Err(ApiError::NoResult),
    }
}
