//! Encyclopedia article lookup.
//!
//! A resolver answers one question per keyword: is there an article for it,
//! and if so, where. Failures are per keyword and never abort a run.

mod config;
mod wiki;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::keyword::Keyword;

pub use config::WikiConfig;
pub use wiki::{encode_title, WikiResolver};

/// A backend that maps keywords to canonical article URLs.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Returns `Ok(Some(url))` when an article exists, `Ok(None)` when it
    /// does not, and `Err` when the check itself could not be completed.
    async fn resolve(&self, keyword: &Keyword) -> Result<Option<Url>, ResolutionDegraded>;
}

/// A lookup that could not be completed. Callers treat it as "no article"
/// for this keyword only.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("lookup for '{keyword}' failed: {reason}")]
pub struct ResolutionDegraded {
    pub keyword: String,
    pub reason: String,
}

impl ResolutionDegraded {
    pub fn new(keyword: &Keyword, reason: impl Into<String>) -> Self {
        Self {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}
