//! Extract → resolve → annotate.
//!
//! Two failure tiers: missing credentials and extraction failures abort the
//! run, while a failed article lookup only costs that keyword its link.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::annotation::{annotate, AnnotationReport, ReportStatus, ResolvedLink};
use crate::keyword::Keyword;
use crate::llm::{KeywordExtractor, LlmError};
use crate::resolver::{ReferenceResolver, ResolutionDegraded};

/// Default bound on concurrent article lookups.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Input of one pipeline invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    /// API key for the language model; falls back to the configured default.
    #[serde(default)]
    pub credentials: Option<String>,
}

impl GenerateRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<String>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No API key available. Please enter your API key.")]
    MissingCredential,

    #[error("Keyword extraction failed: {0}")]
    ExtractionFailed(String),
}

impl From<LlmError> for PipelineError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential => PipelineError::MissingCredential,
            other => PipelineError::ExtractionFailed(other.to_string()),
        }
    }
}

/// Lookup outcomes for the distinct keywords of one run.
#[derive(Debug, Default)]
pub struct Resolutions {
    urls: HashMap<Keyword, Url>,
    /// Resolved keywords in first-seen order.
    pub links: Vec<ResolvedLink>,
    pub degraded: Vec<ResolutionDegraded>,
}

impl Resolutions {
    pub fn url_for(&self, keyword: &Keyword) -> Option<&Url> {
        self.urls.get(keyword)
    }
}

/// The keyword-to-link pipeline.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn KeywordExtractor>,
    resolver: Arc<dyn ReferenceResolver>,
    default_api_key: Option<String>,
    max_concurrent_lookups: usize,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn KeywordExtractor>, resolver: Arc<dyn ReferenceResolver>) -> Self {
        Self {
            extractor,
            resolver,
            default_api_key: None,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Credential used when a request carries none.
    pub fn with_default_api_key(mut self, api_key: Option<String>) -> Self {
        self.default_api_key = api_key;
        self
    }

    pub fn with_max_concurrent_lookups(mut self, n: usize) -> Self {
        self.max_concurrent_lookups = n.max(1);
        self
    }

    /// Pick the request credential if non-blank, else the default.
    fn credential_for<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested
            .filter(|k| !k.trim().is_empty())
            .or(self.default_api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Extract keywords only.
    pub async fn extract(
        &self,
        text: &str,
        credentials: Option<&str>,
    ) -> Result<Vec<Keyword>, PipelineError> {
        let api_key = self
            .credential_for(credentials)
            .ok_or(PipelineError::MissingCredential)?;
        Ok(self.extractor.extract(text, api_key).await?)
    }

    /// Look up each distinct keyword once, with bounded concurrency.
    ///
    /// Completion order does not matter: outcomes are keyed by keyword.
    pub async fn resolve_all(&self, keywords: &[Keyword]) -> Resolutions {
        let mut distinct: Vec<Keyword> = Vec::new();
        for keyword in keywords {
            if !distinct.contains(keyword) {
                distinct.push(keyword.clone());
            }
        }

        let resolver = &self.resolver;
        let mut outcomes: HashMap<Keyword, Result<Option<Url>, ResolutionDegraded>> =
            stream::iter(distinct.iter().cloned())
                .map(|keyword| async move {
                    let outcome = resolver.resolve(&keyword).await;
                    (keyword, outcome)
                })
                .buffer_unordered(self.max_concurrent_lookups)
                .collect()
                .await;

        let total = distinct.len();
        let mut resolutions = Resolutions::default();
        for keyword in distinct {
            match outcomes.remove(&keyword) {
                Some(Ok(Some(url))) => {
                    resolutions.urls.insert(keyword.clone(), url.clone());
                    resolutions.links.push(ResolvedLink { keyword, url });
                }
                Some(Ok(None)) | None => {
                    debug!("No article for '{}'", keyword);
                }
                Some(Err(degraded)) => {
                    warn!("{}", degraded);
                    resolutions.degraded.push(degraded);
                }
            }
        }

        info!(
            "Resolved {} of {} distinct keywords ({} lookups failed)",
            resolutions.links.len(),
            total,
            resolutions.degraded.len()
        );
        resolutions
    }

    /// Run the full pipeline on one request.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<AnnotationReport, PipelineError> {
        if request.text.trim().is_empty() {
            debug!("Empty input, nothing to annotate");
            return Ok(AnnotationReport::unchanged(&request.text));
        }

        let keywords = self
            .extract(&request.text, request.credentials.as_deref())
            .await?;
        let resolutions = self.resolve_all(&keywords).await;

        let annotated_text = annotate(&request.text, &keywords, |keyword| {
            resolutions.url_for(keyword).cloned()
        });

        Ok(AnnotationReport {
            status: ReportStatus::Annotated,
            annotated_text,
            keywords,
            links: resolutions.links,
            degraded: resolutions.degraded,
        })
    }
}
