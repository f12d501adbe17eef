//! Types shared across the annotation pipeline.

use serde::Serialize;
use url::Url;

use crate::keyword::Keyword;
use crate::resolver::ResolutionDegraded;

/// A keyword paired with a confirmed article URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub keyword: Keyword,
    pub url: Url,
}

/// How a pipeline invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
    /// Keywords were extracted and applied.
    Annotated,
    /// No text was supplied; the input is returned unchanged.
    EmptyInput,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    pub status: ReportStatus,
    pub annotated_text: String,
    /// Keywords in extraction order, duplicates included.
    pub keywords: Vec<Keyword>,
    /// Distinct keywords that resolved, in first-seen order.
    pub links: Vec<ResolvedLink>,
    /// Lookups that failed and were treated as "no article".
    pub degraded: Vec<ResolutionDegraded>,
}

impl AnnotationReport {
    /// Report for input that needed no work.
    pub fn unchanged(text: &str) -> Self {
        Self {
            status: ReportStatus::EmptyInput,
            annotated_text: text.to_string(),
            keywords: Vec::new(),
            links: Vec::new(),
            degraded: Vec::new(),
        }
    }
}
