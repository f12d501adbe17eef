//! wikilinker - annotate prose with encyclopedia links.
//!
//! Keywords are extracted from the text by a language model, each keyword is
//! checked against an encyclopedia, and every whole-word occurrence of a
//! keyword with an article is rewritten as a markdown link.

pub mod config;
pub mod keyword;
pub mod llm;
pub mod resolver;
pub mod server;
pub mod services;

pub use keyword::Keyword;
pub use services::{
    annotate, strip_links, AnnotationReport, GenerateRequest, Pipeline, PipelineError,
    ReportStatus, ResolvedLink,
};
