//! Service layer for wikilinker business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by CLI, web server, or other interfaces.

pub mod annotation;
pub mod pipeline;

pub use annotation::{annotate, strip_links, AnnotationReport, ReportStatus, ResolvedLink};
pub use pipeline::{GenerateRequest, Pipeline, PipelineError, Resolutions};
