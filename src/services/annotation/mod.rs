//! Text annotation: rewriting keyword occurrences as markdown links.

mod annotator;
mod matcher;
mod types;

pub use annotator::{annotate, strip_links};
pub use types::{AnnotationReport, ReportStatus, ResolvedLink};
