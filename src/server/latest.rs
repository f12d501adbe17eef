//! Last-request-wins slot for the most recent annotation.
//!
//! Each generate call takes a ticket before running the pipeline. Only the
//! holder of the newest ticket may publish; older calls that finish late
//! are discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::services::AnnotationReport;

pub struct LatestResult {
    newest: AtomicU64,
    report: RwLock<Option<AnnotationReport>>,
}

impl LatestResult {
    pub fn new() -> Self {
        Self {
            newest: AtomicU64::new(0),
            report: RwLock::new(None),
        }
    }

    /// Claim a ticket, superseding every earlier one.
    pub fn begin(&self) -> u64 {
        self.newest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether no newer request has started since `ticket` was taken.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.newest.load(Ordering::SeqCst) == ticket
    }

    /// Store `report` if `ticket` is still the newest. Returns false when
    /// the report was discarded.
    pub fn publish(&self, ticket: u64, report: AnnotationReport) -> bool {
        let Ok(mut guard) = self.report.write() else {
            return false;
        };
        if !self.is_current(ticket) {
            return false;
        }
        *guard = Some(report);
        true
    }

    /// The last published report, if any.
    pub fn get(&self) -> Option<AnnotationReport> {
        self.report.read().ok().and_then(|guard| guard.clone())
    }
}

impl Default for LatestResult {
    fn default() -> Self {
        Self::new()
    }
}
