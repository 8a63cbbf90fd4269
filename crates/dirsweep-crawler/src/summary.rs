//! Per-run outcome counters.

use dirsweep_core::ErrorKind;
use serde::Serialize;

/// Counts reported when a crawl finishes.
///
/// Purely informational; nothing in the crawl loop reads it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Queries sent to the source
    pub queries: usize,
    /// Queries whose records were persisted
    pub ok: usize,
    /// Truncated queries, expanded or capped
    pub too_many: usize,
    /// Truncated queries left unexpanded by the length cap
    pub capped: usize,
    /// Queries with no matches
    pub empty: usize,
    /// Queries whose records could not be persisted
    pub sink_failures: usize,
    /// Queries that failed for any other reason
    pub unknown: usize,
    /// Request log entries that could not be written
    pub audit_failures: usize,
    /// Records appended to the result collection
    pub records_persisted: usize,
}

impl CrawlSummary {
    /// Count one failed query.
    pub fn record_error(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::TooMany => self.too_many += 1,
            ErrorKind::Empty => self.empty += 1,
            ErrorKind::SinkFailure => self.sink_failures += 1,
            ErrorKind::Unknown => self.unknown += 1,
        }
    }

    /// Count one persisted query.
    pub fn record_ok(&mut self, count: usize) {
        self.ok += 1;
        self.records_persisted += count;
    }
}
