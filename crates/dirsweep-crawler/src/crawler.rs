//! Query expansion crawler.
//!
//! The crawler walks a directory's keyspace with prefix queries. A query the
//! directory reports as truncated is replaced by its 26 one-letter extensions,
//! pushed to the front of the work queue so the subtree is finished before any
//! earlier sibling. Every outcome is written to the request log and each query
//! is followed by a fixed pause.

use crate::summary::CrawlSummary;
use dirsweep_core::{AuditEntry, CrawlConfig, ErrorKind, Query};
use dirsweep_source::RecordSource;
use dirsweep_store::PersistenceSink;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pause after each query unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Sequential, depth-first crawler over one record source.
pub struct Crawler {
    /// Directory being crawled
    source: Arc<dyn RecordSource>,
    /// Result and request log storage
    sink: Arc<dyn PersistenceSink>,
    /// Pause after every query
    delay: Duration,
    /// Truncated queries of this length are not expanded
    max_query_len: Option<usize>,
}

impl Crawler {
    /// Create a crawler with the default delay and no length cap.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, sink: Arc<dyn PersistenceSink>) -> Self {
        Self {
            source,
            sink,
            delay: DEFAULT_DELAY,
            max_query_len: None,
        }
    }

    /// Create a crawler using the pacing and cap from configuration.
    #[must_use]
    pub fn from_config(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn PersistenceSink>,
        config: &CrawlConfig,
    ) -> Self {
        Self::new(source, sink)
            .with_delay(Duration::from_millis(config.delay_ms))
            .with_max_query_len(config.max_query_len)
    }

    /// Set the pause after each query.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set or clear the expansion cap.
    #[must_use]
    pub fn with_max_query_len(mut self, max_query_len: Option<usize>) -> Self {
        self.max_query_len = max_query_len;
        self
    }

    /// Crawl until the work queue is empty.
    ///
    /// No query failure ends the run early.
    pub async fn run(&self, seeds: Vec<Query>) -> CrawlSummary {
        let mut queue: VecDeque<Query> = seeds.into();
        let mut summary = CrawlSummary::default();

        info!(seeds = queue.len(), "crawl started");

        while let Some(query) = queue.pop_front() {
            debug!(query = %query, remaining = queue.len(), "querying");
            summary.queries += 1;

            self.process(&query, &mut queue, &mut summary).await;

            tokio::time::sleep(self.delay).await;
        }

        info!(
            queries = summary.queries,
            ok = summary.ok,
            too_many = summary.too_many,
            capped = summary.capped,
            empty = summary.empty,
            sink_failures = summary.sink_failures,
            unknown = summary.unknown,
            audit_failures = summary.audit_failures,
            records = summary.records_persisted,
            "crawl complete"
        );

        summary
    }

    async fn process(
        &self,
        query: &Query,
        queue: &mut VecDeque<Query>,
        summary: &mut CrawlSummary,
    ) {
        let records = match self.source.query(query).await {
            Ok(records) => records,
            Err(e) => {
                let kind = e.kind();
                match kind {
                    ErrorKind::TooMany => self.expand(query, queue, summary),
                    _ => warn!(query = %query, kind = %kind, error = %e, "query failed"),
                }
                summary.record_error(kind);
                self.audit(AuditEntry::error(query, kind), summary).await;
                return;
            }
        };

        let count = records.len();
        match self.sink.append_results(&records).await {
            Ok(()) => {
                info!(query = %query, count, "records saved");
                summary.record_ok(count);
                self.audit(AuditEntry::ok(query, count), summary).await;
            }
            Err(e) => {
                error!(query = %query, count, error = %e, "failed to save results");
                summary.record_error(ErrorKind::SinkFailure);
                self.audit(AuditEntry::error(query, ErrorKind::SinkFailure), summary)
                    .await;
            }
        }
    }

    fn expand(&self, query: &Query, queue: &mut VecDeque<Query>, summary: &mut CrawlSummary) {
        if let Some(max) = self.max_query_len.filter(|&max| query.len() >= max) {
            warn!(
                query = %query,
                max_query_len = max,
                "too many matches at length cap, not expanding"
            );
            summary.capped += 1;
            return;
        }

        // Reverse so the front of the queue ends up as query + 'a'.
        for child in query.children().into_iter().rev() {
            queue.push_front(child);
        }
        info!(query = %query, "too many matches, expanding");
    }

    async fn audit(&self, entry: AuditEntry, summary: &mut CrawlSummary) {
        let request = entry.request.clone();
        if let Err(e) = self.sink.append_audit(entry).await {
            error!(query = %request, error = %e, "failed to save request log");
            summary.audit_failures += 1;
        }
    }
}
