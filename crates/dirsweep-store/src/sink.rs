//! Persistence sinks the crawler writes to.

use crate::collection::JsonCollection;
use crate::error::Result;
use async_trait::async_trait;
use dirsweep_core::{AuditEntry, Record, StorageConfig, TargetId};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Destination for discovered records and the per-query request log.
///
/// Both operations append; neither ever drops what an earlier call stored.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Append records to the result collection.
    async fn append_results(&self, records: &[Record]) -> Result<()>;

    /// Append one request log entry, stamped with the current time.
    async fn append_audit(&self, entry: AuditEntry) -> Result<()>;
}

/// Sink backed by two JSON array files.
#[derive(Debug, Clone)]
pub struct FileSink {
    results: JsonCollection,
    audit: JsonCollection,
}

impl FileSink {
    /// Create a sink writing to explicit paths.
    #[must_use]
    pub fn new(results_path: impl Into<PathBuf>, audit_path: impl Into<PathBuf>) -> Self {
        Self {
            results: JsonCollection::new(results_path),
            audit: JsonCollection::new(audit_path),
        }
    }

    /// Create a sink for one target under the configured data directory.
    #[must_use]
    pub fn for_target(storage: &StorageConfig, target_id: &TargetId) -> Self {
        Self::new(
            storage.results_path(target_id.as_str()),
            storage.audit_path(target_id.as_str()),
        )
    }

    /// Result collection file.
    #[must_use]
    pub fn results_path(&self) -> &Path {
        self.results.path()
    }

    /// Request log file.
    #[must_use]
    pub fn audit_path(&self) -> &Path {
        self.audit.path()
    }

    /// Load every record persisted so far.
    pub async fn load_results(&self) -> Result<Vec<Record>> {
        self.results.load().await
    }

    /// Load the full request log.
    pub async fn load_audit(&self) -> Result<Vec<AuditEntry>> {
        self.audit.load().await
    }
}

#[async_trait]
impl PersistenceSink for FileSink {
    async fn append_results(&self, records: &[Record]) -> Result<()> {
        let total = self.results.append(records).await?;
        debug!(added = records.len(), total, "results appended");
        Ok(())
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<()> {
        self.audit.append(&[entry.stamped()]).await?;
        Ok(())
    }
}

/// Sink that keeps everything in memory, for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<Record>>,
    audit: Mutex<Vec<AuditEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored records.
    #[must_use]
    pub fn results(&self) -> Vec<Record> {
        self.results
            .lock()
            .expect("acquire lock on results")
            .clone()
    }

    /// Snapshot of the stored request log.
    #[must_use]
    pub fn audit(&self) -> Vec<AuditEntry> {
        self.audit.lock().expect("acquire lock on audit").clone()
    }
}

#[async_trait]
impl PersistenceSink for MemorySink {
    async fn append_results(&self, records: &[Record]) -> Result<()> {
        self.results
            .lock()
            .expect("acquire lock on results")
            .extend_from_slice(records);
        Ok(())
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<()> {
        self.audit
            .lock()
            .expect("acquire lock on audit")
            .push(entry.stamped());
        Ok(())
    }
}
