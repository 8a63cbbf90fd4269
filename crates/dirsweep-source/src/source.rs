//! The query seam between the crawler and a directory.

use crate::error::Result;
use async_trait::async_trait;
use dirsweep_core::{Query, Record};

/// Anything that can answer a prefix query with a list of records.
///
/// Implementations classify their own failures: a truncated answer must come
/// back as [`SourceError::TooMany`](crate::SourceError::TooMany). Whether no
/// matches is [`SourceError::Empty`](crate::SourceError::Empty) or an empty
/// `Ok` depends on the directory.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Run one query.
    async fn query(&self, query: &Query) -> Result<Vec<Record>>;
}
