//! Dirsweep Store
//!
//! File-backed persistence for crawl output. Two collections are kept per
//! target: the cumulative result collection and the request log. Both are
//! JSON arrays that are read, extended and rewritten on every append, so a
//! crash between queries loses nothing that was already stored.
//!
//! # Example
//!
//! ```ignore
//! use dirsweep_store::{FileSink, PersistenceSink};
//!
//! let sink = FileSink::new("data/results.json", "data/requests_log.json");
//! sink.append_results(&records).await?;
//! ```
//!
//! # Design Principles
//!
//! - Writes go through a temporary sibling and a rename, never in place
//! - Unknown fields in existing files survive rewrites
//! - One crawler process per target directory; there is no file locking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod collection;
pub mod dedupe;
pub mod error;
pub mod sink;

// Re-export commonly used types
pub use collection::JsonCollection;
pub use dedupe::{dedupe, filter_collection, FilterReport};
pub use error::{Result, StoreError};
pub use sink::{FileSink, MemorySink, PersistenceSink};
