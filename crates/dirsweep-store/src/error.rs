//! Store error types.
//!
//! Every variant carries the path it concerns so that a failed append can be
//! reported without further context.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence-specific errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the directory holding a collection.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an existing collection.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Collection file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Existing collection is not a JSON array.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Collection file
        path: PathBuf,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Failed to encode items for writing.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write or replace a collection.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Collection file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Collection path has no parent directory or file name.
    #[error("invalid collection path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
