//! Error types for record sources and target definitions.

use dirsweep_core::ErrorKind;
use thiserror::Error;

/// Failure of a single query against a directory.
///
/// Each variant maps to exactly one [`ErrorKind`]; the crawler never looks at
/// the message text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The directory reported more matches than it will list.
    #[error("too many matches for '{query}'")]
    TooMany {
        /// Query that was truncated
        query: String,
    },

    /// The directory returned no matches.
    #[error("no matches for '{query}'")]
    Empty {
        /// Query that matched nothing
        query: String,
    },

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The directory answered with a non-success status.
    #[error("unexpected HTTP status {status} for '{query}'")]
    Status {
        /// Query that was sent
        query: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be interpreted.
    #[error("failed to decode response for '{query}': {reason}")]
    Decode {
        /// Query that was sent
        query: String,
        /// What went wrong
        reason: String,
    },
}

impl SourceError {
    /// Classification used by the crawler and written to the request log.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooMany { .. } => ErrorKind::TooMany,
            Self::Empty { .. } => ErrorKind::Empty,
            Self::Http(_) | Self::Status { .. } | Self::Decode { .. } => ErrorKind::Unknown,
        }
    }
}

/// Errors that can occur while loading or using target definitions.
#[derive(Error, Debug)]
pub enum TargetError {
    /// Target definition not found
    #[error("target definition not found: {target_id}")]
    NotFound {
        /// The target ID that was not found
        target_id: String,
    },

    /// Failed to parse target definition TOML
    #[error("failed to parse target definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid target definition (validation failed)
    #[error("invalid target definition for {target_id}: {reason}")]
    ValidationError {
        /// Target ID being validated
        target_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Target definition directory not found
    #[error("target definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// Failed to build the HTTP client for a target
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// I/O error while accessing target definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for queries.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Result type for target definition operations.
pub type TargetResult<T> = std::result::Result<T, TargetError>;
