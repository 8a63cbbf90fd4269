//! Dirsweep Core - Foundation crate for the Dirsweep directory crawler.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Dirsweep crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Query`, `TargetId`, `Record`, `AuditEntry`)
//!
//! # Example
//!
//! ```rust
//! use dirsweep_core::{AppConfig, Query};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.crawl.delay_ms, 500);
//!
//! let seed = Query::new("a")?;
//! assert_eq!(seed.children()[0].as_str(), "aa");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CrawlConfig, HttpConfig, StorageConfig, TargetsConfig};
pub use error::{ConfigError, ConfigResult, Result, SweepError};
pub use types::{AuditEntry, AuditStatus, ErrorKind, Query, Record, TargetId, Timestamp, ALPHABET};
