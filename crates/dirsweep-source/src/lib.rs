//! Dirsweep Source - directory targets and the query seam used by the crawler.
//!
//! A target is one institutional people directory. This crate describes
//! targets ([`definition`]), loads extra ones from TOML ([`loader`]), keeps
//! them in a [`TargetRegistry`], and turns a definition into a
//! [`RecordSource`] that answers prefix queries.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): target metadata, seeds and search method
//! - **Loader** ([`loader`]): recursive TOML loading from a definitions directory
//! - **Registry** ([`registry`]): built-in targets plus loaded overrides
//! - **Sources** ([`json_api`], [`html_form`]): HTTP implementations of [`RecordSource`]
//! - **Errors** ([`error`]): per-query and per-definition error types
//!
//! # Example
//!
//! ```rust
//! use dirsweep_core::{HttpConfig, TargetId};
//! use dirsweep_source::{source_for, TargetRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TargetRegistry::with_builtins();
//! let definition = registry.get(&TargetId::new("trinity")?)?;
//!
//! assert_eq!(definition.seeds().len(), 676);
//! let _source = source_for(&definition, &HttpConfig::default())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod definition;
pub mod error;
pub mod html_form;
pub mod json_api;
pub mod loader;
pub mod parser;
pub mod registry;
pub mod source;

// Re-export commonly used types
pub use client::{build_client, source_for};
pub use definition::{
    builtin_definitions, EntrySelectors, SearchMethod, SeedStrategy, TargetDefinition,
    TargetMetadata,
};
pub use error::{Result, SourceError, TargetError, TargetResult};
pub use html_form::HtmlFormSource;
pub use json_api::{DirectoryPerson, JsonApiSource};
pub use loader::TargetLoader;
pub use parser::{ListingParser, ParsedPage};
pub use registry::TargetRegistry;
pub use source::RecordSource;
