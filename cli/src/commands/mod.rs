//! Subcommand handlers.

pub mod crawl;
pub mod filter;
pub mod targets;
