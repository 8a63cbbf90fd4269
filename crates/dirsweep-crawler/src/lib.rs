//! Dirsweep Crawler - adaptive query expansion over a directory.
//!
//! Combines a [`RecordSource`](dirsweep_source::RecordSource) with a
//! [`PersistenceSink`](dirsweep_store::PersistenceSink) and drives a single,
//! sequential crawl from a list of seed queries.
//!
//! ```ignore
//! let crawler = Crawler::from_config(source, sink, &config.crawl);
//! let summary = crawler.run(definition.seeds()).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod crawler;
pub mod summary;

pub use crawler::{Crawler, DEFAULT_DELAY};
pub use summary::CrawlSummary;
