//! `dirsweep crawl`.

use crate::state::AppState;
use anyhow::Context;
use dirsweep_core::Query;
use dirsweep_crawler::{CrawlSummary, Crawler};
use dirsweep_source::source_for;
use std::sync::Arc;

/// Command-line adjustments to a crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Seed queries; empty means the target's own seed set
    pub seeds: Vec<String>,
    /// Overrides `crawl.delay_ms`
    pub delay_ms: Option<u64>,
    /// Overrides `crawl.max_query_len`
    pub max_query_len: Option<usize>,
}

/// Run a full crawl of `target`.
pub async fn crawl(
    state: &AppState,
    target: &str,
    options: CrawlOptions,
) -> anyhow::Result<CrawlSummary> {
    let definition = state.target(target)?;

    let mut crawl_config = state.config.crawl.clone();
    if let Some(delay_ms) = options.delay_ms {
        crawl_config.delay_ms = delay_ms;
    }
    if options.max_query_len.is_some() {
        crawl_config.max_query_len = options.max_query_len;
    }
    let mut config = state.config.clone();
    config.crawl = crawl_config;
    config.validate().context("invalid crawl options")?;

    let seeds = resolve_seeds(&options.seeds)?.unwrap_or_else(|| definition.seeds());

    let source = source_for(&definition, &config.http)
        .with_context(|| format!("failed to set up source for {}", definition.id()))?;
    let sink = Arc::new(state.sink_for(definition.id()));

    tracing::info!(
        target_id = %definition.id(),
        name = definition.name(),
        results = %sink.results_path().display(),
        "starting crawl"
    );

    let crawler = Crawler::from_config(source, sink, &config.crawl);
    Ok(crawler.run(seeds).await)
}

/// Parse explicit seeds; `None` when there are none.
pub fn resolve_seeds(seeds: &[String]) -> anyhow::Result<Option<Vec<Query>>> {
    if seeds.is_empty() {
        return Ok(None);
    }

    let queries = seeds
        .iter()
        .map(|seed| Query::new(seed.as_str()).with_context(|| format!("invalid seed '{seed}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Some(queries))
}
