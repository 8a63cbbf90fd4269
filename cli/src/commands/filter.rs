//! `dirsweep filter`.

use crate::state::AppState;
use anyhow::Context;
use dirsweep_store::{filter_collection, FilterReport, JsonCollection};

/// Dedupe a target's result collection into its filtered file.
pub async fn filter(state: &AppState, target: &str) -> anyhow::Result<FilterReport> {
    let definition = state.target(target)?;
    let storage = &state.config.storage;
    let id = definition.id().as_str();

    let results = JsonCollection::new(storage.results_path(id));
    let output = JsonCollection::new(storage.filtered_path(id));

    filter_collection(&results, &output, &definition.target.dedupe_key)
        .await
        .with_context(|| format!("failed to filter results for {id}"))
}
