//! `dirsweep targets`.

use crate::state::AppState;
use dirsweep_source::{SearchMethod, TargetDefinition};
use serde::Serialize;
use std::fmt;

/// One line of the target listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    /// Target ID
    pub id: String,
    /// Institution name
    pub name: String,
    /// `json-api` or `html-form`
    pub method: &'static str,
    /// Number of seed queries
    pub seeds: usize,
}

impl From<&TargetDefinition> for TargetSummary {
    fn from(def: &TargetDefinition) -> Self {
        let method = match def.search {
            SearchMethod::JsonApi { .. } => "json-api",
            SearchMethod::HtmlForm { .. } => "html-form",
        };

        Self {
            id: def.id().to_string(),
            name: def.name().to_string(),
            method,
            seeds: def.seeds().len(),
        }
    }
}

impl fmt::Display for TargetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<10} {:>4} seeds  {}",
            self.id, self.method, self.seeds, self.name
        )
    }
}

/// All configured targets, sorted by ID.
#[must_use]
pub fn list_targets(state: &AppState) -> Vec<TargetSummary> {
    state
        .registry
        .all()
        .iter()
        .map(TargetSummary::from)
        .collect()
}
