//! In-memory target definition registry.

use crate::{
    definition::{builtin_definitions, TargetDefinition},
    error::{TargetError, TargetResult},
    loader::TargetLoader,
};
use dirsweep_core::TargetId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// In-memory cache of target definitions.
///
/// Starts with the built-in targets. Definitions loaded from disk replace a
/// built-in with the same ID.
#[derive(Clone)]
pub struct TargetRegistry {
    definitions: Arc<RwLock<HashMap<TargetId, TargetDefinition>>>,
}

impl TargetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry holding only the built-in targets.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for definition in builtin_definitions() {
            registry.insert(definition);
        }
        registry
    }

    /// Create a registry with the built-ins plus everything from `loader`.
    pub fn load_from(loader: &TargetLoader) -> TargetResult<Self> {
        let registry = Self::with_builtins();
        registry.merge(loader)?;
        Ok(registry)
    }

    /// Add every definition from `loader`, overriding on matching IDs.
    pub fn merge(&self, loader: &TargetLoader) -> TargetResult<()> {
        let definitions = loader.load_all()?;

        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        for definition in definitions {
            let target_id = definition.id().clone();
            if cache.insert(target_id.clone(), definition).is_some() {
                debug!(target_id = %target_id, "definition overrides existing target");
            }
        }

        info!(count = cache.len(), "target definitions available");

        Ok(())
    }

    /// Insert or replace a single definition.
    pub fn insert(&self, definition: TargetDefinition) {
        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");
        cache.insert(definition.id().clone(), definition);
    }

    /// Get a target definition by ID.
    pub fn get(&self, target_id: &TargetId) -> TargetResult<TargetDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .get(target_id)
            .cloned()
            .ok_or_else(|| TargetError::NotFound {
                target_id: target_id.to_string(),
            })
    }

    /// All definitions sorted by ID.
    #[must_use]
    pub fn all(&self) -> Vec<TargetDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        let mut definitions: Vec<_> = cache.values().cloned().collect();
        definitions.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        definitions
    }

    /// Number of registered targets.
    #[must_use]
    pub fn count(&self) -> usize {
        self.definitions
            .read()
            .expect("acquire read lock on definitions")
            .len()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtins_present() {
        let registry = TargetRegistry::with_builtins();
        assert_eq!(registry.count(), 2);

        let ids: Vec<_> = registry
            .all()
            .iter()
            .map(|d| d.id().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["psu", "trinity"]);
    }

    #[test]
    fn test_get_unknown_target() {
        let registry = TargetRegistry::with_builtins();
        let id = TargetId::new("nowhere").expect("valid id");

        assert!(matches!(
            registry.get(&id),
            Err(TargetError::NotFound { .. })
        ));
    }

    #[test]
    fn test_loaded_definition_overrides_builtin() {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::write(
            temp_dir.path().join("psu.toml"),
            r#"
[target]
id = "psu"
name = "Penn State (mirror)"

[search]
method = "json-api"
url = "https://mirror.example.edu/people"
truncation_threshold = 1000
"#,
        )
        .expect("write definition");

        let loader = TargetLoader::new(temp_dir.path()).expect("create loader");
        let registry = TargetRegistry::load_from(&loader).expect("load registry");

        assert_eq!(registry.count(), 2);
        let psu = registry
            .get(&TargetId::new("psu").expect("valid id"))
            .expect("psu present");
        assert_eq!(psu.name(), "Penn State (mirror)");
    }
}
