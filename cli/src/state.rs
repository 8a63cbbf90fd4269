//! Application state management.

use anyhow::Context;
use dirsweep_core::{AppConfig, TargetId};
use dirsweep_source::{TargetDefinition, TargetLoader, TargetRegistry};
use dirsweep_store::FileSink;
use std::path::Path;

/// Configuration and targets shared by every command.
pub struct AppState {
    /// Effective configuration after file and environment overrides
    pub config: AppConfig,

    /// Built-in targets plus any loaded from `targets.definitions_dir`
    pub registry: TargetRegistry,
}

impl AppState {
    /// Load configuration from `config_path`, or the user config directory
    /// when none is given.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::load().context("failed to load config")?,
        }
        .with_env_overrides()
        .context("invalid environment override")?;

        Self::from_config(config)
    }

    /// Build state from an already loaded configuration.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let registry = match &config.targets.definitions_dir {
            Some(dir) => {
                let loader = TargetLoader::new(dir)?;
                TargetRegistry::load_from(&loader)
                    .with_context(|| format!("failed to load targets from {}", dir.display()))?
            }
            None => TargetRegistry::with_builtins(),
        };

        tracing::debug!(
            targets = registry.count(),
            data_dir = %config.storage.data_dir.display(),
            "state initialised"
        );

        Ok(Self { config, registry })
    }

    /// Look up a target by its ID string.
    pub fn target(&self, target: &str) -> anyhow::Result<TargetDefinition> {
        let target_id = TargetId::new(target)?;
        Ok(self.registry.get(&target_id)?)
    }

    /// File-backed sink for a target's result collection and request log.
    #[must_use]
    pub fn sink_for(&self, target_id: &TargetId) -> FileSink {
        FileSink::for_target(&self.config.storage, target_id)
    }
}
