//! Configuration management for Dirsweep.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest pause between queries that the config accepts.
const MAX_DELAY_MS: u64 = 60_000;

/// Main application configuration.
///
/// This is loaded from `~/.config/dirsweep/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crawl pacing and bounds
    pub crawl: CrawlConfig,
    /// Where results and request logs live
    pub storage: StorageConfig,
    /// HTTP client settings shared by all targets
    pub http: HttpConfig,
    /// Target definition lookup
    pub targets: TargetsConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if not found.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let config = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `DIRSWEEP_DELAY_MS`: Override the pause between queries
    /// - `DIRSWEEP_DATA_DIR`: Override the data directory
    /// - `DIRSWEEP_MAX_QUERY_LEN`: Cap the length of expanded queries
    pub fn with_env_overrides(mut self) -> ConfigResult<Self> {
        if let Ok(val) = std::env::var("DIRSWEEP_DELAY_MS") {
            if let Ok(delay_ms) = val.parse() {
                self.crawl.delay_ms = delay_ms;
                tracing::debug!("Override crawl.delay_ms from env: {}", delay_ms);
            }
        }

        if let Ok(val) = std::env::var("DIRSWEEP_DATA_DIR") {
            if !val.is_empty() {
                tracing::debug!("Override storage.data_dir from env: {}", val);
                self.storage.data_dir = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("DIRSWEEP_MAX_QUERY_LEN") {
            if let Ok(max) = val.parse() {
                self.crawl.max_query_len = Some(max);
                tracing::debug!("Override crawl.max_query_len from env: {}", max);
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.crawl.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "crawl.delay_ms".to_string(),
                reason: format!("must be at most {MAX_DELAY_MS}, got {}", self.crawl.delay_ms),
            });
        }

        if self.crawl.max_query_len == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "crawl.max_query_len".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        for (field, name) in [
            ("storage.results_file", &self.storage.results_file),
            ("storage.audit_file", &self.storage.audit_file),
            ("storage.filtered_file", &self.storage.filtered_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "file name cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/dirsweep/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "dirsweep", "dirsweep").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Crawl pacing and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Pause after every query in milliseconds
    pub delay_ms: u64,
    /// Longest query that may still be expanded (unbounded when unset)
    pub max_query_len: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            max_query_len: None,
        }
    }
}

/// Where results and request logs live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; each target gets a subdirectory named after its ID
    pub data_dir: PathBuf,
    /// Cumulative result collection file name
    pub results_file: String,
    /// Request log file name
    pub audit_file: String,
    /// Deduplicated output file name
    pub filtered_file: String,
}

impl StorageConfig {
    /// Directory holding one target's files.
    #[must_use]
    pub fn target_dir(&self, target_id: &str) -> PathBuf {
        self.data_dir.join(target_id)
    }

    /// Result collection path for a target.
    #[must_use]
    pub fn results_path(&self, target_id: &str) -> PathBuf {
        self.target_dir(target_id).join(&self.results_file)
    }

    /// Request log path for a target.
    #[must_use]
    pub fn audit_path(&self, target_id: &str) -> PathBuf {
        self.target_dir(target_id).join(&self.audit_file)
    }

    /// Filtered output path for a target.
    #[must_use]
    pub fn filtered_path(&self, target_id: &str) -> PathBuf {
        self.target_dir(target_id).join(&self.filtered_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_file: "results.json".to_string(),
            audit_file: "requests_log.json".to_string(),
            filtered_file: "filtered.json".to_string(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("dirsweep/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Target definition lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Directory of `*.toml` target definitions merged over the built-ins
    pub definitions_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.crawl.delay_ms, 500);
        assert_eq!(config.crawl.max_query_len, None);
        assert_eq!(config.storage.results_file, "results.json");
        assert_eq!(config.storage.audit_file, "requests_log.json");
        assert!(config.targets.definitions_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_paths_are_per_target() {
        let storage = StorageConfig::default();
        assert_eq!(
            storage.results_path("psu"),
            PathBuf::from("data/psu/results.json")
        );
        assert_eq!(
            storage.audit_path("trinity"),
            PathBuf::from("data/trinity/requests_log.json")
        );
        assert_eq!(
            storage.filtered_path("psu"),
            PathBuf::from("data/psu/filtered.json")
        );
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[crawl]\ndelay_ms = 250\nmax_query_len = 6\n\n[targets]\ndefinitions_dir = \"targets\"\n",
        )
        .expect("write config");

        let loaded = AppConfig::load_from(&config_path).expect("load config");

        assert_eq!(loaded.crawl.delay_ms, 250);
        assert_eq!(loaded.crawl.max_query_len, Some(6));
        assert_eq!(
            loaded.targets.definitions_dir,
            Some(PathBuf::from("targets"))
        );
        assert_eq!(loaded.storage, StorageConfig::default());
    }

    #[test]
    fn test_load_from_rejects_out_of_range_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[crawl]\nmax_query_len = 0\n").expect("write config");

        assert!(matches!(
            AppConfig::load_from(&config_path),
            Err(ConfigError::InvalidValue { field, .. }) if field == "crawl.max_query_len"
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded =
            AppConfig::load_from(&tmp.path().join("absent.toml")).expect("defaults on missing");
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[crawl]
delay_ms = 1000

[storage]
data_dir = "/var/lib/dirsweep"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.crawl.delay_ms, 1000);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/dirsweep"));
        // These should be defaults
        assert_eq!(config.storage.results_file, "results.json");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.crawl.delay_ms = MAX_DELAY_MS + 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.crawl.max_query_len = Some(0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.audit_file = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "storage.audit_file"
        ));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("DIRSWEEP_DELAY_MS", "50");
        std::env::set_var("DIRSWEEP_DATA_DIR", "/tmp/dirsweep-env");
        std::env::set_var("DIRSWEEP_MAX_QUERY_LEN", "5");

        let config = AppConfig::default()
            .with_env_overrides()
            .expect("apply env overrides");

        std::env::remove_var("DIRSWEEP_DELAY_MS");
        std::env::remove_var("DIRSWEEP_DATA_DIR");
        std::env::remove_var("DIRSWEEP_MAX_QUERY_LEN");

        assert_eq!(config.crawl.delay_ms, 50);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/dirsweep-env"));
        assert_eq!(config.crawl.max_query_len, Some(5));
    }
}
