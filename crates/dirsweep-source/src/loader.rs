//! Target definition loading from TOML files.

use crate::{
    definition::TargetDefinition,
    error::{TargetError, TargetResult},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loader for target definitions from a directory of TOML files.
pub struct TargetLoader {
    /// Base directory containing target definitions
    definitions_dir: PathBuf,
}

impl TargetLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> TargetResult<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(TargetError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Load all target definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> TargetResult<Vec<TargetDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded target definitions"
        );

        Ok(definitions)
    }

    fn walk_and_load_recursive(
        dir: &Path,
        definitions: &mut Vec<TargetDefinition>,
    ) -> TargetResult<()> {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        for path in paths {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match Self::load_from_path(&path) {
                    Ok(definition) => {
                        if let Err(e) = definition.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid target definition"
                            );
                            continue;
                        }
                        definitions.push(definition);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load target definition"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a target definition from a specific file path.
    pub fn load_from_path(path: &Path) -> TargetResult<TargetDefinition> {
        let contents = std::fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| TargetError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
