//! A JSON array stored in a single file.
//!
//! Every mutation reads the whole array, extends it in memory and writes the
//! whole array back. Writes go to a temporary sibling file that is renamed
//! over the target, so a failed write leaves the previous content intact.

use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// File-backed JSON array with read-extend-write semantics.
#[derive(Debug, Clone)]
pub struct JsonCollection {
    path: PathBuf,
}

impl JsonCollection {
    /// Create a collection handle. Nothing touches the disk until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty array file if either is missing.
    pub async fn init(&self) -> Result<()> {
        let dir = self.parent_dir()?;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        if !exists {
            debug!(path = %self.path.display(), "initializing empty collection");
            self.write_atomic(b"[]").await?;
        }

        Ok(())
    }

    /// Load every item. A missing file reads as an empty collection.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Append `items` to the end of the collection and return the new length.
    ///
    /// Existing items are kept as raw JSON, so fields this crate does not know
    /// about survive the rewrite.
    pub async fn append<T: Serialize>(&self, items: &[T]) -> Result<usize> {
        self.init().await?;

        let mut existing: Vec<Value> = self.load().await?;
        for item in items {
            existing.push(serde_json::to_value(item)?);
        }

        self.replace(&existing).await?;
        Ok(existing.len())
    }

    /// Replace the whole collection with `items`.
    pub async fn replace<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let dir = self.parent_dir()?;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let encoded = serde_json::to_vec_pretty(items)?;
        self.write_atomic(&encoded).await?;

        debug!(
            path = %self.path.display(),
            count = items.len(),
            "collection written"
        );
        Ok(())
    }

    fn parent_dir(&self) -> Result<&Path> {
        match self.path.parent() {
            Some(dir) if self.path.file_name().is_some() => Ok(dir),
            _ => Err(StoreError::InvalidPath(self.path.clone())),
        }
    }

    async fn write_atomic(&self, contents: &[u8]) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.clone()))?
            .to_string_lossy();
        let tmp_path = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        if let Err(source) = write_and_sync(&tmp_path, contents).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }
}

async fn write_and_sync(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}
