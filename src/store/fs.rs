//! Local-filesystem metatile source.
//!
//! Reads containers straight out of the directory tree renderd maintains,
//! typically `/var/cache/renderd/tiles`. The server only ever reads; renderd
//! remains the sole writer of the cache.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::error::StoreError;
use crate::store::MetatileSource;

/// Metatile source backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FsMetatileSource {
    base_dir: PathBuf,
}

impl FsMetatileSource {
    /// Create a source over the given tile cache root.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root directory this source reads from.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn unreadable(&self, path: &Path, err: std::io::Error) -> StoreError {
        StoreError::Unreadable {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl MetatileSource for FsMetatileSource {
    async fn read_metatile(&self, path: &Path) -> Result<Bytes, StoreError> {
        match fs::read(path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(self.unreadable(path, e)),
        }
    }

    async fn list_configs(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.base_dir.display().to_string()));
            }
            Err(e) => return Err(self.unreadable(&self.base_dir, e)),
        };

        let mut configs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.unreadable(&self.base_dir, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                configs.push(name);
            }
        }

        configs.sort();
        Ok(configs)
    }
}
