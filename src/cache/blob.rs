//! Large-object persistent tier
//!
//! One `{key}.json` file per entry under a directory that is created on
//! first write.

use crate::cache::tier::PersistentTier;
use crate::error::{PomlensError, PomlensResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const TIER_NAME: &str = "blob";
const BLOB_EXT: &str = "json";

/// Directory-backed blob tier
pub struct BlobTier {
    root: PathBuf,
}

impl BlobTier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the blobs
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, BLOB_EXT))
    }
}

#[async_trait]
impl PersistentTier for BlobTier {
    async fn read(&self, key: &str) -> PomlensResult<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PomlensError::io(format!("reading blob {}", path.display()), e)),
        }
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> PomlensResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            PomlensError::io(format!("creating blob directory {}", self.root.display()), e)
        })?;

        let path = self.blob_path(key);
        fs::write(&path, bytes)
            .await
            .map_err(|e| PomlensError::io(format!("writing blob {}", path.display()), e))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> PomlensResult<()> {
        let path = self.blob_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PomlensError::io(format!("removing blob {}", path.display()), e)),
        }
    }

    async fn list_keys(&self, prefix: &str) -> PomlensResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PomlensError::io("reading blob directory", e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PomlensError::io("reading blob entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == BLOB_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if stem.starts_with(prefix) {
                        keys.push(stem.to_string());
                    }
                }
            }
        }

        Ok(keys)
    }

    fn name(&self) -> &'static str {
        TIER_NAME
    }
}
