//! Persistent tier and source mtime abstractions
//!
//! Both the small-object tier and the blob tier expose the same key/bytes
//! interface so the store can treat them uniformly.

use crate::error::{PomlensError, PomlensResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::fs;

/// A persistent key/value tier
#[async_trait]
pub trait PersistentTier: Send + Sync {
    /// Read the bytes stored under `key`
    async fn read(&self, key: &str) -> PomlensResult<Option<Vec<u8>>>;

    /// Store bytes under `key`, replacing any previous value
    async fn write(&self, key: &str, bytes: &[u8]) -> PomlensResult<()>;

    /// Remove `key` (missing keys are not an error)
    async fn delete(&self, key: &str) -> PomlensResult<()>;

    /// List stored keys starting with `prefix`
    async fn list_keys(&self, prefix: &str) -> PomlensResult<Vec<String>>;

    /// Remove every key starting with `prefix`, returning how many went
    async fn delete_prefix(&self, prefix: &str) -> PomlensResult<usize> {
        let keys = self.list_keys(prefix).await?;
        for key in &keys {
            self.delete(key).await?;
        }
        Ok(keys.len())
    }

    /// Tier name for logs and errors
    fn name(&self) -> &'static str;
}

/// Reads the modification time of a source file
#[async_trait]
pub trait MtimeSource: Send + Sync {
    async fn modified(&self, path: &Path) -> PomlensResult<DateTime<Utc>>;
}

/// Mtime source backed by filesystem metadata
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMtimeSource;

#[async_trait]
impl MtimeSource for FsMtimeSource {
    async fn modified(&self, path: &Path) -> PomlensResult<DateTime<Utc>> {
        let unavailable = |source| PomlensError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).await.map_err(unavailable)?;
        let modified = metadata.modified().map_err(unavailable)?;
        Ok(DateTime::<Utc>::from(modified))
    }
}
