//! Small-object persistent tier
//!
//! Keeps all entries in a single JSON document (`state.json`), loaded on
//! first use and rewritten atomically on every change. Suitable for small
//! payloads only; large ones go to the blob tier.

use crate::cache::tier::PersistentTier;
use crate::error::{PomlensError, PomlensResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Longest key the store accepts
pub const MAX_KEY_LEN: usize = 128;

const TIER_NAME: &str = "small-persistent";

/// JSON-document backed key/value tier
pub struct KvTier {
    path: PathBuf,
    state: Mutex<Option<BTreeMap<String, String>>>,
}

impl KvTier {
    /// Create a tier backed by the document at `path` (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> PomlensResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            PomlensError::io(format!("reading cache state {}", self.path.display()), e)
        })?;

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                // A corrupt document only costs cache misses
                warn!("Discarding unreadable cache state {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    async fn persist(&self, map: &BTreeMap<String, String>) -> PomlensResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PomlensError::io(format!("creating cache directory {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string(map)?;
        let tmp = self.path.with_extension(format!("{}.tmp", Uuid::new_v4()));

        fs::write(&tmp, content)
            .await
            .map_err(|e| PomlensError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            PomlensError::io(format!("replacing {}", self.path.display()), e)
        })?;

        debug!("Persisted {} key(s) to {}", map.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PersistentTier for KvTier {
    async fn read(&self, key: &str) -> PomlensResult<Option<Vec<u8>>> {
        let mut state = self.state.lock().await;
        if state.is_none() {
            *state = Some(self.load().await?);
        }
        Ok(state
            .as_ref()
            .and_then(|map| map.get(key))
            .map(|value| value.as_bytes().to_vec()))
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> PomlensResult<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(PomlensError::PersistKeyTooLong {
                tier: TIER_NAME,
                key: key.to_string(),
                len: key.len(),
                max: MAX_KEY_LEN,
            });
        }
        let value = String::from_utf8(bytes.to_vec())
            .map_err(|e| PomlensError::persist_write(TIER_NAME, key, e))?;

        let mut state = self.state.lock().await;
        let mut map = match state.take() {
            Some(map) => map,
            None => self.load().await?,
        };
        let previous = map.insert(key.to_string(), value);

        let result = self.persist(&map).await;
        if result.is_err() {
            // Memory must keep mirroring the document on disk
            match previous {
                Some(previous) => map.insert(key.to_string(), previous),
                None => map.remove(key),
            };
        }
        *state = Some(map);
        result
    }

    async fn delete(&self, key: &str) -> PomlensResult<()> {
        let mut state = self.state.lock().await;
        let mut map = match state.take() {
            Some(map) => map,
            None => self.load().await?,
        };

        let result = match map.remove(key) {
            Some(removed) => {
                let result = self.persist(&map).await;
                if result.is_err() {
                    map.insert(key.to_string(), removed);
                }
                result
            }
            None => Ok(()),
        };
        *state = Some(map);
        result
    }

    async fn delete_prefix(&self, prefix: &str) -> PomlensResult<usize> {
        let mut state = self.state.lock().await;
        let map = match state.take() {
            Some(map) => map,
            None => self.load().await?,
        };

        let (removed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) =
            map.into_iter().partition(|(k, _)| k.starts_with(prefix));
        if removed.is_empty() {
            *state = Some(kept);
            return Ok(0);
        }

        match self.persist(&kept).await {
            Ok(()) => {
                *state = Some(kept);
                Ok(removed.len())
            }
            Err(e) => {
                let mut map = kept;
                map.extend(removed);
                *state = Some(map);
                Err(e)
            }
        }
    }

    async fn list_keys(&self, prefix: &str) -> PomlensResult<Vec<String>> {
        let mut state = self.state.lock().await;
        if state.is_none() {
            *state = Some(self.load().await?);
        }
        Ok(state
            .as_ref()
            .map(|map| {
                map.keys()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        TIER_NAME
    }
}
