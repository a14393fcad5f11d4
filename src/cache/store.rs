//! Tiered cache store
//!
//! Reads try the fast tier, then the small-persistent tier, then the blob
//! tier, and return the first fresh entry, copying it into the faster tiers.
//! Writes always go to the fast tier plus exactly one persistent tier,
//! chosen by serialized size.
//!
//! Persistent tiers are best-effort: their failures are logged and never
//! surface from `get`/`set`. Operations on the same key are not serialized;
//! a backfill can race a concurrent `set`, and the last fast-tier write wins.

use crate::cache::blob::BlobTier;
use crate::cache::entry::{CacheEntry, Freshness};
use crate::cache::key::{CacheKey, CacheKind, KEY_PREFIX};
use crate::cache::kv::KvTier;
use crate::cache::tier::{FsMtimeSource, MtimeSource, PersistentTier};
use crate::config::schema::CacheConfig;
use crate::error::PomlensResult;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Default entry lifetime
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Default size at which entries go to the blob tier
pub const DEFAULT_BLOB_THRESHOLD: usize = 50 * 1024;

/// File name of the small-persistent tier inside the cache directory
const KV_FILE: &str = "state.json";

/// Subdirectory of the blob tier inside the cache directory
const BLOB_DIR: &str = "blobs";

/// Age and placement settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub max_age: Duration,
    pub blob_threshold: usize,
}

impl CacheSettings {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            max_age: Duration::from_secs(config.ttl_secs),
            blob_threshold: config.blob_threshold_bytes,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            blob_threshold: DEFAULT_BLOB_THRESHOLD,
        }
    }
}

/// Entry counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub fast: usize,
    pub small_persistent: usize,
    pub blob: usize,
}

/// Three-tier cache keyed by source file and result kind
pub struct TieredCache {
    settings: CacheSettings,
    fast: RwLock<HashMap<CacheKey, CacheEntry>>,
    small: Box<dyn PersistentTier>,
    blob: Box<dyn PersistentTier>,
    mtime_source: Box<dyn MtimeSource>,
}

impl TieredCache {
    /// Assemble a cache from explicit tiers
    pub fn new(
        settings: CacheSettings,
        small: Box<dyn PersistentTier>,
        blob: Box<dyn PersistentTier>,
        mtime_source: Box<dyn MtimeSource>,
    ) -> Self {
        Self {
            settings,
            fast: RwLock::new(HashMap::new()),
            small,
            blob,
            mtime_source,
        }
    }

    /// Open the on-disk tiers under `dir`
    pub fn open(dir: &Path, settings: CacheSettings) -> Self {
        debug!("Opening cache at {}", dir.display());
        Self::new(
            settings,
            Box::new(KvTier::new(dir.join(KV_FILE))),
            Box::new(BlobTier::new(dir.join(BLOB_DIR))),
            Box::new(FsMtimeSource),
        )
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Look up a cached value
    ///
    /// `force_refresh` skips every tier without removing anything.
    pub async fn get<T: DeserializeOwned>(
        &self,
        source: &Path,
        kind: CacheKind,
        force_refresh: bool,
    ) -> Option<T> {
        if force_refresh {
            debug!("Cache bypass for {} ({})", source.display(), kind);
            return None;
        }

        let key = CacheKey::new(source, kind);
        let mut live: Option<Option<DateTime<Utc>>> = None;

        let fast_entry = self.fast.read().await.get(&key).cloned();
        if let Some(entry) = fast_entry {
            if self.is_fresh(&entry, source, &mut live, "fast").await {
                if let Some(value) = decode(&entry, kind) {
                    debug!("Cache hit (fast): {} ({})", source.display(), kind);
                    return Some(value);
                }
            }
        }

        let persistent_key = key.persistent();
        for (position, tier) in [&self.small, &self.blob].into_iter().enumerate() {
            let bytes = match tier.read(&persistent_key).await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cache read from {} tier failed: {}", tier.name(), e);
                    continue;
                }
            };

            let entry = match CacheEntry::from_bytes(&bytes) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Unreadable {} entry {}: {}", tier.name(), persistent_key, e);
                    continue;
                }
            };

            if !self.is_fresh(&entry, source, &mut live, tier.name()).await {
                continue;
            }
            let Some(value) = decode(&entry, kind) else {
                continue;
            };

            debug!("Cache hit ({}): {} ({})", tier.name(), source.display(), kind);
            self.backfill(&key, &persistent_key, entry, position).await;
            return Some(value);
        }

        debug!("Cache miss: {} ({})", source.display(), kind);
        None
    }

    /// Store a value
    ///
    /// Only a payload that cannot be serialized is an error; persistent
    /// tier failures are logged and the fast tier is still updated.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        source: &Path,
        kind: CacheKind,
        data: &T,
    ) -> PomlensResult<()> {
        let data = serde_json::to_value(data)?;
        let key = CacheKey::new(source, kind);

        let source_mtime = match self.mtime_source.modified(source).await {
            Ok(mtime) => mtime,
            Err(e) => {
                debug!("{}; recording write time as source mtime", e);
                Utc::now()
            }
        };

        let entry = CacheEntry::new(data, source_mtime);
        let bytes = entry.to_bytes()?;
        let payload_len = entry.payload_len()?;
        self.fast.write().await.insert(key.clone(), entry);

        let persistent_key = key.persistent();
        let (target, other) = if payload_len < self.settings.blob_threshold {
            (&self.small, &self.blob)
        } else {
            (&self.blob, &self.small)
        };

        debug!(
            "Caching {} ({}) in {} tier ({} byte payload)",
            source.display(),
            kind,
            target.name(),
            payload_len
        );

        if let Err(e) = target.write(&persistent_key, &bytes).await {
            warn!("Cache write to {} tier failed: {}", target.name(), e);
        }
        // A previous entry may sit in the other tier if the payload changed size class
        if let Err(e) = other.delete(&persistent_key).await {
            warn!("Cache cleanup in {} tier failed: {}", other.name(), e);
        }

        Ok(())
    }

    /// Remove every known kind for `source` from all tiers
    pub async fn invalidate(&self, source: &Path) {
        for kind in CacheKind::ALL {
            let key = CacheKey::new(source, kind);
            self.fast.write().await.remove(&key);

            let persistent_key = key.persistent();
            for tier in [&self.small, &self.blob] {
                if let Err(e) = tier.delete(&persistent_key).await {
                    warn!("Cache invalidate in {} tier failed: {}", tier.name(), e);
                }
            }
        }
        debug!("Invalidated cache for {}", source.display());
    }

    /// Remove every entry this cache owns
    ///
    /// Persistent tiers are swept by key prefix, so unrelated keys sharing
    /// the same store survive.
    pub async fn clear_all(&self) {
        let cleared = {
            let mut fast = self.fast.write().await;
            let count = fast.len();
            fast.clear();
            count
        };
        let mut removed = cleared;

        for tier in [&self.small, &self.blob] {
            match tier.delete_prefix(KEY_PREFIX).await {
                Ok(count) => removed += count,
                Err(e) => warn!("Cache clear in {} tier failed: {}", tier.name(), e),
            }
        }

        debug!("Cleared {} cache entries", removed);
    }

    /// Best-effort entry counts
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            fast: self.fast.read().await.len(),
            small_persistent: count_keys(self.small.as_ref()).await,
            blob: count_keys(self.blob.as_ref()).await,
        }
    }

    async fn is_fresh(
        &self,
        entry: &CacheEntry,
        source: &Path,
        live: &mut Option<Option<DateTime<Utc>>>,
        tier: &str,
    ) -> bool {
        let live_mtime = match live {
            Some(mtime) => *mtime,
            None => {
                let mtime = match self.mtime_source.modified(source).await {
                    Ok(mtime) => Some(mtime),
                    Err(e) => {
                        debug!("{}", e);
                        None
                    }
                };
                *live = Some(mtime);
                mtime
            }
        };

        match entry.freshness(live_mtime, Utc::now(), self.settings.max_age) {
            Freshness::Fresh => true,
            Freshness::Stale(reason) => {
                debug!("Stale {} entry for {}: {}", tier, source.display(), reason);
                false
            }
        }
    }

    /// Copy a persistent hit into the faster tiers
    ///
    /// The small tier only receives entries under the blob threshold, so
    /// tier placement stays a partition.
    async fn backfill(
        &self,
        key: &CacheKey,
        persistent_key: &str,
        entry: CacheEntry,
        position: usize,
    ) {
        let promote_to_small = position > 0
            && entry
                .payload_len()
                .is_ok_and(|len| len < self.settings.blob_threshold);
        if promote_to_small {
            if let Ok(bytes) = entry.to_bytes() {
                if let Err(e) = self.small.write(persistent_key, &bytes).await {
                    warn!("Cache backfill to {} tier failed: {}", self.small.name(), e);
                }
            }
        }
        self.fast.write().await.insert(key.clone(), entry);
    }
}

fn decode<T: DeserializeOwned>(entry: &CacheEntry, kind: CacheKind) -> Option<T> {
    match serde_json::from_value(entry.data.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Cached {} payload does not decode: {}", kind, e);
            None
        }
    }
}

async fn count_keys(tier: &dyn PersistentTier) -> usize {
    match tier.list_keys(KEY_PREFIX).await {
        Ok(keys) => keys.len(),
        Err(e) => {
            debug!("Cannot count {} tier: {}", tier.name(), e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::CACHE_FORMAT_VERSION;
    use crate::error::PomlensError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        pom: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let pom = temp.path().join("pom.xml");
            std::fs::write(&pom, "<project/>").unwrap();
            Self { temp, pom }
        }

        fn cache_dir(&self) -> PathBuf {
            self.temp.path().join("cache")
        }

        fn open(&self) -> TieredCache {
            TieredCache::open(&self.cache_dir(), CacheSettings::default())
        }

        fn kv(&self) -> KvTier {
            KvTier::new(self.cache_dir().join(KV_FILE))
        }

        fn blobs(&self) -> BlobTier {
            BlobTier::new(self.cache_dir().join(BLOB_DIR))
        }

        fn touch(&self) {
            let file = std::fs::File::options().write(true).open(&self.pom).unwrap();
            file.set_modified(SystemTime::now() + Duration::from_secs(30))
                .unwrap();
        }
    }

    /// Tier that fails every operation
    struct BrokenTier;

    #[async_trait]
    impl PersistentTier for BrokenTier {
        async fn read(&self, _key: &str) -> PomlensResult<Option<Vec<u8>>> {
            Err(broken())
        }
        async fn write(&self, key: &str, _bytes: &[u8]) -> PomlensResult<()> {
            Err(PomlensError::persist_write("broken", key, "disk full"))
        }
        async fn delete(&self, _key: &str) -> PomlensResult<()> {
            Err(broken())
        }
        async fn list_keys(&self, _prefix: &str) -> PomlensResult<Vec<String>> {
            Err(broken())
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn broken() -> PomlensError {
        PomlensError::io("broken tier", std::io::Error::other("disk failure"))
    }

    /// String payload whose JSON encoding is exactly `len` bytes
    fn payload_of_len(len: usize) -> String {
        "x".repeat(len - 2)
    }

    fn big_payload() -> Vec<String> {
        (0..1500).map(|i| format!("org.example:artifact-{:05}:jar:1.0.0:compile", i)).collect()
    }

    #[tokio::test]
    async fn set_then_get() {
        let fx = Fixture::new();
        let cache = fx.open();

        cache.set(&fx.pom, CacheKind::DependencyTree, &vec!["a", "b"]).await.unwrap();
        let value: Option<Vec<String>> = cache.get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));

        let other: Option<Vec<String>> = cache.get(&fx.pom, CacheKind::EffectivePom, false).await;
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn touching_source_invalidates() {
        let fx = Fixture::new();
        let cache = fx.open();

        cache.set(&fx.pom, CacheKind::ResolvedDependencies, &"v1").await.unwrap();
        fx.touch();

        let value: Option<String> = cache.get(&fx.pom, CacheKind::ResolvedDependencies, false).await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn force_refresh_bypasses_without_evicting() {
        let fx = Fixture::new();
        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::EffectivePom, &"<project/>").await.unwrap();

        let bypassed: Option<String> = cache.get(&fx.pom, CacheKind::EffectivePom, true).await;
        assert!(bypassed.is_none());

        let value: Option<String> = cache.get(&fx.pom, CacheKind::EffectivePom, false).await;
        assert_eq!(value.as_deref(), Some("<project/>"));
    }

    #[tokio::test]
    async fn small_payload_goes_to_small_tier_only() {
        let fx = Fixture::new();
        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::DependencyTree, &"tiny").await.unwrap();

        assert_eq!(
            cache.stats().await,
            CacheStats {
                fast: 1,
                small_persistent: 1,
                blob: 0
            }
        );
    }

    #[tokio::test]
    async fn large_payload_goes_to_blob_tier_only() {
        let fx = Fixture::new();
        let cache = fx.open();
        let payload = big_payload();
        assert!(serde_json::to_vec(&payload).unwrap().len() > 55 * 1024);

        cache.set(&fx.pom, CacheKind::DependencyTree, &payload).await.unwrap();

        let key = CacheKey::new(&fx.pom, CacheKind::DependencyTree).persistent();
        assert!(fx.kv().read(&key).await.unwrap().is_none());
        assert!(fx.kv().list_keys(KEY_PREFIX).await.unwrap().is_empty());
        assert_eq!(fx.blobs().list_keys(KEY_PREFIX).await.unwrap(), [key]);
    }

    #[tokio::test]
    async fn resized_payload_moves_between_tiers() {
        let fx = Fixture::new();
        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::DependencyTree, &"tiny").await.unwrap();
        cache.set(&fx.pom, CacheKind::DependencyTree, &big_payload()).await.unwrap();

        let stats = cache.stats().await;
        assert_eq!((stats.small_persistent, stats.blob), (0, 1));
    }

    #[tokio::test]
    async fn small_tier_hit_promotes_to_fast() {
        let fx = Fixture::new();
        fx.open().set(&fx.pom, CacheKind::EffectivePom, &"xml").await.unwrap();

        let fresh_process = fx.open();
        assert_eq!(fresh_process.stats().await.fast, 0);

        let value: Option<String> = fresh_process.get(&fx.pom, CacheKind::EffectivePom, false).await;
        assert_eq!(value.as_deref(), Some("xml"));
        assert_eq!(fresh_process.stats().await.fast, 1);
    }

    #[tokio::test]
    async fn blob_hit_promotes_to_fast_but_not_small() {
        let fx = Fixture::new();
        let payload = big_payload();
        fx.open().set(&fx.pom, CacheKind::DependencyTree, &payload).await.unwrap();

        let fresh_process = fx.open();
        let value: Option<Vec<String>> =
            fresh_process.get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert_eq!(value, Some(payload));
        assert_eq!(
            fresh_process.stats().await,
            CacheStats {
                fast: 1,
                small_persistent: 0,
                blob: 1
            }
        );
    }

    #[tokio::test]
    async fn placement_measures_payload_not_envelope() {
        let fx = Fixture::new();
        let cache = fx.open();

        let just_under = payload_of_len(DEFAULT_BLOB_THRESHOLD - 1);
        assert_eq!(serde_json::to_vec(&just_under).unwrap().len(), DEFAULT_BLOB_THRESHOLD - 1);
        cache.set(&fx.pom, CacheKind::EffectivePom, &just_under).await.unwrap();

        let at_threshold = payload_of_len(DEFAULT_BLOB_THRESHOLD);
        cache.set(&fx.pom, CacheKind::DependencyTree, &at_threshold).await.unwrap();

        assert_eq!(
            cache.stats().await,
            CacheStats {
                fast: 2,
                small_persistent: 1,
                blob: 1
            }
        );
        let effective = CacheKey::new(&fx.pom, CacheKind::EffectivePom).persistent();
        assert!(fx.kv().read(&effective).await.unwrap().is_some());
        assert!(fx.blobs().read(&effective).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blob_hit_backfills_small_when_under_threshold() {
        let fx = Fixture::new();
        let key = CacheKey::new(&fx.pom, CacheKind::EffectivePom).persistent();
        let mtime = DateTime::<Utc>::from(std::fs::metadata(&fx.pom).unwrap().modified().unwrap());
        let entry = CacheEntry::new(serde_json::json!("xml"), mtime);
        fx.blobs().write(&key, &entry.to_bytes().unwrap()).await.unwrap();

        let cache = fx.open();
        let value: Option<String> = cache.get(&fx.pom, CacheKind::EffectivePom, false).await;
        assert_eq!(value.as_deref(), Some("xml"));
        assert_eq!(
            cache.stats().await,
            CacheStats {
                fast: 1,
                small_persistent: 1,
                blob: 1
            }
        );
    }

    #[tokio::test]
    async fn entry_older_than_ttl_is_stale() {
        let fx = Fixture::new();
        let key = CacheKey::new(&fx.pom, CacheKind::DependencyTree).persistent();
        let mtime = DateTime::<Utc>::from(std::fs::metadata(&fx.pom).unwrap().modified().unwrap());
        let entry = CacheEntry {
            data: serde_json::json!(["old"]),
            timestamp: Utc::now() - chrono::Duration::hours(2),
            source_mtime: mtime,
            version: CACHE_FORMAT_VERSION.to_string(),
        };
        fx.blobs().write(&key, &entry.to_bytes().unwrap()).await.unwrap();

        let cache = fx.open();
        let value: Option<Vec<String>> = cache.get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert!(value.is_none());
        // Misses have no side effects
        assert_eq!(cache.stats().await.fast, 0);
    }

    #[tokio::test]
    async fn missing_source_is_a_miss() {
        let fx = Fixture::new();
        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::DependencyTree, &"x").await.unwrap();
        std::fs::remove_file(&fx.pom).unwrap();

        let value: Option<String> = cache.get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_all_kinds_everywhere() {
        let fx = Fixture::new();
        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::EffectivePom, &"xml").await.unwrap();
        cache.set(&fx.pom, CacheKind::DependencyTree, &big_payload()).await.unwrap();
        cache.set(&fx.pom, CacheKind::ResolvedDependencies, &"list").await.unwrap();

        cache.invalidate(&fx.pom).await;

        assert_eq!(cache.stats().await, CacheStats::default());
        for kind in CacheKind::ALL {
            let value: Option<serde_json::Value> = cache.get(&fx.pom, kind, false).await;
            assert!(value.is_none());
        }
    }

    #[tokio::test]
    async fn clear_all_keeps_foreign_keys() {
        let fx = Fixture::new();
        fx.kv().write("editor.theme", b"dark").await.unwrap();

        let cache = fx.open();
        cache.set(&fx.pom, CacheKind::EffectivePom, &"xml").await.unwrap();
        cache.set(&fx.pom, CacheKind::DependencyTree, &big_payload()).await.unwrap();

        cache.clear_all().await;

        assert_eq!(cache.stats().await, CacheStats::default());
        let kv = fx.kv();
        assert_eq!(kv.read("editor.theme").await.unwrap().as_deref(), Some(&b"dark"[..]));
    }

    #[tokio::test]
    async fn broken_persistent_tiers_do_not_fail_set() {
        let fx = Fixture::new();
        let cache = TieredCache::new(
            CacheSettings::default(),
            Box::new(BrokenTier),
            Box::new(BrokenTier),
            Box::new(FsMtimeSource),
        );

        cache.set(&fx.pom, CacheKind::DependencyTree, &"x").await.unwrap();
        let value: Option<String> = cache.get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert_eq!(value.as_deref(), Some("x"));

        assert_eq!(
            cache.stats().await,
            CacheStats {
                fast: 1,
                small_persistent: 0,
                blob: 0
            }
        );
        cache.clear_all().await;
        assert_eq!(cache.stats().await.fast, 0);
    }

    #[tokio::test]
    async fn corrupt_persisted_entry_is_a_miss() {
        let fx = Fixture::new();
        let key = CacheKey::new(&fx.pom, CacheKind::DependencyTree).persistent();
        fx.kv().write(&key, b"{\"not\":\"an entry\"}").await.unwrap();

        let value: Option<String> = fx.open().get(&fx.pom, CacheKind::DependencyTree, false).await;
        assert!(value.is_none());
    }
}
