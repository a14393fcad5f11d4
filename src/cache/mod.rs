//! Tiered result cache
//!
//! Caches structured Maven results per `(pom.xml, kind)` across three tiers:
//!
//! | Tier | Backing | Holds |
//! |------|---------|-------|
//! | fast | in-process map | everything written or read this process |
//! | small-persistent | one JSON document | entries under the blob threshold |
//! | blob | one file per entry | entries at or over the blob threshold |
//!
//! An entry is served only while it is fresh: same format version, younger
//! than the configured TTL, and the source file not modified since it was
//! written. If the source cannot be read the entry is treated as stale.

pub mod blob;
pub mod entry;
pub mod key;
pub mod kv;
pub mod store;
pub mod tier;

pub use blob::BlobTier;
pub use entry::{CacheEntry, Freshness, StaleReason, CACHE_FORMAT_VERSION};
pub use key::{CacheKey, CacheKind, KEY_PREFIX};
pub use kv::KvTier;
pub use store::{CacheSettings, CacheStats, TieredCache};
pub use tier::{FsMtimeSource, MtimeSource, PersistentTier};
