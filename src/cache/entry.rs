//! Cache entries and freshness validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Version tag written into every entry. Bumping it invalidates all
/// previously persisted entries.
pub const CACHE_FORMAT_VERSION: &str = "1";

/// A stored cache entry
///
/// Entries are never mutated in place; every `set` writes a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Cached payload (opaque to the store)
    pub data: serde_json::Value,

    /// When the entry was written
    pub timestamp: DateTime<Utc>,

    /// Modification time of the source file when the entry was written
    pub source_mtime: DateTime<Utc>,

    /// Format version, compared against `CACHE_FORMAT_VERSION`
    pub version: String,
}

impl CacheEntry {
    /// Create an entry stamped with the current time and format version
    pub fn new(data: serde_json::Value, source_mtime: DateTime<Utc>) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            source_mtime,
            version: CACHE_FORMAT_VERSION.to_string(),
        }
    }

    /// Serialize for a persistent tier
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Serialized size of the payload alone, used for tier placement
    pub fn payload_len(&self) -> serde_json::Result<usize> {
        serde_json::to_vec(&self.data).map(|bytes| bytes.len())
    }

    /// Deserialize from a persistent tier
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Check whether the entry may be served
    ///
    /// `live_mtime` is the source file's current modification time, or
    /// `None` if it could not be read. An unreadable source is stale.
    pub fn freshness(
        &self,
        live_mtime: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> Freshness {
        if self.version != CACHE_FORMAT_VERSION {
            return Freshness::Stale(StaleReason::VersionMismatch);
        }

        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        if now - self.timestamp > max_age {
            return Freshness::Stale(StaleReason::Expired);
        }

        match live_mtime {
            None => Freshness::Stale(StaleReason::SourceUnavailable),
            Some(mtime) if mtime > self.source_mtime => {
                Freshness::Stale(StaleReason::SourceModified)
            }
            Some(_) => Freshness::Fresh,
        }
    }
}

/// Outcome of a freshness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// Why an entry was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    VersionMismatch,
    Expired,
    SourceModified,
    SourceUnavailable,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch => write!(f, "format version changed"),
            Self::Expired => write!(f, "expired"),
            Self::SourceModified => write!(f, "source modified"),
            Self::SourceUnavailable => write!(f, "source unavailable"),
        }
    }
}
