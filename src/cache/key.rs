//! Cache keys
//!
//! The fast tier indexes entries by `(source path, kind)` directly.
//! Persistent tiers need short, storage-safe identifiers, so they use
//! `pomlens-cache-{kind}-{hash}` where the hash is the first 16 hex chars
//! of the SHA256 of the source path.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix shared by every persistent key this cache writes
pub const KEY_PREFIX: &str = "pomlens-cache-";

/// Number of hash bytes kept in persistent keys (16 hex chars)
const HASH_BYTES: usize = 8;

/// What kind of result is cached for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKind {
    EffectivePom,
    DependencyTree,
    ResolvedDependencies,
}

impl CacheKind {
    /// Kinds removed by `invalidate`
    pub const ALL: [CacheKind; 3] = [
        Self::EffectivePom,
        Self::DependencyTree,
        Self::ResolvedDependencies,
    ];

    /// Name used inside persistent keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EffectivePom => "effective-pom",
            Self::DependencyTree => "dependency-tree",
            Self::ResolvedDependencies => "resolved-dependencies",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Logical identity of a cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: PathBuf,
    pub kind: CacheKind,
}

impl CacheKey {
    pub fn new(source: &Path, kind: CacheKind) -> Self {
        Self {
            source: source.to_path_buf(),
            kind,
        }
    }

    /// Key used by the persistent tiers
    pub fn persistent(&self) -> String {
        format!("{}{}-{}", KEY_PREFIX, self.kind, hash_source(&self.source))
    }
}

/// Hash a source path, returning the first 16 hex chars of its SHA256
fn hash_source(source: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..HASH_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_key_shape() {
        let key = CacheKey::new(Path::new("/work/app/pom.xml"), CacheKind::DependencyTree);
        let persistent = key.persistent();

        assert!(persistent.starts_with("pomlens-cache-dependency-tree-"));
        let hash = persistent.rsplit('-').next().unwrap();
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn persistent_key_deterministic_and_distinct() {
        let a = CacheKey::new(Path::new("/a/pom.xml"), CacheKind::EffectivePom);
        let b = CacheKey::new(Path::new("/b/pom.xml"), CacheKind::EffectivePom);
        let a_tree = CacheKey::new(Path::new("/a/pom.xml"), CacheKind::DependencyTree);

        assert_eq!(a.persistent(), a.clone().persistent());
        assert_ne!(a.persistent(), b.persistent());
        assert_ne!(a.persistent(), a_tree.persistent());
    }

    #[test]
    fn persistent_key_is_short_for_long_paths() {
        let long = format!("/{}/pom.xml", "nested/".repeat(200));
        let key = CacheKey::new(Path::new(&long), CacheKind::ResolvedDependencies);
        assert!(key.persistent().len() < 64);
    }

    #[test]
    fn kind_display() {
        assert_eq!(CacheKind::EffectivePom.to_string(), "effective-pom");
        assert_eq!(CacheKind::ALL.len(), 3);
    }
}
