//! Configuration schema for pomlens
//!
//! Configuration is stored at `~/.config/pomlens/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Result cache settings
    pub cache: CacheConfig,

    /// Maven invocation settings
    pub maven: MavenConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable result caching (default: true)
    pub enabled: bool,

    /// Entry lifetime in seconds
    pub ttl_secs: u64,

    /// Serialized size at which entries go to the blob tier
    pub blob_threshold_bytes: usize,

    /// Cache directory (default: platform cache dir)
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
            blob_threshold_bytes: 50 * 1024,
            dir: None,
        }
    }
}

/// Maven invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MavenConfig {
    /// Executable to run
    pub executable: String,

    /// Retries after a transient network failure
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each attempt
    pub initial_backoff_ms: u64,

    /// Pass `-o` (offline)
    pub offline: bool,

    /// Extra arguments appended to every invocation
    pub extra_args: Vec<String>,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            executable: "mvn".to_string(),
            max_retries: 3,
            initial_backoff_ms: 1000,
            offline: false,
            extra_args: vec![],
        }
    }
}
