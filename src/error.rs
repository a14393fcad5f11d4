//! Error types for pomlens
//!
//! All modules use `PomlensResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pomlens operations
pub type PomlensResult<T> = Result<T, PomlensError>;

/// All errors that can occur in pomlens
#[derive(Error, Debug)]
pub enum PomlensError {
    // External tool errors
    #[error("{tool} not found. Install Maven and add it to PATH")]
    ToolMissing { tool: String },

    #[error("Network error after {attempts} attempt(s): {detail}")]
    TransientNetwork { attempts: u32, detail: String },

    #[error("{command} failed:\n{diagnostic}")]
    ToolFailure { command: String, diagnostic: String },

    // Source probing
    #[error("Source file unavailable: {path}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parsing
    #[error("Cannot decode coordinate '{input}': {reason}")]
    Decode { input: String, reason: String },

    // Cache tier errors
    #[error("Failed to persist {key} to {tier} tier: {reason}")]
    PersistWrite {
        tier: &'static str,
        key: String,
        reason: String,
    },

    #[error("Cache key too long for {tier} tier ({len} > {max}): {key}")]
    PersistKeyTooLong {
        tier: &'static str,
        key: String,
        len: usize,
        max: usize,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PomlensError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a tool failure carrying the tool's own diagnostic output
    pub fn tool_failure(command: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::ToolFailure {
            command: command.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Create a persistent-tier write error
    pub fn persist_write(tier: &'static str, key: impl Into<String>, reason: impl ToString) -> Self {
        Self::PersistWrite {
            tier,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolMissing { .. } => {
                Some("Install Maven (https://maven.apache.org) and make sure `mvn` is on PATH, or set maven.executable")
            }
            Self::TransientNetwork { .. } => {
                Some("Check network access to your Maven repositories, or retry with maven.offline = true")
            }
            Self::PathNotFound(_) => Some("Pass the project descriptor with --pom"),
            Self::ConfigInvalid { .. } => {
                Some("Fix or remove the file; `pomlens config path` shows the global location")
            }
            _ => None,
        }
    }
}
