//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, an
//! explicit `--config` file, then `TREESYNC_*` environment variables.

use crate::compare::DEFAULT_MODIFIED_TOLERANCE_MS;
use crate::logging::LoggingConfig;
use crate::tree::hasher::DEFAULT_BUFFER_SIZE;
use crate::tree::WalkerConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSyncConfig {
    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub compare: CompareConfig,

    #[serde(default)]
    pub checksum: ChecksumConfig,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree enumeration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Regular expressions matched against absolute paths
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    #[serde(default)]
    pub follow_symlinks: bool,
}

impl WalkConfig {
    /// Walker configuration with `extra` patterns appended to the configured ones
    pub fn walker_config(&self, extra: &[String]) -> WalkerConfig {
        let mut ignore_patterns = self.ignore_patterns.clone();
        ignore_patterns.extend(extra.iter().cloned());
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            ignore_patterns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Largest modification time skew still treated as unchanged
    #[serde(default = "default_modified_tolerance_ms")]
    pub modified_tolerance_ms: u64,
}

fn default_modified_tolerance_ms() -> u64 {
    DEFAULT_MODIFIED_TOLERANCE_MS
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            modified_tolerance_ms: default_modified_tolerance_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumConfig {
    /// Hashing threads; available parallelism when unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Read buffer per file, in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for ChecksumConfig {
    fn default() -> Self {
        Self {
            workers: None,
            buffer_size: default_buffer_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Maximum synchronization passes; stops early once nothing is left to do
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_retries() -> u32 {
    2
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            retries: default_retries(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Walk(String),
    Checksum(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Walk(msg) => write!(f, "walk: {}", msg),
            ValidationError::Checksum(msg) => write!(f, "checksum: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TreeSyncConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for pattern in &self.walk.ignore_patterns {
            if let Err(e) = Regex::new(pattern) {
                errors.push(ValidationError::Walk(format!(
                    "invalid ignore pattern '{}': {}",
                    pattern, e
                )));
            }
        }

        if self.checksum.buffer_size == 0 {
            errors.push(ValidationError::Checksum(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.checksum.workers == Some(0) {
            errors.push(ValidationError::Checksum(
                "workers must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
