//! Cache configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tipcache_utils::LogFormat;

use crate::CacheError;

/// Window size used when none is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// Configuration for a tip-set cache and the process hosting it.
///
/// Can be loaded from a TOML file via [`CacheConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Window size in heights. Null rounds consume capacity.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl CacheConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CacheError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CacheError> {
        let config: Self = toml::from_str(s).map_err(|e| CacheError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("CacheConfig is always serializable to TOML")
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        Ok(())
    }
}
