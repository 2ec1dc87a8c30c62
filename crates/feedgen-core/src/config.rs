//! Configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration:
//!
//! ```toml
//! [bus]
//! max_attempts = 5
//! base_delay_ms = 2000
//! multiplier = 2.0
//!
//! [worker]
//! count = 2
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedgenConfig {
    pub bus: BusConfig,
    pub worker: WorkerConfig,
    pub logging: LoggingConfig,
}

/// Retry behaviour of the command bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,

    /// Cap on a single backoff delay.
    pub max_delay_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2_000,
            multiplier: 2.0,
            max_delay_ms: 300_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    /// Number of concurrent bus consumers.
    pub count: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { count: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FeedgenConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.max_attempts == 0 {
            return Err(ConfigError::Invalid("bus.max_attempts must be at least 1".into()));
        }
        if !self.bus.multiplier.is_finite() || self.bus.multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "bus.multiplier must be >= 1.0, got {}",
                self.bus.multiplier
            )));
        }
        if self.bus.max_delay_ms < self.bus.base_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "bus.max_delay_ms ({}) must not be below bus.base_delay_ms ({})",
                self.bus.max_delay_ms, self.bus.base_delay_ms
            )));
        }
        if self.worker.count == 0 {
            return Err(ConfigError::Invalid("worker.count must be at least 1".into()));
        }
        Ok(())
    }
}
