//! Configuration model
//!
//! Mirrors the on-disk `config.toml`:
//!
//! ```toml
//! [debounce]
//! delay_ms = 250
//!
//! [throttle]
//! interval_ms = 100
//!
//! [log]
//! level = "info"
//! ```
//!
//! Every section and field is optional; missing values fall back to
//! [`Default`].

use crate::delay::Delay;
use crate::error::{PacerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound for any configured wait (1 hour)
pub const MAX_WAIT_MS: u64 = 60 * 60 * 1000;

/// Dotted keys of every setting
pub const KEYS: &[&str] = &["debounce.delay_ms", "throttle.interval_ms", "log.level", "log.dir"];

/// Log levels accepted by `[log] level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerConfig {
    pub debounce: DebounceConfig,
    pub throttle: ThrottleConfig,
    pub log: LogConfig,
}

/// `[debounce]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before a debounced call fires (default: 250ms)
    pub delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { delay_ms: 250 }
    }
}

/// `[throttle]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum spacing between throttled executions (default: 100ms)
    pub interval_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// `[log]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Directory for a rolling log file; stderr only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl PacerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        KEYS.iter().try_for_each(|key| self.validate_field(key))
    }

    /// Check the value behind one dotted key
    pub fn validate_field(&self, key: &str) -> Result<()> {
        match key {
            "debounce.delay_ms" if self.debounce.delay_ms > MAX_WAIT_MS => Err(PacerError::Config(format!(
                "debounce.delay_ms must be between 0 and {MAX_WAIT_MS} (got {})",
                self.debounce.delay_ms
            ))),
            "throttle.interval_ms" if self.throttle.interval_ms > MAX_WAIT_MS => {
                Err(PacerError::Config(format!(
                    "throttle.interval_ms must be between 0 and {MAX_WAIT_MS} (got {})",
                    self.throttle.interval_ms
                )))
            }
            "log.level" if !LOG_LEVELS.contains(&self.log.level.as_str()) => {
                Err(PacerError::Config(format!(
                    "log.level must be one of {} (got '{}')",
                    LOG_LEVELS.join(", "),
                    self.log.level
                )))
            }
            _ if KEYS.contains(&key) => Ok(()),
            _ => Err(PacerError::Config(format!("unknown key: {key}"))),
        }
    }

    /// Debounce delay as a [`Delay`]
    pub fn debounce_delay(&self) -> Delay {
        Delay::from_millis(self.debounce.delay_ms)
    }

    /// Throttle interval as a [`Delay`]
    pub fn throttle_interval(&self) -> Delay {
        Delay::from_millis(self.throttle.interval_ms)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config = Self::parse_unvalidated(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without range checks
    ///
    /// For editing a file whose values are out of range; call
    /// [`PacerConfig::validate`] before using the result.
    pub fn parse_unvalidated(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PacerError::Config(e.to_string()))
    }

    /// Render as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PacerError::Config(e.to_string()))
    }

    /// Load from a file, returning defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            PacerError::Config(msg) => PacerError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Validate and write to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;

        debug!("Wrote config to {}", path.display());
        Ok(())
    }
}
