//! Locating, loading and editing the user's config file
//!
//! The file lives at `<config dir>/pacer/config.toml`; `PACER_CONFIG`
//! overrides the location.

use anyhow::{Context, Result};
use pacer_core::{PacerConfig, PacerError};
use std::path::{Path, PathBuf};
use tracing::warn;

pub use pacer_core::config::KEYS;

/// Path of the config file, if a config directory can be determined
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PACER_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("pacer").join("config.toml"))
}

/// Load the config file, or defaults if there is none
pub fn load() -> Result<PacerConfig> {
    match config_file_path() {
        Some(path) => PacerConfig::load_from(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PacerConfig::default()),
    }
}

/// Write a default config file unless one exists; returns its path
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        PacerConfig::default().save_to(&path)?;
    }
    Ok(path)
}

/// Default config rendered as TOML
pub fn example_config() -> Result<String> {
    Ok(PacerConfig::default().to_toml_string()?)
}

/// Read one value by dotted key
pub fn get_value(config: &PacerConfig, key: &str) -> Result<String> {
    let value = match key {
        "debounce.delay_ms" => config.debounce.delay_ms.to_string(),
        "throttle.interval_ms" => config.throttle.interval_ms.to_string(),
        "log.level" => config.log.level.clone(),
        "log.dir" => config
            .log
            .dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'pacer config list' to see available keys.",
            key
        ),
    };
    Ok(value)
}

/// Set one value by dotted key and validate it
///
/// Only the edited field is checked, so a file with several bad values can
/// be repaired one key at a time. `config` is left untouched on error. An empty value for `log.dir`
/// clears it.
pub fn set_value(config: &mut PacerConfig, key: &str, value: &str) -> Result<()> {
    let mut updated = config.clone();

    match key {
        "debounce.delay_ms" => {
            updated.debounce.delay_ms = value
                .parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        "throttle.interval_ms" => {
            updated.throttle.interval_ms = value
                .parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        "log.level" => updated.log.level = value.to_string(),
        "log.dir" => {
            updated.log.dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'pacer config list' to see available keys.",
            key
        ),
    }

    updated
        .validate_field(key)
        .context("Invalid configuration value")?;
    *config = updated;
    Ok(())
}

/// Set one key in the file at `path` and write it back
///
/// Reads the file without range checks so an invalid file can still be
/// repaired; unparseable TOML is replaced by defaults. Returns the problem
/// that still makes the file invalid, if any.
pub fn edit_file(path: &Path, key: &str, value: &str) -> Result<Option<PacerError>> {
    let mut config = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        PacerConfig::parse_unvalidated(&text).unwrap_or_else(|e| {
            warn!("Replacing unparseable config {}: {}", path.display(), e);
            PacerConfig::default()
        })
    } else {
        PacerConfig::default()
    };

    set_value(&mut config, key, value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_toml_string()?)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(config.validate().err())
}
