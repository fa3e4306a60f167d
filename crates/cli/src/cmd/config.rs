//! Configuration management command
//!
//! Provides CLI interface to view and edit the config file.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pacer_cli::system_config;
use pacer_core::config::MAX_WAIT_MS;

/// List all configuration values
pub fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[debounce]".yellow());
    println!("  {} = {}", "delay_ms".cyan(), config.debounce.delay_ms);

    println!("\n{}", "[throttle]".yellow());
    println!("  {} = {}", "interval_ms".cyan(), config.throttle.interval_ms);

    println!("\n{}", "[log]".yellow());
    println!("  {} = {}", "level".cyan(), config.log.level);
    println!(
        "  {} = {}",
        "dir".cyan(),
        match &config.log.dir {
            Some(dir) => dir.display().to_string(),
            None => "(stderr only)".dimmed().to_string(),
        }
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  delay_ms, interval_ms: 0-{}", MAX_WAIT_MS);
    println!("  level: {}", pacer_core::config::LOG_LEVELS.join(", "));

    Ok(())
}

/// Get a single configuration value
pub fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", system_config::get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub fn run_set(key: &str, value: &str) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;
    let remaining = system_config::edit_file(&config_path, key, value)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    if let Some(problem) = remaining {
        println!("{} {}", "Config is still invalid:".yellow(), problem);
    }
    Ok(())
}

/// Show the config file path and optionally create it
pub fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else {
        println!("{}", config_path.display());
        if !config_path.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
    }

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    println!("{}", system_config::example_config()?);
    Ok(())
}
