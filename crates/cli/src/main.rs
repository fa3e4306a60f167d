//! Pacer CLI - pacer command

use anyhow::Result;
use clap::{Parser, Subcommand};
use pacer_cli::simulate::Mode;
use pacer_cli::{logging, system_config};
use pacer_core::{Delay, PacerConfig};
use std::path::PathBuf;
use tracing::warn;

mod cmd;

/// Pacer - debounce and throttle playground
#[derive(Parser)]
#[command(name = "pacer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter when RUST_LOG is unset (default: from config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a call schedule through a limiter
    #[command(subcommand)]
    Simulate(SimulateCommands),
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum SimulateCommands {
    /// Collapse bursts into one trailing call
    Debounce {
        /// Quiet period, e.g. 50, 50ms, 0.5s (default: from config)
        #[arg(long)]
        delay: Option<Delay>,
        /// Call offsets in milliseconds, e.g. 0,10,20
        #[arg(long)]
        at: String,
    },
    /// Run at most once per interval
    Throttle {
        /// Interval, e.g. 100, 100ms, 1s (default: from config)
        #[arg(long)]
        interval: Option<Delay>,
        /// Call offsets in milliseconds, e.g. 0,30,60,90,120
        #[arg(long)]
        at: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all values
    List,
    /// Print one value
    Get {
        /// Dotted key, e.g. throttle.interval_ms
        key: String,
    },
    /// Set one value
    Set {
        /// Dotted key, e.g. debounce.delay_ms
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example config
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file must not block `pacer config` from repairing it
    let (config, config_error) = match system_config::load() {
        Ok(config) => (config, None),
        Err(e) => (PacerConfig::default(), Some(e)),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let log_dir = cli.log_dir.as_deref().or(config.log.dir.as_deref());
    let _log_guard = logging::init(level, log_dir);

    if let Some(e) = config_error {
        warn!("Using default configuration: {:#}", e);
    }

    match cli.command {
        Commands::Simulate(SimulateCommands::Debounce { delay, at }) => {
            let delay = delay.unwrap_or_else(|| config.debounce_delay());
            cmd::simulate::run(Mode::Debounce, delay, &at).await
        }
        Commands::Simulate(SimulateCommands::Throttle { interval, at }) => {
            let interval = interval.unwrap_or_else(|| config.throttle_interval());
            cmd::simulate::run(Mode::Throttle, interval, &at).await
        }
        Commands::Config(ConfigCommands::List) => cmd::config::run_list(),
        Commands::Config(ConfigCommands::Get { key }) => cmd::config::run_get(&key),
        Commands::Config(ConfigCommands::Set { key, value }) => cmd::config::run_set(&key, &value),
        Commands::Config(ConfigCommands::Path { create }) => cmd::config::run_path(create),
        Commands::Config(ConfigCommands::Example) => cmd::config::run_example(),
    }
}
