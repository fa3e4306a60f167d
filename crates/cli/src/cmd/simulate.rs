//! Replay a call schedule and print the resulting timeline

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pacer_cli::schedule::parse_offsets;
use pacer_cli::simulate::{self, Event, Mode};
use pacer_core::Delay;

pub async fn run(mode: Mode, wait: Delay, at: &str) -> Result<()> {
    let offsets = parse_offsets(at).context("Invalid --at schedule")?;
    let events = simulate::run(mode, wait, &offsets).await?;

    let wait_label = match mode {
        Mode::Debounce => "delay",
        Mode::Throttle => "interval",
    };
    println!(
        "{} {}={}  {}",
        mode.to_string().bold(),
        wait_label,
        wait,
        format!("({} calls)", offsets.len()).dimmed()
    );

    for event in &events {
        match *event {
            Event::Call { at_ms, seq } => {
                println!("  t={:>6}ms  {} #{}", at_ms, "call".dimmed(), seq);
            }
            Event::Run { at_ms, seq } => {
                println!(
                    "  t={:>6}ms  {}  #{} {}",
                    at_ms,
                    "run".green(),
                    seq,
                    format!("(args of call at {}ms)", offsets[seq]).dimmed()
                );
            }
        }
    }

    println!(
        "\n{} calls → {} runs",
        offsets.len(),
        simulate::run_count(&events).to_string().green()
    );

    Ok(())
}
