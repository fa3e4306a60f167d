//! Replay a call schedule through a limiter and record what ran when

use anyhow::{Context, Result};
use pacer_core::Delay;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::info;

/// Which limiter to replay through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Debounce,
    Throttle,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Debounce => write!(f, "debounce"),
            Mode::Throttle => write!(f, "throttle"),
        }
    }
}

/// One entry on the replay timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Call number `seq` was made
    Call { at_ms: u64, seq: usize },
    /// The callback ran with the arguments of call number `seq`
    Run { at_ms: u64, seq: usize },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match *self {
            Event::Call { at_ms, .. } | Event::Run { at_ms, .. } => at_ms,
        }
    }
}

/// Replay calls at `offsets` (milliseconds from start) and collect the timeline
///
/// Each call passes its index in `offsets` as the argument, so a `Run`
/// names the call whose arguments survived. Returns once every scheduled
/// trailing run has had time to fire.
pub async fn run(mode: Mode, wait: Delay, offsets: &[u64]) -> Result<Vec<Event>> {
    let start = Instant::now();
    let timeline = Arc::new(Mutex::new(Vec::with_capacity(offsets.len() * 2)));

    let sink = Arc::clone(&timeline);
    let record_run = move |seq: usize| {
        let at_ms = start.elapsed().as_millis() as u64;
        sink.lock().push(Event::Run { at_ms, seq });
    };

    let call: Box<dyn Fn(usize)> = match mode {
        Mode::Debounce => {
            let limiter = pacer::debounce(record_run, wait).context("Failed to build debouncer")?;
            Box::new(move |seq| limiter.call(seq))
        }
        Mode::Throttle => {
            let limiter = pacer::throttle(record_run, wait).context("Failed to build throttler")?;
            Box::new(move |seq| limiter.call(seq))
        }
    };

    info!("Replaying {} calls through {} ({})", offsets.len(), mode, wait);

    for (seq, &offset) in offsets.iter().enumerate() {
        sleep_until(start + Duration::from_millis(offset)).await;
        let at_ms = start.elapsed().as_millis() as u64;
        timeline.lock().push(Event::Call { at_ms, seq });
        call(seq);
    }

    // A trailing run lands at most one wait after the last call
    sleep(wait.as_duration() + Duration::from_millis(1)).await;

    let events = timeline.lock().clone();
    Ok(events)
}

/// Number of `Run` events in a timeline
pub fn run_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Run { .. }))
        .count()
}
