//! Leading + trailing edge throttling
//!
//! State machine per instance:
//!
//! ```text
//!            call (runs now)
//!   Idle ─────────────────────▶ Cooldown ──┐ call within window:
//!    ▲                             │  ▲    │ (re)schedule trailing run
//!    │   window elapsed,           │  └────┘ at last_run + interval
//!    └── nothing pending ──────────┘
//! ```
//!
//! A trailing run updates `last_run` to the moment it fires, so it opens a
//! fresh window of its own.

use crate::timer::TimerSlot;
use pacer_core::{Delay, Result};
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Observable throttle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The next call runs immediately
    Idle,
    /// Within the window of the last run, or a trailing run is pending
    Cooldown,
}

/// Throttled wrapper around a callback
///
/// Runs the callback at most once per `interval`:
/// - A call on an idle instance runs the callback immediately, on the
///   caller's thread.
/// - Calls inside the window are coalesced into a single trailing run at
///   `last_run + interval`, using the most recent arguments.
///
/// The last call of a burst is never dropped. There is no way to cancel a
/// scheduled trailing run; dropping every handle does not cancel it either.
pub struct Throttled<A> {
    shared: Arc<Shared<A>>,
}

struct Shared<A> {
    interval: Delay,
    callback: Box<dyn Fn(A) + Send + Sync>,
    runtime: Handle,
    state: Mutex<Window<A>>,
    /// Serializes callback executions; re-entrant so the callback may call
    /// back into its own throttle
    run_guard: ReentrantMutex<()>,
}

struct Window<A> {
    /// Time of the most recent actual execution
    last_run: Option<Instant>,
    timer: TimerSlot,
    /// Arguments of the latest call waiting for the trailing run
    args: Option<A>,
}

impl<A: Send + 'static> Throttled<A> {
    /// Create on the runtime the caller is running on
    pub fn new<F>(callback: F, interval: Delay) -> Result<Self>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Ok(Self::with_handle(crate::current_runtime()?, callback, interval))
    }

    /// Create on an explicit runtime, usable from outside it
    pub fn with_handle<F>(runtime: Handle, callback: F, interval: Delay) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                interval,
                callback: Box::new(callback),
                runtime,
                state: Mutex::new(Window {
                    last_run: None,
                    timer: TimerSlot::default(),
                    args: None,
                }),
                run_guard: ReentrantMutex::new(()),
            }),
        }
    }

    /// Run now if the window is open, otherwise schedule a trailing run
    pub fn call(&self, args: A) {
        let now = Instant::now();
        let interval = self.shared.interval.as_duration();
        let mut state = self.shared.state.lock();

        let last_run = state.last_run;
        let deadline = match last_run {
            Some(last) if now.saturating_duration_since(last) < interval => last + interval,
            _ => {
                // Window open: a trailing run that is due but not yet polled
                // carries older arguments than this call.
                state.timer.cancel();
                state.args = None;
                state.last_run = Some(now);
                drop(state);

                trace!("Throttle leading edge");
                let _running = self.shared.run_guard.lock();
                (self.shared.callback)(args);
                return;
            }
        };

        state.args = Some(args);
        let shared = Arc::clone(&self.shared);
        let generation = state
            .timer
            .arm(&self.shared.runtime, deadline, move |generation| shared.fire(generation));

        debug!(generation, ?interval, "Throttle trailing run scheduled");
    }

    /// Current state of the window
    pub fn phase(&self) -> Phase {
        let state = self.shared.state.lock();
        if state.timer.is_armed() {
            return Phase::Cooldown;
        }

        match state.last_run {
            Some(last) if Instant::now().saturating_duration_since(last) < self.shared.interval.as_duration() => {
                Phase::Cooldown
            }
            _ => Phase::Idle,
        }
    }

    /// Whether a trailing run is scheduled
    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().timer.is_armed()
    }

    /// Configured interval
    pub fn interval(&self) -> Delay {
        self.shared.interval
    }
}

impl<A> Shared<A> {
    fn fire(&self, generation: u64) {
        // Taken before settling, so a trailing run that loses the race for
        // the guard to a newer run is already superseded when it gets it.
        let _running = self.run_guard.lock();
        let args = {
            let mut state = self.state.lock();
            if !state.timer.settle(generation) {
                return;
            }
            // Recomputed at fire time so the new window starts now
            state.last_run = Some(Instant::now());
            state.args.take()
        };

        if let Some(args) = args {
            debug!(generation, "Throttle trailing edge");
            (self.callback)(args);
        }
    }
}

impl<A> Clone for Throttled<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for Throttled<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("interval", &self.shared.interval)
            .field("pending", &self.shared.state.lock().timer.is_armed())
            .finish()
    }
}
