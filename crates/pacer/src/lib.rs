//! Timer-driven rate limiting for tokio
//!
//! This crate provides two independent wrappers around a callback:
//! - [`Debounced`]: collapses a burst of calls into one trailing call after a
//!   quiet period
//! - [`Throttled`]: runs at most once per interval, leading edge immediately
//!   and trailing edge with the latest arguments
//!
//! Both capture a tokio runtime handle at construction and schedule their
//! timers as spawned tasks. Each instance owns at most one pending timer.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pacer::Result<()> {
//! use std::time::Duration;
//!
//! let save = pacer::debounce(|text: String| println!("saving {text}"), Duration::from_millis(50))?;
//! save.call("draft 1".to_string());
//! save.call("draft 2".to_string()); // only this one is saved
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod throttle;
mod timer;

pub use debounce::Debounced;
pub use throttle::{Phase, Throttled};

pub use pacer_core::{Delay, PacerError, Result};

/// Wrap `callback` so repeated calls collapse into one trailing call
///
/// See [`Debounced`]. Fails if `delay` is negative or non-finite, or if no
/// tokio runtime is running on the current thread.
pub fn debounce<A, F, D>(callback: F, delay: D) -> Result<Debounced<A>>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
    D: TryInto<Delay>,
    D::Error: Into<PacerError>,
{
    Debounced::new(callback, delay.try_into().map_err(Into::into)?)
}

/// Wrap `callback` so it runs at most once per `interval`
///
/// See [`Throttled`]. Fails if `interval` is negative or non-finite, or if
/// no tokio runtime is running on the current thread.
pub fn throttle<A, F, D>(callback: F, interval: D) -> Result<Throttled<A>>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
    D: TryInto<Delay>,
    D::Error: Into<PacerError>,
{
    Throttled::new(callback, interval.try_into().map_err(Into::into)?)
}

/// Handle of the runtime the caller is running on
fn current_runtime() -> Result<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current().map_err(|e| PacerError::NoRuntime(e.to_string()))
}
