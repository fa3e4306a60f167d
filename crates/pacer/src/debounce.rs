//! Trailing-edge debouncing
//!
//! Collapses a burst of calls into a single invocation that fires once the
//! calls stop for the configured delay.

use crate::timer::TimerSlot;
use pacer_core::{Delay, Result};
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::debug;

/// Debounced wrapper around a callback
///
/// Every [`call`](Debounced::call) cancels the previously scheduled
/// invocation and schedules a new one `delay` later. The callback runs once,
/// with the arguments of the last call, after a quiet period of `delay`.
///
/// - The callback always runs on a runtime task, never inline in `call`,
///   even for a zero delay.
/// - A panic in the callback stays on that task.
/// - Clones share the same pending timer.
/// - Dropping every handle does not cancel an already scheduled call.
pub struct Debounced<A> {
    shared: Arc<Shared<A>>,
}

struct Shared<A> {
    delay: Delay,
    callback: Box<dyn Fn(A) + Send + Sync>,
    runtime: Handle,
    state: Mutex<Pending<A>>,
    /// Serializes callback executions
    run_guard: ReentrantMutex<()>,
}

struct Pending<A> {
    timer: TimerSlot,
    args: Option<A>,
}

impl<A: Send + 'static> Debounced<A> {
    /// Create on the runtime the caller is running on
    pub fn new<F>(callback: F, delay: Delay) -> Result<Self>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Ok(Self::with_handle(crate::current_runtime()?, callback, delay))
    }

    /// Create on an explicit runtime, usable from outside it
    pub fn with_handle<F>(runtime: Handle, callback: F, delay: Delay) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                delay,
                callback: Box::new(callback),
                runtime,
                state: Mutex::new(Pending {
                    timer: TimerSlot::default(),
                    args: None,
                }),
                run_guard: ReentrantMutex::new(()),
            }),
        }
    }

    /// Record a call and restart the quiet period
    pub fn call(&self, args: A) {
        let deadline = Instant::now() + self.shared.delay.as_duration();
        let shared = Arc::clone(&self.shared);

        let mut state = self.shared.state.lock();
        state.args = Some(args);
        let generation = state
            .timer
            .arm(&self.shared.runtime, deadline, move |generation| shared.fire(generation));

        debug!(generation, delay = %self.shared.delay, "Debounce timer armed");
    }

    /// Whether a trailing invocation is scheduled
    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().timer.is_armed()
    }

    /// Configured quiet period
    pub fn delay(&self) -> Delay {
        self.shared.delay
    }
}

impl<A> Shared<A> {
    fn fire(&self, generation: u64) {
        // Settling under the run guard keeps runs in arming order: a timer
        // that lost the race for the guard finds itself superseded.
        let _running = self.run_guard.lock();
        let args = {
            let mut state = self.state.lock();
            if !state.timer.settle(generation) {
                return;
            }
            state.args.take()
        };

        if let Some(args) = args {
            debug!(generation, "Debounced call firing");
            (self.callback)(args);
        }
    }
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.shared.delay)
            .field("pending", &self.shared.state.lock().timer.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |n| sink.lock().push(n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_call() {
        let (calls, callback) = recorder();
        let debounced = Debounced::new(callback, Delay::from_millis(50)).unwrap();

        for n in 1..=5 {
            debounced.call(n);
            sleep(Duration::from_millis(10)).await;
        }
        assert!(calls.lock().is_empty());
        assert!(debounced.is_pending());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(*calls.lock(), vec![5]);
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_is_deferred() {
        let (calls, callback) = recorder();
        let debounced = Debounced::new(callback, Delay::ZERO).unwrap();

        debounced.call(1);
        assert!(calls.lock().is_empty());

        tokio::task::yield_now().await;
        sleep(Duration::from_millis(1)).await;
        assert_eq!(*calls.lock(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_called_never_fires() {
        let (calls, callback) = recorder();
        let _debounced = Debounced::new(callback, Delay::from_millis(5)).unwrap();

        sleep(Duration::from_millis(100)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_timer() {
        let (calls, callback) = recorder();
        let a = Debounced::new(callback, Delay::from_millis(20)).unwrap();
        let b = a.clone();

        a.call(1);
        sleep(Duration::from_millis(5)).await;
        b.call(2);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(*calls.lock(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_keeps_scheduled_call() {
        let (calls, callback) = recorder();
        let debounced = Debounced::new(callback, Delay::from_millis(20)).unwrap();

        debounced.call(7);
        drop(debounced);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(*calls.lock(), vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_callback_stays_on_timer_task() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debounced = Debounced::new(
            move |n: u32| {
                if n == 1 {
                    panic!("callback failed for {n}");
                }
                sink.lock().push(n);
            },
            Delay::from_millis(10),
        )
        .unwrap();

        debounced.call(1);
        sleep(Duration::from_millis(50)).await;
        assert!(calls.lock().is_empty());
        assert!(!debounced.is_pending());

        // The instance keeps working after the panic
        debounced.call(2);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(*calls.lock(), vec![2]);
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let err = Debounced::new(|_: ()| {}, Delay::from_millis(1)).unwrap_err();
        assert!(matches!(err, pacer_core::PacerError::NoRuntime(_)));
    }
}
