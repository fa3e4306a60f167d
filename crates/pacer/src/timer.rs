//! Single-slot timer shared by both limiters
//!
//! A [`TimerSlot`] holds at most one pending task. Arming it aborts the
//! previous task and bumps a generation counter; a task that already woke
//! up before the abort landed sees a stale generation in [`TimerSlot::settle`]
//! and does nothing.

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    /// Pending timer task, if any
    handle: Option<JoinHandle<()>>,
    /// Identifies the most recently armed timer
    generation: u64,
}

impl TimerSlot {
    /// Schedule `fire` at `deadline`, replacing any pending timer
    ///
    /// `fire` receives the generation it was armed with and must pass it to
    /// [`TimerSlot::settle`] before acting.
    pub(crate) fn arm<F>(&mut self, runtime: &Handle, deadline: Instant, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();

        let generation = self.generation;
        self.handle = Some(runtime.spawn(async move {
            sleep_until(deadline).await;
            fire(generation);
        }));

        generation
    }

    /// Abort the pending timer, if any
    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            debug!(generation = self.generation, "Superseding pending timer");
            handle.abort();
        }
    }

    /// Claim the slot for a timer that just fired
    ///
    /// Returns false when `generation` was superseded in the meantime.
    pub(crate) fn settle(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.handle.is_none() {
            return false;
        }
        self.handle = None;
        true
    }

    /// Whether a timer is pending
    pub(crate) fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_rearm_supersedes_previous() {
        let slot = Arc::new(Mutex::new(TimerSlot::default()));
        let fired = Arc::new(Mutex::new(Vec::new()));
        let runtime = Handle::current();
        let start = Instant::now();

        for label in ["first", "second"] {
            let slot_ref = Arc::clone(&slot);
            let fired_ref = Arc::clone(&fired);
            slot.lock().arm(&runtime, start + Duration::from_millis(10), move |generation| {
                if slot_ref.lock().settle(generation) {
                    fired_ref.lock().push(label);
                }
            });
        }

        sleep(Duration::from_millis(50)).await;
        assert_eq!(*fired.lock(), vec!["second"]);
        assert!(!slot.lock().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let slot = Arc::new(Mutex::new(TimerSlot::default()));
        let fired = Arc::new(Mutex::new(0));
        let slot_ref = Arc::clone(&slot);
        let fired_ref = Arc::clone(&fired);

        slot.lock().arm(
            &Handle::current(),
            Instant::now() + Duration::from_millis(5),
            move |generation| {
                if slot_ref.lock().settle(generation) {
                    *fired_ref.lock() += 1;
                }
            },
        );
        assert!(slot.lock().is_armed());

        slot.lock().cancel();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(*fired.lock(), 0);
    }

    #[test]
    fn test_settle_rejects_stale_generation() {
        let mut slot = TimerSlot::default();
        let stale = slot.generation;
        slot.cancel();
        assert!(!slot.settle(stale));
    }
}
