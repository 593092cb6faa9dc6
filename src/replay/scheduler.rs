use std::time::Duration;

use crate::utils::app_time::{AppInstant, now};

/// A repeating tick source owned by exactly one replay clock.
///
/// The UI frame loop polls `poll_due()` once per frame and runs that many
/// ticks synchronously. Arming always replaces any previous schedule, so a
/// panel can never accumulate a second live timer; disarming is immediate.
/// Tests swap in `ManualScheduler` to drive ticks without wall-clock delays.
pub trait TickScheduler {
    /// Starts (or restarts) the repeating schedule at `interval`.
    fn arm(&mut self, interval: Duration);

    /// Cancels the schedule. Pending ticks are discarded.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;

    /// Number of intervals elapsed since the last poll; zero when disarmed.
    fn poll_due(&mut self) -> u32;
}

/// Wall-clock scheduler used by the running app. Uses the `app_time` instant
/// alias so the same code serves native and wasm builds.
#[derive(Default)]
pub struct WallScheduler {
    armed: Option<ArmedState>,
}

struct ArmedState {
    interval: Duration,
    next_due: AppInstant,
}

impl TickScheduler for WallScheduler {
    fn arm(&mut self, interval: Duration) {
        debug_assert!(!interval.is_zero(), "tick interval must be positive");
        self.armed = Some(ArmedState {
            interval,
            next_due: now() + interval,
        });
    }

    fn disarm(&mut self) {
        self.armed = None;
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    fn poll_due(&mut self) -> u32 {
        let Some(armed) = self.armed.as_mut() else {
            return 0;
        };
        let mut due = 0;
        let current = now();
        while armed.next_due <= current {
            armed.next_due += armed.interval;
            due += 1;
        }
        due
    }
}

/// Deterministic scheduler for tests: ticks fire only when `fire()` is called.
/// Clones share state, so a test can keep a handle while the clock owns the
/// boxed scheduler.
#[derive(Default, Clone)]
pub struct ManualScheduler {
    inner: std::sync::Arc<std::sync::Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    armed: bool,
    pending: u32,
}

impl ManualScheduler {
    pub fn fire(&self, ticks: u32) {
        let mut state = self.inner.lock().unwrap();
        if state.armed {
            state.pending += ticks;
        }
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self, _interval: Duration) {
        let mut state = self.inner.lock().unwrap();
        state.armed = true;
        state.pending = 0;
    }

    fn disarm(&mut self) {
        let mut state = self.inner.lock().unwrap();
        state.armed = false;
        state.pending = 0;
    }

    fn is_armed(&self) -> bool {
        self.inner.lock().unwrap().armed
    }

    fn poll_due(&mut self) -> u32 {
        std::mem::take(&mut self.inner.lock().unwrap().pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_only_fires_when_armed() {
        let mut scheduler = ManualScheduler::default();
        scheduler.fire(3);
        assert_eq!(scheduler.poll_due(), 0, "disarmed scheduler must stay silent");

        scheduler.arm(Duration::from_millis(100));
        scheduler.fire(2);
        assert_eq!(scheduler.poll_due(), 2);
        assert_eq!(scheduler.poll_due(), 0, "poll drains pending ticks");
    }

    #[test]
    fn test_rearm_discards_pending_ticks() {
        let mut scheduler = ManualScheduler::default();
        scheduler.arm(Duration::from_millis(100));
        scheduler.fire(5);
        scheduler.arm(Duration::from_millis(50));
        assert_eq!(scheduler.poll_due(), 0, "re-arm must reset the schedule");
    }
}
