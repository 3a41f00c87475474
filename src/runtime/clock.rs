//! Time sources for the tick loop

use super::CancelToken;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of time and delay
pub trait Clock: Send + Sync {
    /// Time since the clock started
    fn now(&self) -> Duration;

    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time: sleeping advances the clock immediately.
///
/// Clones share the same timeline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Sleep in `slice`-sized steps, returning early once `cancel` fires.
///
/// Returns false if the sleep was cut short.
pub fn sleep_cancellable<C: Clock + ?Sized>(
    clock: &C,
    total: Duration,
    slice: Duration,
    cancel: &CancelToken,
) -> bool {
    let slice = slice.max(Duration::from_millis(1));
    let mut remaining = total;
    while !remaining.is_zero() {
        if cancel.is_cancelled() {
            return false;
        }
        let step = remaining.min(slice);
        clock.sleep(step);
        remaining -= step;
    }
    !cancel.is_cancelled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.sleep(Duration::from_millis(250));
        assert_eq!(other.now(), Duration::from_millis(250));
    }

    #[test]
    fn cancellable_sleep_runs_to_completion() {
        let clock = ManualClock::new();
        let cancel = CancelToken::new();
        assert!(sleep_cancellable(
            &clock,
            Duration::from_millis(130),
            Duration::from_millis(50),
            &cancel
        ));
        assert_eq!(clock.now(), Duration::from_millis(130));
    }

    #[test]
    fn cancelled_sleep_returns_early() {
        let clock = ManualClock::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(!sleep_cancellable(
            &clock,
            Duration::from_secs(10),
            Duration::from_millis(50),
            &cancel
        ));
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
