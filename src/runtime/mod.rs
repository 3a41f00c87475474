//! Tick loop plumbing: time, cancellation and call deadlines
pub mod clock;
pub mod watchdog;

pub use self::clock::{sleep_cancellable, Clock, ManualClock, SystemClock};
pub use self::watchdog::Watchdog;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop request, checked once per tick and inside long sleeps
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
