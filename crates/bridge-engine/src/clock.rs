//! Time source used by every poll and pause in the engine.
//!
//! Production code sleeps the calling thread; tests substitute
//! [`ManualClock`], which advances virtual time instantly and records every
//! requested pause.

use std::{
    thread,
    time::{Duration, Instant},
};

/// Monotonic clock plus a blocking sleep.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
    /// Block for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall clock backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

/// A bounded wait: start instant plus timeout.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout: Duration,
}

impl Deadline {
    /// Start a deadline now.
    pub fn start(clock: &dyn Clock, timeout: Duration) -> Self {
        Self {
            start: clock.now(),
            timeout,
        }
    }

    /// Time since the deadline started.
    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        clock.now().saturating_duration_since(self.start)
    }

    /// True once `elapsed >= timeout`.
    pub fn expired(&self, clock: &dyn Clock) -> bool {
        self.elapsed(clock) >= self.timeout
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;

    use super::Clock;

    /// Virtual clock: `sleep` advances time immediately and is recorded.
    #[derive(Debug)]
    pub struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
        sleeps: Mutex<Vec<Duration>>,
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ManualClock {
        /// Create a clock at virtual time zero.
        pub fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
                sleeps: Mutex::new(Vec::new()),
            }
        }

        /// Total virtual time elapsed.
        pub fn elapsed(&self) -> Duration {
            *self.offset.lock()
        }

        /// Every pause requested so far, in order.
        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().clone()
        }

        /// Advance without recording a sleep.
        pub fn advance(&self, d: Duration) {
            *self.offset.lock() += d;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock()
        }

        fn sleep(&self, d: Duration) {
            self.sleeps.lock().push(d);
            *self.offset.lock() += d;
        }
    }
}
