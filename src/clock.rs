//! Time seam for the write settle delay and the read deadline.
//!
//! The read loop polls a non-blocking stream, so all of its timing — the
//! per-poll back-off, the post-write settle, the overall deadline — goes
//! through this trait. Tests inject `ManualClock` and observe sequencing
//! instead of asserting on wall-clock time.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Clock abstraction.
pub trait Clock: Send + std::fmt::Debug {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Pause for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real clock: `Instant::now` and `thread::sleep`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug)]
struct ManualClockState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// Virtual clock for tests.
///
/// `sleep` advances virtual time instead of blocking, and every requested
/// duration is recorded in order. Clones share state.
///
/// # Example
/// ```
/// use quietport::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.sleep(Duration::from_millis(100));
///
/// assert_eq!(clock.now() - start, Duration::from_millis(100));
/// assert_eq!(clock.sleeps(), vec![Duration::from_millis(100)]);
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    state: Arc<Mutex<ManualClockState>>,
}

impl ManualClock {
    /// Create a virtual clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualClockState {
                now: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Advance virtual time without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.lock().now += duration;
    }

    /// All sleep durations requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += duration;
        state.sleeps.push(duration);
    }
}
