use std::time::{Duration, Instant};

/// Injectable time source for the replay driver.
///
/// The driver never touches the wall clock directly: pacing and elapsed-time
/// measurement both go through this trait, so tests can replay a full trace
/// without real delays.
pub trait Clock {
    /// Monotonic elapsed time since the clock was created.
    fn now(&self) -> Duration;

    /// Suspend until `d` has passed. This is the only yield point in a
    /// replay.
    fn sleep(&mut self, d: Duration);
}

/// Wall-clock implementation backed by [`Instant`] and `thread::sleep`.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
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

    fn sleep(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Test clock that advances its own notion of now instantly on every sleep.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, d: Duration) {
        self.now += d;
    }
}
