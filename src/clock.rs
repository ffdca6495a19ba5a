//! Monotonic millisecond clocks.
//!
//! Timestamps are `u32` milliseconds that wrap after ~49.7 days, like a
//! microcontroller uptime counter. Differences must be taken with
//! `wrapping_sub`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic millisecond timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary, fixed origin (wrapping).
    fn now_ms(&self) -> u32;
}

/// Wall-independent clock counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    #[must_use]
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
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        // wraps like a 32-bit uptime counter
        self.origin.elapsed().as_millis() as u32
    }
}

/// Manually driven clock for tests and simulations.
///
/// Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU32>,
}

impl ManualClock {
    /// Create a clock reading `start` milliseconds.
    #[must_use]
    pub fn new(start: u32) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(start)),
        }
    }

    /// Set the current time.
    pub fn set(&self, now_ms: u32) {
        self.now.store(now_ms, Ordering::Relaxed);
    }

    /// Move time forward by `ms` (wrapping).
    pub fn advance_ms(&self, ms: u32) {
        let mut current = self.now.load(Ordering::Relaxed);
        loop {
            match self.now.compare_exchange_weak(
                current,
                current.wrapping_add(ms),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.advance_ms(duration_to_ms(by));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ManualClock").field(&self.now_ms()).finish()
    }
}

/// Convert a duration to whole milliseconds, saturating at `u32::MAX`.
#[must_use]
pub fn duration_to_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
