//! Timed lock windows.
//!
//! Both locks are plain duration windows against the monotonic clock:
//! the punitive full-device lock (fixed 30 s) and the host-configured
//! candy lock (10/20 min). Re-arming a window restarts it.

use crate::clock::Instant;

/// One timed window keyed off the monotonic clock
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedWindow {
    start: Instant,
    duration_ms: u32,
}

impl TimedWindow {
    /// Open a window of `duration_ms` starting at `now`
    pub fn open(now: Instant, duration_ms: u32) -> Self {
        Self {
            start: now,
            duration_ms,
        }
    }

    /// Check whether the window has elapsed
    pub fn expired(&self, now: Instant) -> bool {
        now.elapsed_since(self.start) >= self.duration_ms
    }

    /// Milliseconds left in the window (zero once elapsed)
    pub fn remaining_ms(&self, now: Instant) -> u32 {
        self.duration_ms
            .saturating_sub(now.elapsed_since(self.start))
    }

    /// Whole seconds left in the window
    pub fn remaining_secs(&self, now: Instant) -> u32 {
        self.remaining_ms(now) / 1000
    }
}
