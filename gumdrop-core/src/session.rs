//! Session countdown timer.
//!
//! A session has a start instant and a countdown duration; the deadline
//! is `start + countdown`. Extensions lengthen the countdown without
//! touching the start, so elapsed time is preserved.

use crate::clock::Instant;

/// Countdown state for one running session
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionTimer {
    start: Instant,
    countdown_ms: u32,
}

impl SessionTimer {
    /// Begin a session of `focus_s` seconds at `now`
    pub fn begin(now: Instant, focus_s: u16) -> Self {
        Self {
            start: now,
            countdown_ms: u32::from(focus_s) * 1000,
        }
    }

    /// Lengthen the deadline by whole minutes
    pub fn extend_minutes(&mut self, minutes: u16) {
        self.countdown_ms = self
            .countdown_ms
            .saturating_add(u32::from(minutes) * 60_000);
    }

    /// Milliseconds elapsed since the session started
    pub fn elapsed_ms(&self, now: Instant) -> u32 {
        now.elapsed_since(self.start)
    }

    /// Milliseconds until the deadline (zero once reached)
    pub fn remaining_ms(&self, now: Instant) -> u32 {
        self.countdown_ms.saturating_sub(self.elapsed_ms(now))
    }

    /// Check whether the deadline has been reached
    pub fn expired(&self, now: Instant) -> bool {
        self.elapsed_ms(now) >= self.countdown_ms
    }

    /// Total countdown duration (ms)
    pub fn countdown_ms(&self) -> u32 {
        self.countdown_ms
    }
}
