//! Monotonic millisecond clock types.
//!
//! All timing in the firmware is relative to one free-running 32-bit
//! millisecond counter. The counter wraps (about every 49.7 days);
//! durations are always computed as wrapping unsigned subtraction of
//! two readings from the same counter, which stays correct across a
//! single wrap.

/// A reading of the free-running millisecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    /// The counter's value at power-up
    pub const ZERO: Instant = Instant(0);

    /// Wrap a raw millisecond reading
    pub const fn from_millis(ms: u32) -> Self {
        Instant(ms)
    }

    /// Raw millisecond value
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed since an earlier reading
    ///
    /// Wraparound-safe as long as the real gap is under `u32::MAX` ms.
    pub const fn elapsed_since(self, earlier: Instant) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}
