//! Fixed design constants and runtime tunables.
//!
//! There is no persisted configuration: everything re-initializes at
//! power-up, and the only user-adjustable value (`focus time`) lives in
//! the controller itself. `Tunables` collects the timing constants so
//! tests can shrink them where useful.

/// Timing constants for the control loop
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tunables {
    /// Minimum configurable session length (seconds)
    pub focus_min_s: u16,
    /// Maximum configurable session length (seconds)
    pub focus_max_s: u16,
    /// Button adjustment step (seconds)
    pub focus_step_s: u16,
    /// Session length at power-up (seconds)
    pub focus_default_s: u16,
    /// Punitive lock duration (ms)
    pub lock_ms: u32,
    /// Transient red-indicator override duration (ms)
    pub eyes_red_ms: u32,
    /// Button hold-off after an accepted press (ms)
    pub debounce_ms: u32,
    /// Lock-screen flash half-period (ms)
    pub flash_half_period_ms: u32,
    /// Interval between `Time remaining` serial traces (ms)
    pub remaining_trace_ms: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            focus_min_s: 5,
            focus_max_s: 3600,
            focus_step_s: 5,
            focus_default_s: 20,
            lock_ms: 30_000,
            eyes_red_ms: 3_000,
            debounce_ms: 200,
            flash_half_period_ms: 500,
            remaining_trace_ms: 10_000,
        }
    }
}

/// One buzzer note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

/// Completion melody: ascending C4..C5 scale
pub const SUCCESS_MELODY: [Note; 8] = [
    Note { freq_hz: 262, duration_ms: 200 },
    Note { freq_hz: 294, duration_ms: 200 },
    Note { freq_hz: 330, duration_ms: 200 },
    Note { freq_hz: 349, duration_ms: 200 },
    Note { freq_hz: 392, duration_ms: 300 },
    Note { freq_hz: 440, duration_ms: 300 },
    Note { freq_hz: 494, duration_ms: 400 },
    Note { freq_hz: 523, duration_ms: 600 },
];

/// Silence between melody notes (ms)
pub const NOTE_GAP_MS: u16 = 50;

/// Warning pattern: pulses, on time, off time, tone
pub const WARNING_PULSES: u8 = 3;
pub const WARNING_ON_MS: u16 = 200;
pub const WARNING_OFF_MS: u16 = 100;
pub const WARNING_FREQ_HZ: u16 = 1000;

/// Dispenser servo positions and dwell
pub const SERVO_CLOSED_DEG: u8 = 30;
pub const SERVO_OPEN_DEG: u8 = 90;
pub const SERVO_DWELL_MS: u16 = 500;
