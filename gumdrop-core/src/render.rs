//! Screen rendering for the 16x2 character display.
//!
//! Screens are built as plain two-line text buffers; the firmware's
//! display driver draws them. The two stateful renderers here implement
//! the redraw-minimization rules: the running countdown redraws only
//! when the displayed minute:second pair changes, and the punitive-lock
//! display flashes at a 500 ms half-period, redrawing only on a phase
//! or second change.

use core::fmt::Write;

use heapless::String;

use crate::clock::Instant;

/// Display columns
pub const SCREEN_COLS: usize = 16;

/// Display rows
pub const SCREEN_ROWS: usize = 2;

/// One full display frame (two rows, truncated to 16 columns)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub top: String<SCREEN_COLS>,
    pub bottom: String<SCREEN_COLS>,
}

impl Screen {
    /// Build a screen from two lines, truncating each to 16 columns
    pub fn new(top: &str, bottom: &str) -> Self {
        Self {
            top: fit(top),
            bottom: fit(bottom),
        }
    }

    /// An empty (cleared) screen
    pub fn blank() -> Self {
        Self {
            top: String::new(),
            bottom: String::new(),
        }
    }
}

/// Truncate text to one display line
fn fit(text: &str) -> String<SCREEN_COLS> {
    let mut line = String::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

// ---- screen builders -------------------------------------------------

/// Idle screen: configured focus time
pub fn set_time(focus_s: u16) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "{} sec", focus_s);
    Screen {
        top: fit("Set Time:"),
        bottom,
    }
}

/// Running countdown, minutes and seconds remaining
pub fn countdown(min: u32, sec: u32) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "{:2}m {:02}s", min, sec);
    Screen {
        top: fit("Focus Time:"),
        bottom,
    }
}

/// Punitive lock countdown (flash-on phase)
pub fn lock_countdown(sec: u32) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "Unlock in: {}s", sec);
    Screen {
        top: fit("*** LOCKED ***"),
        bottom,
    }
}

pub fn session_starting() -> Screen {
    Screen::new("Focus Session", "Starting...")
}

pub fn session_done() -> Screen {
    Screen::new("Session Done!", "Checking...")
}

pub fn session_extended(minutes: u16) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "+{} minutes!", minutes);
    Screen {
        top: fit("Session Extended"),
        bottom,
    }
}

pub fn session_ended() -> Screen {
    Screen::new("Session Ended!", "Too many strikes")
}

pub fn session_failed() -> Screen {
    Screen::new("Session failed!", "Try again later")
}

pub fn distraction(count: u16, site: &str) -> Screen {
    let mut top: String<SCREEN_COLS> = String::new();
    let _ = write!(top, "Distraction #{}", count);
    Screen {
        top,
        bottom: fit(site),
    }
}

pub fn summary(count: u16) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "Distractions: {}", count);
    Screen {
        top: fit("Session Summary:"),
        bottom,
    }
}

/// Candy lock just engaged, duration in minutes
pub fn candy_lock_engaged(minutes: u16) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "For {} minutes", minutes);
    Screen {
        top: fit("Candy Locked!"),
        bottom,
    }
}

/// Success arrived while the candy lock is active
pub fn candy_lock_wait(remaining_s: u32) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "Wait {}m {}s", remaining_s / 60, remaining_s % 60);
    Screen {
        top: fit("Candy is locked!"),
        bottom,
    }
}

/// Idle-screen interleave card while the candy lock is active
pub fn candy_lock_left(remaining_s: u32) -> Screen {
    let mut bottom: String<SCREEN_COLS> = String::new();
    let _ = write!(bottom, "{}m {}s left", remaining_s / 60, remaining_s % 60);
    Screen {
        top: fit("Candy Locked!"),
        bottom,
    }
}

pub fn great_job() -> Screen {
    Screen::new("Great job!", "Candy earned!")
}

pub fn dispensing() -> Screen {
    Screen::new("Dispensing...", "Enjoy! :)")
}

pub fn dispensed() -> Screen {
    Screen::new("Candy Dispensed!", "Well done!")
}

// ---- stateful renderers ----------------------------------------------

/// Redraw-minimized countdown renderer
///
/// Emits a screen only when the displayed minute:second pair changes.
#[derive(Debug, Clone, Default)]
pub struct CountdownCache {
    last_shown: Option<(u32, u32)>,
}

impl CountdownCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached value (forces a redraw on the next update)
    pub fn reset(&mut self) {
        self.last_shown = None;
    }

    /// Update with the remaining session time; returns a screen to draw
    /// only if the displayed value changed
    pub fn update(&mut self, remaining_ms: u32) -> Option<Screen> {
        let total_s = remaining_ms / 1000;
        let pair = (total_s / 60, total_s % 60);
        if self.last_shown == Some(pair) {
            return None;
        }
        self.last_shown = Some(pair);
        Some(countdown(pair.0, pair.1))
    }
}

/// Flashing punitive-lock renderer
///
/// The display alternates between the lock countdown and a blank screen
/// every half-period; redraws happen only on a phase flip or when the
/// displayed second changes.
#[derive(Debug, Clone)]
pub struct LockFlash {
    phase_on: bool,
    last_toggle: Instant,
    last_shown: Option<(bool, u32)>,
    half_period_ms: u32,
}

impl LockFlash {
    pub fn new(half_period_ms: u32) -> Self {
        Self {
            phase_on: false,
            last_toggle: Instant::ZERO,
            last_shown: None,
            half_period_ms,
        }
    }

    /// Restart the flash cycle (called when the lock engages)
    pub fn reset(&mut self, now: Instant) {
        self.phase_on = false;
        self.last_toggle = now;
        self.last_shown = None;
    }

    /// Update with the remaining lock time; returns a screen to draw
    /// only if the phase or displayed second changed
    pub fn update(&mut self, now: Instant, remaining_ms: u32) -> Option<Screen> {
        if now.elapsed_since(self.last_toggle) > self.half_period_ms {
            self.phase_on = !self.phase_on;
            self.last_toggle = now;
        }

        let sec = remaining_ms / 1000;
        let shown = (self.phase_on, sec);
        if self.last_shown == Some(shown) {
            return None;
        }
        self.last_shown = Some(shown);

        Some(if self.phase_on {
            lock_countdown(sec)
        } else {
            Screen::blank()
        })
    }
}
