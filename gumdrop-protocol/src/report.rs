//! Outbound status lines.
//!
//! Every received line is echoed back, and state changes produce
//! human-readable traces. Only two lines are machine-parsed by the
//! host and must stay byte-exact: `heartbeat_ok` and `done`.

use core::fmt::Write;

use heapless::String;

use crate::command::MAX_SITE_LEN;
use crate::line::MAX_LINE_LEN;

/// Maximum encoded report length (the echo prefix plus a full line)
pub const MAX_REPORT_LEN: usize = MAX_LINE_LEN + 16;

/// Lines sent from the device to the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Verbatim echo of a received (trimmed) line
    Echo(String<MAX_LINE_LEN>),
    /// Boot announcement
    Ready,
    /// Liveness reply to `heartbeat`
    HeartbeatOk,
    /// Session concluded, awaiting host verdict
    Done,
    /// Countdown deadline reached
    SessionComplete,
    /// Session force-terminated by the host
    SessionCut,
    SessionStarted { seconds: u16 },
    SessionExtended { minutes: u16 },
    /// Periodic countdown trace while running
    TimeRemaining { seconds: u32 },
    FocusTimeChanged { seconds: u16 },
    DistractionShown { site: String<MAX_SITE_LEN> },
    SummaryShown { count: u16 },
    WarningPlayed,
    CandyLockEngaged { minutes: u16 },
    CandyLockExpired,
    LockEngaged { seconds: u32 },
    LockExpired,
    VerdictSuccess,
    VerdictFail,
    Dispensing,
}

impl Report {
    /// Encode this report as a single line (no terminator)
    pub fn encode(&self) -> String<MAX_REPORT_LEN> {
        let mut out = String::new();
        // Writes cannot fail: every variant fits MAX_REPORT_LEN
        let _ = match self {
            Report::Echo(line) => write!(out, "Received: {}", line),
            Report::Ready => write!(out, "Ready for commands"),
            Report::HeartbeatOk => write!(out, "heartbeat_ok"),
            Report::Done => write!(out, "done"),
            Report::SessionComplete => write!(out, "Session completed! Sending 'done'"),
            Report::SessionCut => {
                write!(out, "Session ended due to excessive distractions")
            }
            Report::SessionStarted { seconds } => {
                write!(out, "Starting countdown for {} seconds", seconds)
            }
            Report::SessionExtended { minutes } => {
                write!(out, "Session extended by {} minutes", minutes)
            }
            Report::TimeRemaining { seconds } => {
                write!(out, "Time remaining: {} seconds", seconds)
            }
            Report::FocusTimeChanged { seconds } => {
                write!(out, "Focus time set to: {} seconds", seconds)
            }
            Report::DistractionShown { site } => {
                write!(out, "Displayed distraction: {}", site)
            }
            Report::SummaryShown { count } => {
                write!(out, "Summary displayed: {} distractions", count)
            }
            Report::WarningPlayed => write!(out, "Warning buzzer played"),
            Report::CandyLockEngaged { minutes } => {
                write!(out, "Candy locked for {} minutes", minutes)
            }
            Report::CandyLockExpired => write!(out, "Candy lock period ended"),
            Report::LockEngaged { seconds } => {
                write!(out, "LOCKED for {} seconds", seconds)
            }
            Report::LockExpired => write!(out, "Lock period ended"),
            Report::VerdictSuccess => write!(out, "Success received!"),
            Report::VerdictFail => write!(out, "Fail received!"),
            Report::Dispensing => write!(out, "Dispensing candy!"),
        };
        out
    }
}
