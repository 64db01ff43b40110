//! Inbound command parsing.
//!
//! Commands arrive as single trimmed text lines. Dispatch is by exact
//! match, except for the two parameterized prefix forms
//! `distraction_<count>_<site>` and `summary_<count>`. Anything else is
//! unrecognized and must be silently ignored by the caller.

use heapless::String;

/// Maximum stored site-name length for distraction commands
pub const MAX_SITE_LEN: usize = 80;

/// Commands from the supervising host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Sound the warning pattern and flash the eyes red
    Buzzer,
    /// Liveness probe; device answers `heartbeat_ok`
    Heartbeat,
    /// Show a distraction notice (count + offending site)
    Distraction {
        count: u16,
        site: String<MAX_SITE_LEN>,
    },
    /// Add minutes to the running countdown deadline
    Extend { minutes: u16 },
    /// Block candy dispensing for the given number of minutes
    CandyLock { minutes: u16 },
    /// Force-terminate the running session (too many strikes)
    EndSession,
    /// Show the end-of-session distraction summary
    Summary { count: u16 },
    /// Engage the punitive full-device lock
    Lock,
    /// Host verdict: session passed
    Success,
    /// Host verdict: session failed
    Fail,
}

impl Command {
    /// Parse a command from a trimmed line
    ///
    /// Returns `None` for unrecognized or malformed input; the
    /// protocol has no error replies, only silence.
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "buzzer" => Some(Command::Buzzer),
            "heartbeat" => Some(Command::Heartbeat),
            "extend_10" => Some(Command::Extend { minutes: 10 }),
            "extend_20" => Some(Command::Extend { minutes: 20 }),
            "candy_lock_10" => Some(Command::CandyLock { minutes: 10 }),
            "candy_lock_20" => Some(Command::CandyLock { minutes: 20 }),
            "end_session" => Some(Command::EndSession),
            "lock" => Some(Command::Lock),
            "success" => Some(Command::Success),
            "fail" => Some(Command::Fail),
            _ => Self::parse_prefixed(line),
        }
    }

    /// Parse the two parameterized prefix forms
    fn parse_prefixed(line: &str) -> Option<Self> {
        if let Some(rest) = line.strip_prefix("distraction_") {
            // Both underscore-delimited fields are required; a missing
            // second delimiter makes the whole line malformed.
            let (count, site) = rest.split_once('_')?;
            let mut stored = String::new();
            for c in site.chars() {
                if stored.push(c).is_err() {
                    break;
                }
            }
            Some(Command::Distraction {
                count: leading_int(count),
                site: stored,
            })
        } else if let Some(rest) = line.strip_prefix("summary_") {
            Some(Command::Summary {
                count: leading_int(rest),
            })
        } else {
            None
        }
    }
}

/// Permissive integer parse: consume leading decimal digits, anything
/// else (including an empty string) reads as zero.
fn leading_int(s: &str) -> u16 {
    let mut value: u16 = 0;
    for c in s.chars() {
        match c.to_digit(10) {
            Some(d) => value = value.saturating_mul(10).saturating_add(d as u16),
            None => break,
        }
    }
    value
}
