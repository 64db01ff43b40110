//! State machine definition
//!
//! The primary mode is exclusive: exactly one of idle, running,
//! awaiting-verdict, or locked at any instant. The candy lock and the
//! transient red-eye override are orthogonal overlays tracked by the
//! controller, not modes.

use super::events::Event;

/// Primary device modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Idle: focus time adjustable, session can be started
    Idle,
    /// Focus countdown actively running
    Running,
    /// Session concluded, waiting for the host's success/fail verdict
    AwaitingVerdict,
    /// Punitive lock window: suppresses all session and button logic
    Locked,
}

impl Mode {
    /// Check if button input is handled in this mode
    pub fn buttons_allowed(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    /// Check if a countdown is actively running
    pub fn in_session(&self) -> bool {
        matches!(self, Mode::Running)
    }

    /// Check if the punitive lock is active
    pub fn is_locked(&self) -> bool {
        matches!(self, Mode::Locked)
    }

    /// Process an event and return the next mode
    ///
    /// This is the core mode transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // Idle transitions
            (Idle, StartPressed) => Running,

            // Running transitions
            (Running, DeadlineReached) => AwaitingVerdict,
            (Running, SessionCut) => AwaitingVerdict,

            // AwaitingVerdict transitions
            (AwaitingVerdict, VerdictSuccess) => Idle,
            (AwaitingVerdict, VerdictFail) => Idle,

            // The punitive lock supersedes every mode; re-arming while
            // already locked stays locked (the timer restart is the
            // controller's job)
            (_, LockEngaged) => Locked,
            (Locked, LockExpired) => Idle,

            // Default: stay in current mode
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_flow() {
        let mode = Mode::Idle;

        let running = mode.transition(Event::StartPressed);
        assert_eq!(running, Mode::Running);

        let waiting = running.transition(Event::DeadlineReached);
        assert_eq!(waiting, Mode::AwaitingVerdict);

        let idle = waiting.transition(Event::VerdictSuccess);
        assert_eq!(idle, Mode::Idle);
    }

    #[test]
    fn test_session_cut_enters_waiting() {
        let mode = Mode::Running.transition(Event::SessionCut);
        assert_eq!(mode, Mode::AwaitingVerdict);
    }

    #[test]
    fn test_fail_returns_to_idle() {
        let mode = Mode::AwaitingVerdict.transition(Event::VerdictFail);
        assert_eq!(mode, Mode::Idle);
    }

    #[test]
    fn test_lock_from_any_mode() {
        let modes = [
            Mode::Idle,
            Mode::Running,
            Mode::AwaitingVerdict,
            Mode::Locked,
        ];

        for mode in modes {
            assert_eq!(mode.transition(Event::LockEngaged), Mode::Locked);
        }
    }

    #[test]
    fn test_lock_expiry_returns_to_idle() {
        let mode = Mode::Locked.transition(Event::LockExpired);
        assert_eq!(mode, Mode::Idle);
    }

    #[test]
    fn test_verdict_ignored_unless_waiting() {
        assert_eq!(Mode::Idle.transition(Event::VerdictSuccess), Mode::Idle);
        assert_eq!(Mode::Running.transition(Event::VerdictFail), Mode::Running);
    }

    #[test]
    fn test_start_ignored_unless_idle() {
        assert_eq!(Mode::Running.transition(Event::StartPressed), Mode::Running);
        assert_eq!(Mode::Locked.transition(Event::StartPressed), Mode::Locked);
        assert_eq!(
            Mode::AwaitingVerdict.transition(Event::StartPressed),
            Mode::AwaitingVerdict
        );
    }

    #[test]
    fn test_guards() {
        assert!(Mode::Idle.buttons_allowed());
        assert!(!Mode::Running.buttons_allowed());
        assert!(!Mode::Locked.buttons_allowed());
        assert!(Mode::Running.in_session());
        assert!(!Mode::AwaitingVerdict.in_session());
        assert!(Mode::Locked.is_locked());
    }
}
