//! Events driving mode transitions

/// Events that can change the primary mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Enter button pressed while idle
    StartPressed,
    /// Countdown deadline reached
    DeadlineReached,
    /// Host force-terminated the session (`end_session`)
    SessionCut,
    /// Host verdict: passed
    VerdictSuccess,
    /// Host verdict: failed
    VerdictFail,
    /// Punitive lock engaged (`lock`)
    LockEngaged,
    /// Punitive lock window elapsed
    LockExpired,
}
