//! Host serial link trait

/// Trait for the outbound side of the host link
///
/// The implementation appends the line terminator; callers pass bare
/// line content.
pub trait HostLink {
    /// Send one line to the host
    fn send_line(&mut self, line: &str);
}
