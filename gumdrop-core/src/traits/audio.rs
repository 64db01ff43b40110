//! Buzzer trait

/// Trait for the piezo buzzer
///
/// `play_tone` starts a tone and returns immediately; the executor
/// owns the note timing and calls `silence` between notes.
pub trait Sounder {
    /// Start a tone at the given frequency
    fn play_tone(&mut self, freq_hz: u16);

    /// Stop any playing tone
    fn silence(&mut self);
}
