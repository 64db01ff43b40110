//! Dispensing actuator trait

/// Trait for the candy gate servo
///
/// The gate is closed at [`crate::config::SERVO_CLOSED_DEG`] and open
/// at [`crate::config::SERVO_OPEN_DEG`]; the executor sequences the
/// moves with fixed dwells.
pub trait DispenserServo {
    /// Command the servo to an absolute angle in degrees
    fn move_to(&mut self, angle_deg: u8);
}
