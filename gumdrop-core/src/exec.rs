//! Action executor.
//!
//! Applies a controller action list to the physical collaborators.
//! This is the only place where the blocking dwells happen - display
//! message dwell times, tone playback, and the servo sequence all run
//! to completion here. Serial input arriving meanwhile is buffered by
//! the transport and drained on the next poll.

use embedded_hal::delay::DelayNs;

use crate::actions::{Action, Actions};
use crate::config::{
    NOTE_GAP_MS, SERVO_CLOSED_DEG, SERVO_DWELL_MS, SERVO_OPEN_DEG, SUCCESS_MELODY,
    WARNING_FREQ_HZ, WARNING_OFF_MS, WARNING_ON_MS, WARNING_PULSES,
};
use crate::render::Screen;
use crate::traits::{CharDisplay, DispenserServo, EyeIndicator, HostLink, Sounder};

/// The physical collaborators, bundled
pub struct Effects<D, S, E, A, DL> {
    pub display: D,
    pub servo: S,
    pub eyes: E,
    pub sounder: A,
    pub delay: DL,
}

impl<D, S, E, A, DL> Effects<D, S, E, A, DL>
where
    D: CharDisplay,
    S: DispenserServo,
    E: EyeIndicator,
    A: Sounder,
    DL: DelayNs,
{
    /// Park the servo in the closed position (power-up)
    pub fn park_servo(&mut self) {
        self.servo.move_to(SERVO_CLOSED_DEG);
    }

    /// Apply an action list in order
    pub fn run<L: HostLink>(&mut self, actions: &Actions, link: &mut L) {
        for action in actions {
            match action {
                Action::Send(report) => link.send_line(report.encode().as_str()),
                Action::SetEyes(color) => self.eyes.set_color(*color),
                Action::Show(screen) => self.draw(screen),
                Action::ShowFor { screen, dwell_ms } => {
                    self.draw(screen);
                    self.delay.delay_ms(u32::from(*dwell_ms));
                }
                Action::PlayWarning => self.play_warning(),
                Action::PlayMelody => self.play_melody(),
                Action::Dispense => self.dispense(),
            }
        }
    }

    /// Draw a full screen
    fn draw(&mut self, screen: &Screen) {
        self.display.clear();
        if !screen.top.is_empty() {
            self.display.set_cursor(0, 0);
            self.display.print(screen.top.as_str());
        }
        if !screen.bottom.is_empty() {
            self.display.set_cursor(0, 1);
            self.display.print(screen.bottom.as_str());
        }
    }

    /// 3-pulse warning pattern
    fn play_warning(&mut self) {
        for _ in 0..WARNING_PULSES {
            self.sounder.play_tone(WARNING_FREQ_HZ);
            self.delay.delay_ms(u32::from(WARNING_ON_MS));
            self.sounder.silence();
            self.delay.delay_ms(u32::from(WARNING_OFF_MS));
        }
    }

    /// Ascending completion melody
    fn play_melody(&mut self) {
        for note in &SUCCESS_MELODY {
            self.sounder.play_tone(note.freq_hz);
            self.delay.delay_ms(u32::from(note.duration_ms));
            self.sounder.silence();
            self.delay.delay_ms(u32::from(NOTE_GAP_MS));
        }
    }

    /// Closed -> open -> closed gate sequence
    fn dispense(&mut self) {
        self.servo.move_to(SERVO_CLOSED_DEG);
        self.delay.delay_ms(u32::from(SERVO_DWELL_MS));
        self.servo.move_to(SERVO_OPEN_DEG);
        self.delay.delay_ms(u32::from(SERVO_DWELL_MS));
        self.servo.move_to(SERVO_CLOSED_DEG);
    }
}
