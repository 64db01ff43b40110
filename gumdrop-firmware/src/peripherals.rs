//! Board peripheral wrappers
//!
//! Implements the gumdrop-core capability traits on top of embassy-rp:
//! PWM servo and buzzer, GPIO eye LEDs and buttons, and the buffered
//! UART host link.

use defmt::warn;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::BufferedUartTx;
use embedded_io::Write;

use gumdrop_core::controller::ButtonState;
use gumdrop_core::traits::{DispenserServo, EyeIndicator, HostLink, Rgb, Sounder};

/// PWM tick rate with the /125 divider at the 125 MHz system clock
const PWM_TICK_HZ: u32 = 1_000_000;

/// Servo frame: 20 ms at 1 MHz ticks
const SERVO_TOP: u16 = 19_999;

/// Hobby-servo pulse range (microseconds at 0 and 180 degrees)
const SERVO_PULSE_MIN_US: u32 = 500;
const SERVO_PULSE_MAX_US: u32 = 2_500;

/// Candy gate servo on one PWM channel A
pub struct PwmServo<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> PwmServo<'d> {
    /// Wrap a PWM slice already configured for the 50 Hz servo frame
    pub fn new(pwm: Pwm<'d>, config: PwmConfig) -> Self {
        Self { pwm, config }
    }

    /// 50 Hz slice config with the pulse for `angle_deg` preloaded
    pub fn frame_config(angle_deg: u8) -> PwmConfig {
        let mut config = PwmConfig::default();
        config.divider = fixed::FixedU16::from_num(125);
        config.top = SERVO_TOP;
        config.compare_a = pulse_us(angle_deg);
        config
    }
}

/// Pulse width in microseconds (= 1 MHz ticks) for a servo angle
fn pulse_us(angle_deg: u8) -> u16 {
    let angle = u32::from(angle_deg.min(180));
    let span = SERVO_PULSE_MAX_US - SERVO_PULSE_MIN_US;
    (SERVO_PULSE_MIN_US + angle * span / 180) as u16
}

impl<'d> DispenserServo for PwmServo<'d> {
    fn move_to(&mut self, angle_deg: u8) {
        self.config.compare_a = pulse_us(angle_deg);
        self.pwm.set_config(&self.config);
    }
}

/// Piezo buzzer on one PWM channel A, 50% duty square wave
pub struct PwmBuzzer<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> PwmBuzzer<'d> {
    pub fn new(pwm: Pwm<'d>, config: PwmConfig) -> Self {
        Self { pwm, config }
    }

    /// Silent slice config (1 MHz tick, zero duty)
    pub fn silent_config() -> PwmConfig {
        let mut config = PwmConfig::default();
        config.divider = fixed::FixedU16::from_num(125);
        config.compare_a = 0;
        config
    }
}

impl<'d> Sounder for PwmBuzzer<'d> {
    fn play_tone(&mut self, freq_hz: u16) {
        if freq_hz == 0 {
            self.silence();
            return;
        }
        let top = (PWM_TICK_HZ / u32::from(freq_hz)).saturating_sub(1) as u16;
        self.config.top = top;
        self.config.compare_a = top / 2;
        self.pwm.set_config(&self.config);
    }

    fn silence(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}

/// Eye LEDs on three GPIO lines (both eyes wired in parallel)
///
/// The controller only ever asks for full-on or full-off channels, so
/// plain digital drive is enough; anything at half intensity or above
/// counts as on.
pub struct EyeLeds<'d> {
    pub red: Output<'d>,
    pub green: Output<'d>,
    pub blue: Output<'d>,
}

impl<'d> EyeIndicator for EyeLeds<'d> {
    fn set_color(&mut self, color: Rgb) {
        set_channel(&mut self.red, color.r);
        set_channel(&mut self.green, color.g);
        set_channel(&mut self.blue, color.b);
    }
}

fn set_channel(pin: &mut Output<'_>, level: u8) {
    if level >= 128 {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

/// Three panel buttons, active-low with internal pull-ups
pub struct ButtonPad<'d> {
    pub up: Input<'d>,
    pub down: Input<'d>,
    pub enter: Input<'d>,
}

impl<'d> ButtonPad<'d> {
    /// Sample the current levels
    pub fn sample(&self) -> ButtonState {
        ButtonState {
            up: self.up.is_low(),
            down: self.down.is_low(),
            enter: self.enter.is_low(),
        }
    }
}

/// Outbound host link over the buffered UART
pub struct SerialLink {
    tx: BufferedUartTx,
}

impl SerialLink {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }
}

impl HostLink for SerialLink {
    fn send_line(&mut self, line: &str) {
        if self.tx.write_all(line.as_bytes()).is_err() || self.tx.write_all(b"\r\n").is_err() {
            warn!("UART write failed, dropping line");
        }
    }
}
