//! Gumdrop - Focus Session Candy Dispenser Firmware
//!
//! Main firmware binary for RP2040-based boards. One poll loop
//! multiplexes serial commands from the supervising host, the session
//! countdown, both lock timers, and the panel buttons, all against the
//! free-running millisecond clock.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use embedded_io::{Read, ReadReady};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use gumdrop_core::clock::Instant;
use gumdrop_core::config::{Tunables, SERVO_CLOSED_DEG};
use gumdrop_core::controller::Controller;
use gumdrop_core::exec::Effects;
use gumdrop_protocol::LineReader;

use crate::hd44780::Hd44780;
use crate::peripherals::{ButtonPad, EyeLeds, PwmBuzzer, PwmServo, SerialLink};

mod hd44780;
mod peripherals;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Poll period; command latency and debounce resolution both key off
/// this
const LOOP_PERIOD_MS: u64 = 5;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Gumdrop firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link: UART0 at 9600 baud, buffered so command bytes that
    // arrive during blocking display dwells are not lost
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 9600;
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(
        Irqs,
        TX_BUF.init([0; 256]),
        RX_BUF.init([0; 256]),
    );
    let (tx, mut rx) = uart.split();
    let mut link = SerialLink::new(tx);
    info!("UART initialized for host communication");

    // Panel buttons, active-low
    let buttons = ButtonPad {
        up: Input::new(p.PIN_2, Pull::Up),
        down: Input::new(p.PIN_3, Pull::Up),
        enter: Input::new(p.PIN_4, Pull::Up),
    };

    // 16x2 character LCD in 4-bit mode
    let display = Hd44780::new(
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        [
            Output::new(p.PIN_9, Level::Low),
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
        ],
        Delay,
    );
    info!("LCD initialized");

    // Candy gate servo, parked closed from the first frame
    let servo_config = PwmServo::frame_config(SERVO_CLOSED_DEG);
    let servo = PwmServo::new(
        Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, servo_config.clone()),
        servo_config,
    );

    // Piezo buzzer
    let buzzer_config = PwmBuzzer::silent_config();
    let buzzer = PwmBuzzer::new(
        Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, buzzer_config.clone()),
        buzzer_config,
    );

    // Eye LEDs
    let eyes = EyeLeds {
        red: Output::new(p.PIN_13, Level::Low),
        green: Output::new(p.PIN_14, Level::Low),
        blue: Output::new(p.PIN_15, Level::Low),
    };

    let mut effects = Effects {
        display,
        servo,
        eyes,
        sounder: buzzer,
        delay: Delay,
    };

    let mut controller = Controller::new(Tunables::default());
    let mut reader = LineReader::new();

    effects.park_servo();
    effects.run(&controller.boot(), &mut link);
    info!("Ready for commands");

    loop {
        // Drain buffered serial bytes until a full line or none left
        let mut line = None;
        while line.is_none() {
            match rx.read_ready() {
                Ok(true) => {}
                _ => break,
            }
            let mut byte = [0u8; 1];
            match rx.read(&mut byte) {
                Ok(n) if n > 0 => line = reader.feed(byte[0]),
                Ok(_) => break,
                Err(e) => {
                    warn!("UART read error: {:?}", e);
                    break;
                }
            }
        }

        let now = Instant::from_millis(embassy_time::Instant::now().as_millis() as u32);
        let actions = controller.poll(now, line.as_deref(), buttons.sample());
        effects.run(&actions, &mut link);

        Timer::after_millis(LOOP_PERIOD_MS).await;
    }
}
