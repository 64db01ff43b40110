//! HD44780 character LCD driver (4-bit GPIO mode)
//!
//! Drives a 16x2 module through six GPIO lines: register select,
//! enable, and the high data nibble. The R/W line is assumed tied to
//! ground, so timing uses fixed worst-case delays instead of busy-flag
//! polling.

use embassy_rp::gpio::Output;
use embedded_hal::delay::DelayNs;

use gumdrop_core::traits::CharDisplay;

const LCD_CLEAR: u8 = 0x01;
const LCD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const LCD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off
const LCD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const LCD_SET_DDRAM: u8 = 0x80;

// DDRAM row offsets for a 16x2 module
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// 4-bit HD44780 over plain GPIO
pub struct Hd44780<'d, D> {
    rs: Output<'d>,
    en: Output<'d>,
    data: [Output<'d>; 4], // d4..d7
    delay: D,
}

impl<'d, D: DelayNs> Hd44780<'d, D> {
    /// Take ownership of the control lines and run the 4-bit init
    /// sequence. Blocks for the module's power-up settle time.
    pub fn new(
        rs: Output<'d>,
        en: Output<'d>,
        data: [Output<'d>; 4],
        delay: D,
    ) -> Self {
        let mut lcd = Self {
            rs,
            en,
            data,
            delay,
        };
        lcd.init();
        lcd
    }

    fn init(&mut self) {
        // HD44780 datasheet init-by-instruction for 4-bit mode
        self.delay.delay_ms(50);
        self.rs.set_low();

        self.write_nibble(0x03);
        self.delay.delay_ms(5);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x02); // switch to 4-bit

        self.command(LCD_FUNCTION_4BIT_2LINE);
        self.command(LCD_DISPLAY_ON);
        self.command(LCD_CLEAR);
        self.delay.delay_ms(2);
        self.command(LCD_ENTRY_MODE);
    }

    fn command(&mut self, byte: u8) {
        self.rs.set_low();
        self.write_byte(byte);
    }

    fn write_data(&mut self, byte: u8) {
        self.rs.set_high();
        self.write_byte(byte);
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
        self.delay.delay_us(50);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if nibble & (1 << bit) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        self.pulse_enable();
    }

    fn pulse_enable(&mut self) {
        self.en.set_high();
        self.delay.delay_us(1);
        self.en.set_low();
        self.delay.delay_us(50);
    }
}

impl<'d, D: DelayNs> CharDisplay for Hd44780<'d, D> {
    fn clear(&mut self) {
        self.command(LCD_CLEAR);
        self.delay.delay_ms(2);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        let row = (row as usize).min(ROW_OFFSETS.len() - 1);
        self.command(LCD_SET_DDRAM | (ROW_OFFSETS[row] + col));
    }

    fn print(&mut self, text: &str) {
        // The module is ASCII-only; non-ASCII renders as '?'
        for c in text.chars() {
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.write_data(byte);
        }
    }
}
