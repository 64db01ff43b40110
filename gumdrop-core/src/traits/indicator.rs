//! Tri-color indicator ("eyes") trait

/// An RGB color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Idle / unlocked
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    /// Warning or candy lock
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    /// Session running
    pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
}

/// Trait for the tri-color eye LEDs (wired in parallel)
pub trait EyeIndicator {
    /// Set the indicator color
    fn set_color(&mut self, color: Rgb);
}
