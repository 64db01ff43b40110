//! Capability traits for the physical collaborators
//!
//! The core never touches hardware directly; the firmware provides
//! implementations of these traits and the `Effects` executor drives
//! them.

pub mod audio;
pub mod dispenser;
pub mod display;
pub mod indicator;
pub mod link;

pub use audio::Sounder;
pub use dispenser::DispenserServo;
pub use display::CharDisplay;
pub use indicator::{EyeIndicator, Rgb};
pub use link::HostLink;
