//! Mode state machine for the dispenser

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::Mode;
