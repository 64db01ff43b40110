//! Board-agnostic control logic for the Gumdrop dispenser firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - The monotonic millisecond clock types
//! - The session/lock mode state machine
//! - Session countdown and timed-lock windows
//! - The central `Controller` poll step
//! - Redraw-minimized screen rendering
//! - Capability traits for the display, servo, indicator, and buzzer
//! - The `Effects` executor that applies controller actions to hardware

#![no_std]
#![deny(unsafe_code)]

// Host tests (proptest) need std linked
#[cfg(test)]
extern crate std;

pub mod actions;
pub mod clock;
pub mod config;
pub mod controller;
pub mod exec;
pub mod locks;
pub mod render;
pub mod session;
pub mod state;
pub mod traits;
