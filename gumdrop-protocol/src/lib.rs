//! Host Link Protocol
//!
//! This crate defines the serial protocol between the dispenser and the
//! supervising host. The protocol is plain text, newline-delimited, one
//! command per line:
//!
//! ```text
//! host -> device:  buzzer | heartbeat | distraction_<N>_<site> | extend_10
//!                  | extend_20 | candy_lock_10 | candy_lock_20
//!                  | end_session | summary_<N> | lock | success | fail
//! device -> host:  echo of every received line, `heartbeat_ok`, `done`,
//!                  plus human-readable status lines
//! ```
//!
//! The device is the "dumb" side: it never interprets distraction
//! semantics, only displays what the host tells it to.

#![no_std]
#![deny(unsafe_code)]

// Host tests (proptest) need std linked
#[cfg(test)]
extern crate std;

pub mod command;
pub mod line;
pub mod report;

pub use command::{Command, MAX_SITE_LEN};
pub use line::{LineReader, MAX_LINE_LEN};
pub use report::{Report, MAX_REPORT_LEN};
