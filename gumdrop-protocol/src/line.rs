//! Incremental line assembly for the host link.
//!
//! The UART delivers bytes; commands are newline-terminated text lines.
//! `LineReader` accumulates bytes until a `\n` arrives, then yields the
//! line with surrounding whitespace (including any `\r`) trimmed.

use heapless::{String, Vec};

/// Maximum accepted line length in bytes (excluding the newline)
pub const MAX_LINE_LEN: usize = 96;

/// Byte-fed accumulator for newline-terminated command lines
#[derive(Debug, Clone)]
pub struct LineReader {
    buffer: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader {
    /// Create a new, empty line reader
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Reset the reader, discarding any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Feed a single byte to the reader
    ///
    /// Returns `Some(line)` when a newline completes a valid line.
    /// Over-long lines are discarded wholesale: everything up to the
    /// next newline is dropped and `None` is returned for it.
    pub fn feed(&mut self, byte: u8) -> Option<String<MAX_LINE_LEN>> {
        if byte != b'\n' {
            if self.buffer.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let line = if self.overflowed {
            None
        } else {
            match core::str::from_utf8(&self.buffer) {
                Ok(text) => {
                    let mut line = String::new();
                    // Trimmed text always fits: it is a sub-slice of the buffer
                    let _ = line.push_str(text.trim());
                    Some(line)
                }
                Err(_) => None,
            }
        };

        self.reset();
        line
    }

    /// Feed multiple bytes to the reader
    ///
    /// Returns the first complete line found, if any. Bytes after that
    /// line are not consumed; the caller should re-feed them.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<String<MAX_LINE_LEN>> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte) {
                return Some(line);
            }
        }
        None
    }
}
