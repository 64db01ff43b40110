//! Character display trait
//!
//! Abstracts a 16x2 character LCD. The device is a plain text grid -
//! all rendering logic stays in [`crate::render`].

/// Trait for a character-grid display
pub trait CharDisplay {
    /// Clear the entire display
    fn clear(&mut self);

    /// Move the cursor to a column/row position
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Print text at the cursor; text past the row end may be dropped
    fn print(&mut self, text: &str);
}
