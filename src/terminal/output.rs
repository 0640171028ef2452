//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.
//!
//! Every escape sequence the runtime emits is built here, so the wire
//! protocol lives in one place.

use crate::buffer::Color;
use std::io::Write;

/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
/// Erase from the cursor to the end of the line.
pub const ERASE_LINE_RIGHT: &[u8] = b"\x1b[K";
/// Erase from the cursor to the end of the screen.
pub const ERASE_SCREEN_BELOW: &[u8] = b"\x1b[J";
/// Erase the entire screen.
pub const ERASE_ENTIRE_SCREEN: &[u8] = b"\x1b[2J";
/// Erase the entire current line.
pub const ERASE_ENTIRE_LINE: &[u8] = b"\x1b[2K";
/// Switch to the alternate screen, saving the cursor.
pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
/// Return to the main screen, restoring the cursor.
pub const ALT_SCREEN_EXIT: &[u8] = b"\x1b[?1049l";
/// Make the cursor visible.
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
/// Make the cursor invisible.
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
/// Reset all SGR attributes.
pub const RESET_ATTRS: &[u8] = b"\x1b[0m";

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning its bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Consume the buffer as text.
    ///
    /// Everything written through this API is UTF-8; raw bytes that are not
    /// are replaced rather than rejected.
    pub fn into_string(self) -> String {
        String::from_utf8(self.data)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a single byte (line feed, carriage return).
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Write a character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move the cursor up `n` rows. Zero emits nothing.
    #[inline]
    pub fn cursor_up(&mut self, n: usize) {
        if n > 0 {
            let _ = write!(self.data, "\x1b[{n}A");
        }
    }

    /// Move the cursor to the top-left corner.
    #[inline]
    pub fn cursor_home(&mut self) {
        self.data.extend_from_slice(CURSOR_HOME);
    }

    /// Move the cursor to a 0-indexed (row, col); the wire format is 1-indexed.
    #[inline]
    pub fn cursor_to(&mut self, row: usize, col: usize) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", row + 1, col + 1);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(HIDE_CURSOR);
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(SHOW_CURSOR);
    }

    /// Erase from the cursor to the end of the line.
    #[inline]
    pub fn erase_line_right(&mut self) {
        self.data.extend_from_slice(ERASE_LINE_RIGHT);
    }

    /// Erase from the cursor to the end of the screen.
    #[inline]
    pub fn erase_screen_below(&mut self) {
        self.data.extend_from_slice(ERASE_SCREEN_BELOW);
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(ERASE_ENTIRE_SCREEN);
    }

    /// Clear the entire current line.
    #[inline]
    pub fn clear_line(&mut self) {
        self.data.extend_from_slice(ERASE_ENTIRE_LINE);
    }

    /// Switch to the alternate screen buffer.
    #[inline]
    pub fn enter_alt_screen(&mut self) {
        self.data.extend_from_slice(ALT_SCREEN_ENTER);
    }

    /// Return to the main screen buffer.
    #[inline]
    pub fn exit_alt_screen(&mut self) {
        self.data.extend_from_slice(ALT_SCREEN_EXIT);
    }

    /// Set the window title (OSC 2).
    #[inline]
    pub fn set_title(&mut self, title: &str) {
        let _ = write!(self.data, "\x1b]2;{title}\x07");
    }

    /// Set foreground color (256-color palette).
    #[inline]
    pub fn set_fg(&mut self, color: Color) {
        let _ = write!(self.data, "\x1b[38;5;{}m", color.index());
    }

    /// Set background color (256-color palette).
    #[inline]
    pub fn set_bg(&mut self, color: Color) {
        let _ = write!(self.data, "\x1b[48;5;{}m", color.index());
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(RESET_ATTRS);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_sequences() {
        let mut out = OutputBuffer::new();
        out.cursor_up(3);
        out.cursor_up(0);
        out.cursor_home();
        out.cursor_to(0, 0);
        out.cursor_to(4, 9);
        assert_eq!(out.as_bytes(), b"\x1b[3A\x1b[H\x1b[1;1H\x1b[5;10H");
    }

    #[test]
    fn test_erase_and_screen_sequences() {
        let mut out = OutputBuffer::new();
        out.erase_line_right();
        out.erase_screen_below();
        out.clear_screen();
        out.clear_line();
        out.enter_alt_screen();
        out.exit_alt_screen();
        out.cursor_hide();
        out.cursor_show();
        assert_eq!(
            out.as_bytes(),
            b"\x1b[K\x1b[J\x1b[2J\x1b[2K\x1b[?1049h\x1b[?1049l\x1b[?25l\x1b[?25h"
        );
    }

    #[test]
    fn test_color_and_title() {
        let mut out = OutputBuffer::new();
        out.set_fg(Color::Red);
        out.set_bg(Color::White);
        out.reset_attrs();
        out.set_title("pulse");
        assert_eq!(out.as_bytes(), b"\x1b[38;5;1m\x1b[48;5;7m\x1b[0m\x1b]2;pulse\x07");
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.write_str("hi");
        out.write_char('→');
        out.write_byte(b'\n');
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, "hi→\n".as_bytes());
        assert_eq!(out.len(), sink.len());
    }
}
