//! Terminal module: raw mode, size queries and ANSI output.
//!
//! - [`OutputBuffer`]: builds escape sequences for a single write
//! - [`RawMode`]: RAII guard around raw (unechoed, unbuffered) input
//! - [`size`]: terminal dimensions with an 80×24 fallback
//! - [`SharedBuffer`]: cloneable in-memory sink for headless rendering

pub mod output;

pub use output::OutputBuffer;

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: u16 = 80;
/// Height used when the terminal size cannot be determined.
pub const DEFAULT_HEIGHT: u16 = 24;

/// Query the terminal size as `(width, height)`.
///
/// Falls back to 80×24 when stdin is not a terminal, the query fails,
/// or either dimension is zero.
pub fn size() -> (u16, u16) {
    if !io::stdin().is_terminal() {
        return (DEFAULT_WIDTH, DEFAULT_HEIGHT);
    }

    match crossterm::terminal::size() {
        Ok((width, height)) if width > 0 && height > 0 => (width, height),
        Ok(_) => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        Err(err) => {
            tracing::debug!(%err, "terminal size query failed, using default");
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        }
    }
}

/// Raw mode guard.
///
/// Raw mode is enabled on [`acquire`](Self::acquire) and restored when the
/// guard is dropped, on every exit path.
#[derive(Debug)]
pub struct RawMode {
    _private: (),
}

impl RawMode {
    /// Put the controlling terminal into raw mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if raw mode cannot be enabled; the
    /// terminal is left untouched in that case.
    pub fn acquire() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        tracing::debug!("raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = crossterm::terminal::disable_raw_mode() {
            tracing::debug!(%err, "failed to restore terminal mode");
        } else {
            tracing::debug!("raw mode released");
        }
    }
}

/// A cloneable, thread-safe in-memory writer.
///
/// Every clone appends to the same byte buffer, so one handle can be given
/// to a renderer while another inspects what was written.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Everything written so far, decoded lossily.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
