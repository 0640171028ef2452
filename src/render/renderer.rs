//! Renderer: a shared, ticker-driven text frame writer.
//!
//! The program loop submits whole frames with [`Renderer::write`]. A
//! dedicated flush thread wakes at the configured frame rate and pushes
//! the latest frame through [`render_frame`], so any number of writes
//! between two ticks costs a single terminal update.
//!
//! Every operation takes the same coarse lock, which means the flush
//! thread never interleaves with mode changes such as entering the
//! alternate screen, and never races a concurrent start or stop.

use super::diff::{render_frame, DiffState};
use crate::terminal::OutputBuffer;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default flush rate in frames per second.
pub const DEFAULT_FPS: u32 = 24;

fn interval_for(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Everything behind the coarse lock.
struct State {
    out: Box<dyn Write + Send>,
    /// The latest frame submitted with `write`.
    pending: String,
    diff: DiffState,
    cursor_hidden: bool,
    /// Time between two flushes; read when the flush thread starts.
    interval: Duration,
    phase: Phase,
}

impl State {
    /// Write bytes straight to the terminal.
    ///
    /// Output errors are not fatal to the renderer: the terminal may be
    /// gone during teardown, and the next frame retries anyway.
    fn execute(&mut self, bytes: &[u8]) {
        let result = self.out.write_all(bytes).and_then(|()| self.out.flush());
        if let Err(error) = result {
            tracing::trace!(%error, "terminal write failed");
        }
    }

    /// Push the pending frame through the differ.
    fn flush(&mut self) {
        let mut out = OutputBuffer::new();
        if !render_frame(&mut self.diff, &self.pending, &mut out) {
            return;
        }
        tracing::trace!(
            bytes = out.len(),
            lines = self.diff.lines_rendered(),
            "flushed frame"
        );
        self.pending.clear();
        self.execute(out.as_bytes());
    }

    /// Mark the renderer stopped and signal the flush thread.
    ///
    /// Returns the previous phase, or `None` if already stopped. The
    /// caller joins a running flusher after releasing the lock.
    fn halt(&mut self) -> Option<Phase> {
        match std::mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Stopped => None,
            previous => {
                if let Phase::Running(flusher) = &previous {
                    flusher.signal();
                }
                Some(previous)
            }
        }
    }

    fn write_cursor_visibility(&self, out: &mut OutputBuffer) {
        if self.cursor_hidden {
            out.cursor_hide();
        } else {
            out.cursor_show();
        }
    }
}

/// A running flush thread.
struct Flusher {
    /// Dropping or sending on this ends the thread.
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl Flusher {
    fn signal(&self) {
        let _ = self.shutdown.try_send(());
    }

    fn join(self) {
        if self.handle.join().is_err() {
            tracing::warn!("flush thread panicked");
        }
    }
}

enum Phase {
    Idle,
    Running(Flusher),
    Stopped,
}

impl Phase {
    /// Wait for the flush thread, if there was one. Must not hold the lock.
    fn join(self) {
        if let Self::Running(flusher) = self {
            flusher.join();
        }
    }
}

struct Shared {
    state: Mutex<State>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Differential text renderer.
///
/// Cloning is cheap and yields a handle to the same renderer, so models
/// and commands can queue messages or toggle modes while the program
/// loop keeps writing frames.
#[derive(Clone)]
pub struct Renderer {
    shared: Arc<Shared>,
}

impl Renderer {
    /// Create a renderer writing to `out` at [`DEFAULT_FPS`].
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self::with_frame_rate(out, DEFAULT_FPS)
    }

    /// Create a renderer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Create a renderer flushing `fps` times per second (at least once).
    pub fn with_frame_rate<W: Write + Send + 'static>(out: W, fps: u32) -> Self {
        let state = State {
            out: Box::new(out),
            pending: String::new(),
            diff: DiffState::new(),
            cursor_hidden: false,
            interval: interval_for(fps),
            phase: Phase::Idle,
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
            }),
        }
    }

    /// Time between two flushes.
    pub fn frame_interval(&self) -> Duration {
        self.shared.lock_state().interval
    }

    /// Change the flush rate. Takes effect the next time the renderer starts.
    pub fn set_frame_rate(&self, fps: u32) {
        self.shared.lock_state().interval = interval_for(fps);
    }

    /// Start the flush thread. Does nothing if it is already running.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn start(&self) -> io::Result<()> {
        let mut state = self.shared.lock_state();
        if matches!(state.phase, Phase::Running(_)) {
            return Ok(());
        }

        let (shutdown, shutdown_rx) = bounded(1);
        let weak = Arc::downgrade(&self.shared);
        let interval = state.interval;
        let handle = thread::Builder::new()
            .name("pulse-render".to_string())
            .spawn(move || Self::run_loop(&weak, &shutdown_rx, interval))?;

        state.phase = Phase::Running(Flusher { shutdown, handle });
        tracing::debug!(?interval, "renderer started");
        Ok(())
    }

    /// Flush loop. Exits on shutdown or once every handle is gone.
    fn run_loop(shared: &Weak<Shared>, shutdown: &Receiver<()>, interval: Duration) {
        let ticker = tick(interval);
        loop {
            select! {
                recv(shutdown) -> _ => break,
                recv(ticker) -> _ => {
                    let Some(shared) = shared.upgrade() else { break };
                    let mut state = shared.lock_state();
                    // Halting signals under the lock; a tick that lost the race flushes nothing.
                    if !shutdown.is_empty() {
                        break;
                    }
                    state.flush();
                }
            }
        }
    }

    /// Stop the renderer: flush the final frame, show the cursor and
    /// erase the screen.
    pub fn stop(&self) {
        let previous = {
            let mut state = self.shared.lock_state();
            let Some(previous) = state.halt() else { return };
            state.flush();
            state.cursor_hidden = false;

            let mut out = OutputBuffer::new();
            out.cursor_show();
            out.clear_screen();
            state.execute(out.as_bytes());
            previous
        };
        previous.join();
        tracing::debug!("renderer stopped");
    }

    /// Stop the renderer without a final flush, erasing the current line.
    pub fn kill(&self) {
        let previous = {
            let mut state = self.shared.lock_state();
            let Some(previous) = state.halt() else { return };
            let mut out = OutputBuffer::new();
            out.clear_line();
            out.write_byte(b'\r');
            state.execute(out.as_bytes());
            previous
        };
        previous.join();
        tracing::debug!("renderer killed");
    }

    /// Whether the flush thread is running.
    pub fn is_running(&self) -> bool {
        matches!(self.shared.lock_state().phase, Phase::Running(_))
    }

    /// Replace the pending frame. An empty frame becomes a single space so
    /// that it still clears the previous one.
    pub fn write(&self, frame: &str) {
        let mut state = self.shared.lock_state();
        state.pending.clear();
        if frame.is_empty() {
            state.pending.push(' ');
        } else {
            state.pending.push_str(frame);
        }
    }

    /// Erase the screen, home the cursor and repaint on the next flush.
    pub fn clear_screen(&self) {
        let mut state = self.shared.lock_state();
        let mut out = OutputBuffer::new();
        out.clear_screen();
        out.cursor_home();
        state.execute(out.as_bytes());
        state.diff.repaint();
    }

    /// Force the next flush to redraw, even if the frame is unchanged.
    pub fn repaint(&self) {
        self.shared.lock_state().diff.repaint();
    }

    /// Show the terminal cursor.
    pub fn show_cursor(&self) {
        let mut state = self.shared.lock_state();
        state.cursor_hidden = false;
        let mut out = OutputBuffer::new();
        out.cursor_show();
        state.execute(out.as_bytes());
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor(&self) {
        let mut state = self.shared.lock_state();
        state.cursor_hidden = true;
        let mut out = OutputBuffer::new();
        out.cursor_hide();
        state.execute(out.as_bytes());
    }

    /// Set the terminal window title.
    pub fn set_window_title(&self, title: &str) {
        let mut state = self.shared.lock_state();
        let mut out = OutputBuffer::new();
        out.set_title(title);
        state.execute(out.as_bytes());
    }

    /// Whether the alternate screen is active.
    pub fn alt_screen(&self) -> bool {
        self.shared.lock_state().diff.alt_screen()
    }

    /// Switch to the alternate screen. Does nothing if already there.
    pub fn enter_alt_screen(&self) {
        let mut state = self.shared.lock_state();
        if state.diff.alt_screen() {
            return;
        }
        state.diff.set_alt_screen(true);

        let mut out = OutputBuffer::new();
        out.enter_alt_screen();
        out.clear_screen();
        out.cursor_home();
        // Cursor visibility is per screen on some terminals.
        state.write_cursor_visibility(&mut out);
        state.execute(out.as_bytes());
        tracing::debug!("entered alternate screen");
    }

    /// Return to the main screen. Does nothing if not on the alternate one.
    pub fn exit_alt_screen(&self) {
        let mut state = self.shared.lock_state();
        if !state.diff.alt_screen() {
            return;
        }
        state.diff.set_alt_screen(false);

        let mut out = OutputBuffer::new();
        out.exit_alt_screen();
        state.write_cursor_visibility(&mut out);
        state.execute(out.as_bytes());
        tracing::debug!("exited alternate screen");
    }

    /// Move the cursor to column `x`, row `y` (0-based).
    ///
    /// Only honored on the alternate screen, where positions are absolute.
    pub fn set_cursor(&self, x: u16, y: u16) {
        let mut state = self.shared.lock_state();
        if !state.diff.alt_screen() {
            return;
        }
        let mut out = OutputBuffer::new();
        out.cursor_to(usize::from(y), usize::from(x));
        state.execute(out.as_bytes());
    }

    /// Known terminal size as `(width, height)`; zero means unknown.
    pub fn size(&self) -> (u16, u16) {
        self.shared.lock_state().diff.size()
    }

    /// Record a new terminal size and repaint on the next flush.
    pub fn resize(&self, width: u16, height: u16) {
        let mut state = self.shared.lock_state();
        state.diff.set_size(width, height);
        state.diff.repaint();
        tracing::debug!(width, height, "renderer resized");
    }

    /// Print a line above the frame on the next flush. Ignored on the
    /// alternate screen.
    pub fn queue_message(&self, line: impl Into<String>) {
        let mut state = self.shared.lock_state();
        state.diff.queue_message(line);
        state.diff.repaint();
    }

    /// Leave these frame lines to the application; they are never redrawn.
    pub fn ignore_lines(&self, lines: impl IntoIterator<Item = usize>) {
        self.shared.lock_state().diff.ignore_lines(lines);
    }

    /// Redraw every line again, including previously ignored ones.
    pub fn clear_ignored_lines(&self) {
        let mut state = self.shared.lock_state();
        state.diff.clear_ignored_lines();
        state.diff.repaint();
    }

    /// Lines drawn by the last flush in the current screen mode.
    pub fn lines_rendered(&self) -> usize {
        self.shared.lock_state().diff.lines_rendered()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("interval", &self.frame_interval())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
