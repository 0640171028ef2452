//! Program: the update loop that ties model, input and renderer together.
//!
//! [`Program::run`] is the entry point for applications using Pulse. It
//! sets up the terminal, spawns the input actor, and then feeds every
//! message to the model one at a time, rendering after each.

use super::input::InputActor;
use super::messages::{Cmd, Msg};
use super::model::Model;
use crate::error::ProgramError;
use crate::render::{PixelRenderer, Renderer, DEFAULT_FPS};
use crate::terminal::{self, RawMode};
use crossbeam_channel::{bounded, Sender};
use std::fmt;
use std::io::{self, Read, Write};
use std::thread;

/// How frames reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Render [`Model::view`].
    #[default]
    Text,
    /// Render [`Model::pixel_view`], falling back to `view` when it is `None`.
    Pixels,
}

/// Configuration for a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Renderer flushes per second.
    pub frame_rate: u32,
    /// Whether to run on the alternate screen.
    pub alt_screen: bool,
    /// Text or pixel frames.
    pub presentation: Presentation,
    /// Whether to put the terminal into raw mode while running.
    pub raw_mode: bool,
    /// Fixed terminal size; queried from the terminal when `None`.
    pub terminal_size: Option<(u16, u16)>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FPS,
            alt_screen: false,
            presentation: Presentation::Text,
            raw_mode: true,
            terminal_size: None,
        }
    }
}

/// Stops the renderer when dropped.
struct Running<'a>(&'a Renderer);

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Leaves the alternate screen when dropped.
struct AltScreen<'a>(&'a Renderer);

impl AltScreen<'_> {
    fn enter(renderer: &Renderer) -> AltScreen<'_> {
        renderer.enter_alt_screen();
        AltScreen(renderer)
    }
}

impl Drop for AltScreen<'_> {
    fn drop(&mut self) {
        self.0.exit_alt_screen();
    }
}

/// The presentation mode, fixed for the whole run.
enum Frames {
    Text(Renderer),
    Pixels(PixelRenderer),
}

impl Frames {
    fn new(renderer: &Renderer, presentation: Presentation) -> Self {
        match presentation {
            Presentation::Text => Self::Text(renderer.clone()),
            Presentation::Pixels => Self::Pixels(PixelRenderer::new(renderer.clone())),
        }
    }

    fn render<M: Model>(&self, model: &M) {
        match self {
            Self::Text(renderer) => renderer.write(&model.view()),
            Self::Pixels(renderer) => match model.pixel_view() {
                Some(buffer) => renderer.render_pixels(&buffer),
                None => renderer.write(&model.view()),
            },
        }
    }
}

/// Runs a [`Model`] against a terminal.
pub struct Program<M> {
    model: M,
    config: ProgramConfig,
    renderer: Renderer,
    /// Input stream; standard input when `None`.
    input: Option<Box<dyn Read + Send>>,
}

impl<M: Model> Program<M> {
    /// Create a program with default configuration, drawing to standard output.
    pub fn new(model: M) -> Self {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program with custom configuration.
    pub fn with_config(model: M, config: ProgramConfig) -> Self {
        let renderer = Renderer::with_frame_rate(io::stdout(), config.frame_rate);
        Self {
            model,
            config,
            renderer,
            input: None,
        }
    }

    /// Run on the alternate screen.
    #[must_use]
    pub fn with_alt_screen(mut self) -> Self {
        self.config.alt_screen = true;
        self
    }

    /// Render pixel frames from [`Model::pixel_view`].
    #[must_use]
    pub fn with_pixel_renderer(mut self) -> Self {
        self.config.presentation = Presentation::Pixels;
        self
    }

    /// The usual setup for graphical programs: alternate screen and pixel frames.
    #[must_use]
    pub fn with_base(self) -> Self {
        self.with_alt_screen().with_pixel_renderer()
    }

    /// Read input from `reader` instead of standard input.
    #[must_use]
    pub fn with_input<R: Read + Send + 'static>(mut self, reader: R) -> Self {
        self.input = Some(Box::new(reader));
        self
    }

    /// Draw to `writer` instead of standard output.
    ///
    /// This replaces the renderer, so take [`renderer`](Self::renderer)
    /// handles only after calling it.
    #[must_use]
    pub fn with_output<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.renderer = Renderer::with_frame_rate(writer, self.config.frame_rate);
        self
    }

    /// Enable or disable raw mode. Disable it when input is not a terminal.
    #[must_use]
    pub fn with_raw_mode(mut self, enabled: bool) -> Self {
        self.config.raw_mode = enabled;
        self
    }

    /// Use a fixed terminal size instead of querying the terminal.
    #[must_use]
    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.config.terminal_size = Some((width, height));
        self
    }

    /// Set the renderer's flushes per second.
    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.config.frame_rate = fps;
        self.renderer.set_frame_rate(fps);
        self
    }

    /// A handle to this program's renderer, for drawing outside the loop.
    pub fn renderer(&self) -> Renderer {
        self.renderer.clone()
    }

    /// The program's configuration.
    pub const fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// The model as it is before the program runs.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// The size reported to the model: the configured size, or else the
    /// terminal's (80×24 when it cannot be determined).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.config.terminal_size.unwrap_or_else(terminal::size)
    }

    /// Run the program until a [`Msg::Quit`] arrives, then return the final model.
    ///
    /// The terminal is restored on every exit path: the alternate screen
    /// is left, the renderer stopped (final flush, cursor shown, screen
    /// erased) and raw mode released.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::RawMode`] if raw mode cannot be entered, in
    /// which case nothing has been written to the terminal, and
    /// [`ProgramError::Spawn`] if a runtime thread cannot be started.
    pub fn run(self) -> Result<M, ProgramError> {
        let size = self.terminal_size();
        let Self {
            model,
            config,
            renderer,
            input,
        } = self;
        tracing::debug!(?config, "program starting");

        let _raw = if config.raw_mode {
            Some(RawMode::acquire().map_err(ProgramError::RawMode)?)
        } else {
            None
        };

        renderer.start().map_err(|source| ProgramError::Spawn {
            name: "render",
            source,
        })?;
        let _running = Running(&renderer);
        let _alt = config.alt_screen.then(|| AltScreen::enter(&renderer));
        renderer.hide_cursor();

        let (tx, rx) = bounded::<Msg>(0);
        let input = input.unwrap_or_else(|| Box::new(io::stdin()));
        // Detached: a blocked read outlives the loop, and the actor exits
        // on its next read once the receiver is gone.
        let _input = InputActor::spawn(input, tx.clone()).map_err(|source| ProgramError::Spawn {
            name: "input",
            source,
        })?;

        let msg = model.init();
        let (model, cmd) = model.update(msg);
        spawn_cmd(cmd, &tx)?;

        let (width, height) = size;
        renderer.resize(width, height);
        tracing::debug!(width, height, "terminal size");
        let (mut model, cmd) = model.update(Some(Msg::Size { width, height }));
        spawn_cmd(cmd, &tx)?;

        let frames = Frames::new(&renderer, config.presentation);
        frames.render(&model);

        // Only this thread ever touches the model.
        while let Ok(msg) = rx.recv() {
            if msg.is_quit() {
                break;
            }
            let (next, cmd) = model.update(Some(msg));
            model = next;
            spawn_cmd(cmd, &tx)?;
            frames.render(&model);
        }

        tracing::debug!("program quit");
        Ok(model)
    }
}

/// Run a command on its own thread, sending its message back to the loop.
fn spawn_cmd(cmd: Option<Cmd>, tx: &Sender<Msg>) -> Result<(), ProgramError> {
    let Some(cmd) = cmd else {
        return Ok(());
    };
    let tx = tx.clone();
    thread::Builder::new()
        .name("pulse-cmd".to_string())
        .spawn(move || {
            if let Some(msg) = cmd.run() {
                // The loop may already be gone
                let _ = tx.send(msg);
            }
        })
        .map_err(|source| ProgramError::Spawn {
            name: "command",
            source,
        })?;
    tracing::trace!("spawned command");
    Ok(())
}

impl<M> fmt::Debug for Program<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::messages::quit;
    use crate::buffer::{Color, Pixel, PixelBuffer};
    use crate::terminal::SharedBuffer;
    use std::io::Cursor;

    /// Records every message it sees and quits on 'q'.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
        pixels: bool,
    }

    impl Model for Recorder {
        fn update(mut self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
            let cmd = match &msg {
                Some(Msg::Key { rune: 'q' }) => Some(quit()),
                _ => None,
            };
            self.seen.push(match msg {
                None => "none".to_string(),
                Some(Msg::Key { rune }) => format!("key:{rune}"),
                Some(Msg::Size { width, height }) => format!("size:{width}x{height}"),
                Some(other) => format!("{other:?}"),
            });
            (self, cmd)
        }

        fn view(&self) -> String {
            format!("seen {}", self.seen.len())
        }

        fn pixel_view(&self) -> Option<PixelBuffer> {
            self.pixels.then(|| {
                let mut buffer = PixelBuffer::new(1, 1);
                buffer.set_pixel(0, 0, Pixel::new('*', Color::Yellow, Color::Black));
                buffer
            })
        }
    }

    fn program(model: Recorder, input: &'static [u8]) -> (Program<Recorder>, SharedBuffer) {
        let sink = SharedBuffer::new();
        let program = Program::new(model)
            .with_input(Cursor::new(input))
            .with_output(sink.clone())
            .with_raw_mode(false)
            .with_terminal_size(40, 10);
        (program, sink)
    }

    #[test]
    fn test_config_defaults() {
        let config = ProgramConfig::default();
        assert_eq!(config.frame_rate, DEFAULT_FPS);
        assert!(!config.alt_screen);
        assert_eq!(config.presentation, Presentation::Text);
        assert!(config.raw_mode);
        assert!(config.terminal_size.is_none());
    }

    #[test]
    fn test_with_base_sets_alt_screen_and_pixels() {
        let program = Program::new(Recorder::default()).with_base();
        assert!(program.config().alt_screen);
        assert_eq!(program.config().presentation, Presentation::Pixels);
    }

    #[test]
    fn test_configured_terminal_size() {
        let program = Program::new(Recorder::default()).with_terminal_size(100, 30);
        assert_eq!(program.terminal_size(), (100, 30));
    }

    #[test]
    fn test_update_runs_before_first_frame() {
        let (program, sink) = program(Recorder::default(), b"q");
        let model = program.run().unwrap();

        assert_eq!(model.seen[..3], ["none", "size:40x10", "key:q"]);
        assert!(sink.to_string_lossy().contains("seen 3"));
    }

    #[test]
    fn test_interrupt_byte_quits() {
        let (program, _sink) = program(Recorder::default(), &[0x03]);
        let model = program.run().unwrap();
        assert_eq!(model.seen, ["none", "size:40x10"]);
    }

    #[test]
    fn test_pixel_presentation() {
        let model = Recorder {
            pixels: true,
            ..Recorder::default()
        };
        let (program, sink) = program(model, b"q");
        program.with_pixel_renderer().run().unwrap();

        let output = sink.to_string_lossy();
        assert!(output.contains("\x1b[38;5;3m\x1b[48;5;0m*\x1b[0m"));
        assert!(!output.contains("seen"));
    }

    #[test]
    fn test_renderer_stopped_after_run() {
        let (program, _sink) = program(Recorder::default(), b"q");
        let renderer = program.renderer();
        program.run().unwrap();
        assert!(!renderer.is_running());
    }
}
