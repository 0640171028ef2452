//! # Pulse
//!
//! An Elm-style terminal UI runtime.
//!
//! A [`Program`] owns a [`Model`] and feeds it one [`Msg`] at a time. The
//! model returns its replacement plus an optional [`Cmd`], a one-shot
//! effect that runs on its own thread and reports back with a message.
//! After every update the model's view is handed to a [`Renderer`], which
//! flushes at a fixed frame rate and rewrites only the lines that changed.
//!
//! ## Core Concepts
//!
//! - **Single writer**: only the main loop ever touches the model
//! - **Latest frame wins**: the renderer keeps one pending frame and drops
//!   frames that are byte-identical to the last one flushed
//! - **Line diffing**: unchanged lines are skipped, stale lines erased
//! - **Pixel path**: [`PixelBuffer`]s and a [`Compositor`] for grid drawing,
//!   rendered through the same pipeline as text
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulse::{quit, Cmd, Model, Msg, Program};
//!
//! struct Hello;
//!
//! impl Model for Hello {
//!     fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
//!         match msg {
//!             Some(Msg::Key { rune: 'q' }) => (self, Some(quit())),
//!             _ => (self, None),
//!         }
//!     }
//!
//!     fn view(&self) -> String {
//!         "Hello! Press q to quit.".to_string()
//!     }
//! }
//!
//! Program::new(Hello).run()?;
//! # Ok::<(), pulse::ProgramError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod error;
pub mod locale;
pub mod render;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use actor::{quit, tick, tick_now, Cmd, Model, Msg, Presentation, Program, ProgramConfig};
pub use buffer::{Color, Compositor, Layer, Pixel, PixelBuffer};
pub use error::{AnimationError, LocaleError, ProgramError};
pub use locale::{Catalog, Localizer};
pub use render::{PixelRenderer, Renderer};
pub use widget::Animation;
