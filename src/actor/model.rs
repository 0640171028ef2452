//! The application boundary.

use super::messages::{Cmd, Msg};
use crate::buffer::PixelBuffer;

/// Application state plus its transition and presentation logic.
///
/// The program owns the model and is the only caller of these methods.
/// `update` consumes the model and returns its replacement, so state is
/// never mutated behind the loop's back.
///
/// ```
/// use pulse::{quit, Cmd, Model, Msg};
///
/// struct Counter(u32);
///
/// impl Model for Counter {
///     fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
///         match msg {
///             Some(Msg::Key { rune: 'q' }) => (self, Some(quit())),
///             Some(Msg::Key { .. }) => (Self(self.0 + 1), None),
///             _ => (self, None),
///         }
///     }
///
///     fn view(&self) -> String {
///         format!("pressed {} keys", self.0)
///     }
/// }
/// ```
pub trait Model: Sized {
    /// An optional message to feed into the first `update`.
    fn init(&self) -> Option<Msg> {
        None
    }

    /// Handle a message, returning the next model and an optional command.
    ///
    /// Called with `None` once at startup when `init` yields nothing.
    fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>);

    /// The current frame as text.
    fn view(&self) -> String;

    /// The current frame as pixels, for programs in pixel mode.
    ///
    /// Programs in pixel mode fall back to `view` when this is `None`.
    fn pixel_view(&self) -> Option<PixelBuffer> {
        None
    }
}
