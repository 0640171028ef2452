//! Message types for the update loop.
//!
//! [`Msg`] is everything the model reacts to; [`Cmd`] is a deferred effect
//! that reports back with at most one `Msg`.

use std::any::Any;
use std::fmt;
use std::thread;
use std::time::{Duration, SystemTime};

/// An event delivered to [`Model::update`](super::Model::update).
pub enum Msg {
    /// A key press. Arrow keys arrive as `'↑'`, `'↓'`, `'→'` and `'←'`.
    Key {
        /// The character typed.
        rune: char,
    },
    /// Ends the program. The loop stops without rendering again.
    Quit,
    /// A [`tick`] command completed.
    Tick {
        /// When the tick fired.
        at: SystemTime,
    },
    /// The terminal size, sent once before the first frame.
    Size {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// An application-defined payload.
    Custom(Box<dyn Any + Send>),
}

impl Msg {
    /// Wrap an application value as a message.
    pub fn custom<T: Any + Send>(value: T) -> Self {
        Self::Custom(Box::new(value))
    }

    /// Borrow the payload of a `Custom` message if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(payload) => payload.downcast_ref(),
            _ => None,
        }
    }

    /// Take the payload of a `Custom` message if it is a `T`.
    ///
    /// # Errors
    ///
    /// Returns the message unchanged if it is not a `Custom` holding a `T`.
    pub fn into_custom<T: Any>(self) -> Result<T, Self> {
        match self {
            Self::Custom(payload) => payload
                .downcast::<T>()
                .map(|value| *value)
                .map_err(Self::Custom),
            other => Err(other),
        }
    }

    /// Whether this is [`Msg::Quit`].
    pub const fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

impl fmt::Debug for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { rune } => f.debug_struct("Key").field("rune", rune).finish(),
            Self::Quit => f.write_str("Quit"),
            Self::Tick { at } => f.debug_struct("Tick").field("at", at).finish(),
            Self::Size { width, height } => f
                .debug_struct("Size")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A one-shot effect, run on its own thread by the program.
///
/// A `Cmd` is consumed when it runs, so it executes at most once. Whatever
/// message it yields is sent back into the update loop.
pub struct Cmd {
    task: Box<dyn FnOnce() -> Option<Msg> + Send>,
}

impl Cmd {
    /// Create a command from a closure.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce() -> Option<Msg> + Send + 'static,
    {
        Self {
            task: Box::new(task),
        }
    }

    /// A command that just yields `msg`.
    pub fn message(msg: Msg) -> Self {
        Self::new(move || Some(msg))
    }

    /// Execute the command on the current thread.
    pub fn run(self) -> Option<Msg> {
        (self.task)()
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd").finish_non_exhaustive()
    }
}

/// A command that ends the program.
pub fn quit() -> Cmd {
    Cmd::new(|| Some(Msg::Quit))
}

/// A command that sleeps for `duration`, then yields a [`Msg::Tick`].
///
/// It fires once. Re-issue it from `update` to keep ticking.
pub fn tick(duration: Duration) -> Cmd {
    Cmd::new(move || {
        thread::sleep(duration);
        Some(Msg::Tick {
            at: SystemTime::now(),
        })
    })
}

/// A command that yields a [`Msg::Tick`] right away.
pub fn tick_now() -> Cmd {
    Cmd::new(|| {
        Some(Msg::Tick {
            at: SystemTime::now(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    struct Loaded(u32);

    #[test]
    fn test_quit_yields_quit() {
        assert!(quit().run().is_some_and(|msg| msg.is_quit()));
    }

    #[test]
    fn test_tick_waits() {
        let start = Instant::now();
        let msg = tick(Duration::from_millis(20)).run();
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(matches!(msg, Some(Msg::Tick { .. })));
    }

    #[test]
    fn test_tick_now() {
        assert!(matches!(tick_now().run(), Some(Msg::Tick { .. })));
    }

    #[test]
    fn test_cmd_message() {
        let msg = Cmd::message(Msg::Key { rune: 'x' }).run();
        assert!(matches!(msg, Some(Msg::Key { rune: 'x' })));
    }

    #[test]
    fn test_cmd_without_message() {
        assert!(Cmd::new(|| None).run().is_none());
    }

    #[test]
    fn test_custom_downcast() {
        let msg = Msg::custom(Loaded(7));
        assert_eq!(msg.downcast_ref::<Loaded>(), Some(&Loaded(7)));
        assert!(msg.downcast_ref::<String>().is_none());
        assert_eq!(msg.into_custom::<Loaded>().ok(), Some(Loaded(7)));
    }

    #[test]
    fn test_into_custom_wrong_type_returns_msg() {
        let msg = Msg::custom(Loaded(1));
        let msg = msg.into_custom::<String>().unwrap_err();
        assert!(msg.downcast_ref::<Loaded>().is_some());

        assert!(Msg::Quit.into_custom::<Loaded>().unwrap_err().is_quit());
    }

    #[test]
    fn test_debug_hides_payload() {
        assert_eq!(format!("{:?}", Msg::custom(3u8)), "Custom(..)");
        assert_eq!(format!("{:?}", Msg::Key { rune: 'a' }), "Key { rune: 'a' }");
    }
}
