//! Animation: cycles through text frames on a timer.
//!
//! Frames files hold plain text frames separated by `---` lines:
//!
//! ```text
//!  o
//! /|\
//! ---
//! \o/
//!  |
//! ```

use crate::actor::{tick, Cmd, Msg};
use crate::error::AnimationError;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Time each frame stays on screen unless configured otherwise.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(200);

/// Shown when an animation has no frames.
const NO_FRAMES: &str = "Animation has no frames.";

/// Split frame text on `---` separators.
///
/// Carriage returns are removed, each frame is trimmed of surrounding
/// newlines and tabs, and blank frames are dropped.
pub fn parse_frames(content: &str) -> Result<Vec<String>, AnimationError> {
    let content = content.replace('\r', "");
    let frames: Vec<String> = content
        .split("---")
        .map(|frame| frame.trim_matches(|c: char| c == '\n' || c == '\t'))
        .filter(|frame| !frame.is_empty())
        .map(str::to_owned)
        .collect();

    if frames.is_empty() {
        return Err(AnimationError::NoFrames);
    }
    Ok(frames)
}

/// Read and parse a frames file.
pub fn load_frames(path: impl AsRef<Path>) -> Result<Vec<String>, AnimationError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| AnimationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Err(AnimationError::Empty);
    }
    parse_frames(&content)
}

/// A looping sequence of text frames, advanced by [`Msg::Tick`].
///
/// Embed it in a model: forward messages to [`update`](Self::update) and
/// return the command it gives back so the ticks keep coming.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<String>,
    current: usize,
    speed: Duration,
}

impl Animation {
    /// Create an animation at [`DEFAULT_SPEED`].
    pub const fn new(frames: Vec<String>) -> Self {
        Self {
            frames,
            current: 0,
            speed: DEFAULT_SPEED,
        }
    }

    /// Set the time each frame stays on screen.
    #[must_use]
    pub fn with_speed(mut self, speed: Duration) -> Self {
        self.speed = speed;
        self
    }

    /// The command that starts the animation.
    pub fn init(&self) -> Cmd {
        tick(self.speed)
    }

    /// Advance one frame on a tick and schedule the next one.
    ///
    /// Other messages leave the animation as it is.
    pub fn update(mut self, msg: &Msg) -> (Self, Option<Cmd>) {
        if !matches!(msg, Msg::Tick { .. }) {
            return (self, None);
        }
        if !self.frames.is_empty() {
            self.current = (self.current + 1) % self.frames.len();
        }
        let cmd = tick(self.speed);
        (self, Some(cmd))
    }

    /// The current frame.
    pub fn view(&self) -> &str {
        self.frames.get(self.current).map_or(NO_FRAMES, String::as_str)
    }

    /// Index of the current frame.
    pub const fn current_frame(&self) -> usize {
        self.current
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time each frame stays on screen.
    pub const fn speed(&self) -> Duration {
        self.speed
    }
}
