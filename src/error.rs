//! Error types for Pulse.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end [`Program::run`](crate::Program::run) before the loop starts.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The terminal could not be put into raw mode.
    #[error("failed to enter raw mode: {0}")]
    RawMode(#[source] io::Error),

    /// A runtime thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Which thread.
        name: &'static str,
        /// The OS error.
        #[source]
        source: io::Error,
    },
}

/// Errors loading a localization catalog.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The catalog file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the catalog file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: io::Error,
    },

    /// The catalog is not valid JSON.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog's top level is not a JSON object.
    #[error("catalog must be a JSON object")]
    NotAnObject,

    /// The catalog directory could not be listed.
    #[error("failed to list {}: {source}", .path.display())]
    ReadDir {
        /// The catalog directory.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors loading animation frames.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// The frames file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the frames file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: io::Error,
    },

    /// The frames file is empty.
    #[error("animation file is empty")]
    Empty,

    /// No non-blank frame was found.
    #[error("no valid frames found")]
    NoFrames,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_program_error_display() {
        let err = ProgramError::RawMode(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert_eq!(err.to_string(), "failed to enter raw mode: not a tty");
        assert!(err.source().is_some());

        let err = ProgramError::Spawn {
            name: "input",
            source: io::Error::new(io::ErrorKind::Other, "limit"),
        };
        assert_eq!(err.to_string(), "failed to spawn input thread: limit");
    }

    #[test]
    fn test_locale_error_display() {
        let err = LocaleError::Read {
            path: PathBuf::from("lang/xx.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read lang/xx.json: missing");
        assert_eq!(LocaleError::NotAnObject.to_string(), "catalog must be a JSON object");
    }

    #[test]
    fn test_animation_error_display() {
        assert_eq!(AnimationError::Empty.to_string(), "animation file is empty");
        assert_eq!(AnimationError::NoFrames.to_string(), "no valid frames found");
    }
}
