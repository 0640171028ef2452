//! Input Actor: Dedicated thread reading raw terminal input.
//!
//! The actor owns the input stream for the whole run. Each read is
//! decoded as one unit; recognized chunks become [`Msg`]s on the shared
//! channel and everything else is dropped.

use super::messages::Msg;
use crossbeam_channel::Sender;
use std::io::{self, Read};
use std::thread::{self, JoinHandle};

/// Size of a single read from the input stream.
pub const READ_CHUNK: usize = 1024;

/// The interrupt byte (Ctrl+C in raw mode).
const INTERRUPT: u8 = 0x03;
const ESC: u8 = 0x1B;

/// Decode one chunk of raw input.
///
/// - `ESC [ A/B/C/D` becomes an arrow [`Msg::Key`] (`'↑' '↓' '→' '←'`)
/// - a leading `0x03` becomes [`Msg::Quit`]
/// - any other single byte becomes a `Msg::Key` carrying that byte
/// - everything else yields `None`
pub fn decode(chunk: &[u8]) -> Option<Msg> {
    if let [ESC, b'[', code, ..] = chunk {
        let rune = match *code {
            b'A' => Some('↑'),
            b'B' => Some('↓'),
            b'C' => Some('→'),
            b'D' => Some('←'),
            _ => None,
        };
        if let Some(rune) = rune {
            return Some(Msg::Key { rune });
        }
    }

    match chunk {
        [INTERRUPT, ..] => Some(Msg::Quit),
        [ESC] => None,
        [byte] => Some(Msg::Key {
            rune: char::from(*byte),
        }),
        _ => None,
    }
}

/// Input actor that reads and decodes raw input.
#[derive(Debug)]
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `reader` - The input stream; owned by the thread until it exits.
    /// * `sender` - Channel to send decoded messages to the main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn<R>(reader: R, sender: Sender<Msg>) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("pulse-input".to_string())
            .spawn(move || Self::run_loop(reader, &sender))?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Whether the input thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the input thread to finish.
    ///
    /// This blocks until the reader returns, so it is only useful once
    /// the stream has ended or an interrupt was read.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input loop.
    ///
    /// Exits after sending `Quit`, at end of stream, on a read error, or
    /// once the main loop has dropped its receiver.
    fn run_loop<R: Read>(mut reader: R, sender: &Sender<Msg>) {
        let mut buf = [0u8; READ_CHUNK];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => {
                    tracing::debug!("input stream closed");
                    break;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    tracing::debug!(%error, "input read failed");
                    break;
                }
            };

            let Some(msg) = decode(&buf[..n]) else {
                tracing::trace!(bytes = n, "dropped unrecognized input");
                continue;
            };

            let quit = msg.is_quit();
            if sender.send(msg).is_err() {
                // Receiver dropped, exit
                break;
            }
            if quit {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    fn key(chunk: &[u8]) -> Option<char> {
        match decode(chunk) {
            Some(Msg::Key { rune }) => Some(rune),
            _ => None,
        }
    }

    #[test]
    fn test_decode_arrows() {
        assert_eq!(key(b"\x1b[A"), Some('↑'));
        assert_eq!(key(b"\x1b[B"), Some('↓'));
        assert_eq!(key(b"\x1b[C"), Some('→'));
        assert_eq!(key(b"\x1b[D"), Some('←'));
    }

    #[test]
    fn test_decode_single_bytes() {
        assert_eq!(key(b"q"), Some('q'));
        assert_eq!(key(b" "), Some(' '));
        assert_eq!(key(b"\r"), Some('\r'));
    }

    #[test]
    fn test_decode_interrupt() {
        assert!(decode(&[0x03]).is_some_and(|m| m.is_quit()));
        assert!(decode(&[0x03, b'x']).is_some_and(|m| m.is_quit()));
    }

    #[test]
    fn test_decode_drops_unknown() {
        assert!(decode(b"").is_none());
        assert!(decode(b"\x1b").is_none());
        assert!(decode(b"\x1b[").is_none());
        assert!(decode(b"\x1b[H").is_none());
        assert!(decode(b"ab").is_none());
        assert!(decode("é".as_bytes()).is_none());
    }

    #[test]
    fn test_actor_stops_after_interrupt() {
        let (tx, rx) = unbounded();
        // A cursor yields everything in one read, so feed chunks one at a time.
        let chunks: [&'static [u8]; 4] = [b"a", b"\x1b[A", &[0x03], b"z"];
        let reader = Chunks(chunks.into_iter());
        let actor = InputActor::spawn(reader, tx).unwrap();
        actor.join();

        let received: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(received[0], Msg::Key { rune: 'a' }));
        assert!(matches!(received[1], Msg::Key { rune: '↑' }));
        assert!(received[2].is_quit());
    }

    #[test]
    fn test_actor_stops_at_end_of_stream() {
        let (tx, rx) = unbounded();
        let actor = InputActor::spawn(Cursor::new(b"x".to_vec()), tx).unwrap();
        actor.join();

        let received: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(received.len(), 1);
    }

    #[test]
    fn test_actor_stops_when_receiver_dropped() {
        let (tx, rx) = unbounded();
        drop(rx);
        let actor = InputActor::spawn(Chunks(vec![b"a".as_slice(); 3].into_iter()), tx).unwrap();
        actor.join();
    }

    /// Serves one chunk per `read` call.
    struct Chunks<I>(I);

    impl<'a, I: Iterator<Item = &'a [u8]>> Read for Chunks<I> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let Some(chunk) = self.0.next() else {
                return Ok(0);
            };
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }
}
