//! Actor Model: Message-passing concurrency for the update loop.
//!
//! This module implements the runtime using crossbeam channels:
//! - **Input Actor**: Reads raw input, forwards decoded messages
//! - **Command threads**: One per [`Cmd`], each reporting back at most once
//! - **Main Loop**: The only place the [`Model`] is updated
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐        Msg          ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Main Loop   │
//!                                      │  (update)    │
//! ┌──────────────┐        Msg          │              │
//! │ Cmd Threads  │ ─────────────────▶  │              │
//! └──────────────┘                     └──────────────┘
//!                                            │
//!                                            │ write(view)
//!                                            ▼
//!                                      ┌──────────────┐
//!                                      │ Flush Thread │
//!                                      └──────────────┘
//! ```
//!
//! The message channel has no buffer: a sender blocks until the main
//! loop is ready to receive.

mod input;
mod messages;
mod model;
mod program;

pub use input::{decode, InputActor, READ_CHUNK};
pub use messages::{quit, tick, tick_now, Cmd, Msg};
pub use model::Model;
pub use program::{Presentation, Program, ProgramConfig};
