//! Render module: text frames to minimal terminal writes.
//!
//! This module contains:
//! - [`Renderer`]: the shared, frame-rate limited writer
//! - [`PixelRenderer`]: a renderer that also takes [`PixelBuffer`](crate::PixelBuffer)s
//! - [`diff`]: the line differ behind both
//! - [`text`]: escape-aware width measurement and truncation

pub mod diff;
mod pixel;
mod renderer;
pub mod text;

pub use diff::{render_frame, DiffState};
pub use pixel::PixelRenderer;
pub use renderer::{Renderer, DEFAULT_FPS};
