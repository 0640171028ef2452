//! Pixel renderer: pixel buffers through the text diffing pipeline.

use super::Renderer;
use crate::buffer::PixelBuffer;
use std::ops::Deref;

/// A [`Renderer`] that also accepts [`PixelBuffer`] frames.
///
/// Pixel frames are serialized to ANSI text and submitted like any other
/// frame, so they share the same throttling and line diffing. Every other
/// operation is reached through `Deref`.
#[derive(Debug, Clone)]
pub struct PixelRenderer {
    inner: Renderer,
}

impl PixelRenderer {
    /// Wrap a renderer.
    pub const fn new(inner: Renderer) -> Self {
        Self { inner }
    }

    /// Serialize `buffer` and submit it as the next frame.
    pub fn render_pixels(&self, buffer: &PixelBuffer) {
        self.inner.write(&buffer.render_to_terminal());
    }

    /// The wrapped text renderer.
    pub const fn renderer(&self) -> &Renderer {
        &self.inner
    }
}

impl Deref for PixelRenderer {
    type Target = Renderer;

    fn deref(&self) -> &Renderer {
        &self.inner
    }
}

impl From<Renderer> for PixelRenderer {
    fn from(inner: Renderer) -> Self {
        Self::new(inner)
    }
}
