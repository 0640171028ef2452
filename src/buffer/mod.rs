//! Buffer module: the pixel-grid rendering path.
//!
//! This module contains:
//! - [`Pixel`] and [`Color`]: one colored character cell
//! - [`PixelBuffer`]: a fixed grid of pixels with clipped drawing primitives
//! - [`Compositor`] and [`Layer`]: merging stacked buffers by opacity

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
mod compositor;

pub use buffer::PixelBuffer;
pub use cell::{Color, Pixel};
pub use compositor::{Compositor, Layer, OPACITY_THRESHOLD};
