//! Compositor: merges an ordered stack of pixel buffers.
//!
//! Layers are kept in insertion order and painted first to last. A layer
//! contributes all of its pixels when its opacity is above one half and
//! nothing otherwise; there is no alpha blending.

use super::buffer::PixelBuffer;

/// Opacity a layer must exceed to be painted.
pub const OPACITY_THRESHOLD: f32 = 0.5;

/// A pixel buffer placed in a composite stack.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    /// The pixels of this layer.
    pub buffer: &'a PixelBuffer,
    /// Stacking hint. Stored, but the compositor paints in insertion order.
    pub z_index: i32,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f32,
}

impl<'a> Layer<'a> {
    /// Create a layer.
    pub const fn new(buffer: &'a PixelBuffer, z_index: i32, opacity: f32) -> Self {
        Self {
            buffer,
            z_index,
            opacity,
        }
    }

    /// Whether this layer is painted during compositing.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > OPACITY_THRESHOLD
    }
}

/// An ordered collection of [`Layer`]s.
#[derive(Debug, Clone, Default)]
pub struct Compositor<'a> {
    layers: Vec<Layer<'a>>,
}

impl<'a> Compositor<'a> {
    /// Create an empty compositor.
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer on top of the stack. The stack is not re-sorted.
    pub fn add_layer(&mut self, layer: Layer<'a>) {
        self.layers.push(layer);
    }

    /// The layers in paint order.
    pub fn layers(&self) -> &[Layer<'a>] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been added.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Merge all layers into a new buffer sized to the first layer.
    ///
    /// Starts from an all-[`Pixel::EMPTY`](super::Pixel::EMPTY) buffer; each
    /// visible layer then overwrites every cell it covers. Cells beyond the
    /// first layer's size are clipped. Returns `None` with no layers.
    pub fn composite(&self) -> Option<PixelBuffer> {
        let base = self.layers.first()?;
        let mut result = PixelBuffer::new(base.buffer.width(), base.buffer.height());

        for layer in self.layers.iter().filter(|layer| layer.is_visible()) {
            for (y, row) in layer.buffer.rows().enumerate() {
                for (x, pixel) in row.iter().enumerate() {
                    // Buffer dimensions are u16, so both fit in i32
                    result.set_pixel(x as i32, y as i32, *pixel);
                }
            }
        }

        Some(result)
    }
}
