//! `PixelBuffer`: A fixed grid of colored character cells.
//!
//! Pixels are stored contiguously in row-major order. Every drawing
//! primitive goes through clipping, so coordinates outside the grid
//! (including negative ones) are silently ignored.

use super::cell::Pixel;
use crate::terminal::OutputBuffer;

/// A fixed-size grid of [`Pixel`]s.
///
/// Access is in row-major order: `index = y * width + x`. The storage
/// always holds exactly `width * height` pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Pixel>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl PixelBuffer {
    /// Create a new buffer filled with [`Pixel::EMPTY`].
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            pixels: vec![Pixel::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the buffer has no pixels (zero width or height).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get a reference to the underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Convert signed (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let col = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;
        if col < self.width as usize && row < self.height as usize {
            Some(row * (self.width as usize) + col)
        } else {
            None
        }
    }

    /// Get the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Pixel> {
        self.index_of(x, y).map(|i| &self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are no-ops.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = pixel;
        }
    }

    /// Fill a rectangle, clipped to the buffer on every side.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, pixel: Pixel) {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = x.saturating_add(width).min(i32::from(self.width));
        let y_end = y.saturating_add(height).min(i32::from(self.height));

        for row in y_start..y_end {
            for col in x_start..x_end {
                self.set_pixel(col, row, pixel);
            }
        }
    }

    /// Draw a line from (x1, y1) to (x2, y2) using integer Bresenham.
    ///
    /// Both endpoints are plotted and consecutive points are 8-connected.
    /// Only the steps whose major-axis coordinate lands inside the buffer are
    /// visited, so endpoints anywhere in the `i32` range are fine.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, pixel: Pixel) {
        let (x1, y1) = (i64::from(x1), i64::from(y1));
        let (x2, y2) = (i64::from(x2), i64::from(y2));
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        let sx = if x1 > x2 { -1 } else { 1 };
        let sy = if y1 > y2 { -1 } else { 1 };

        if dx >= dy {
            // Shallow: step along x, occasionally along y
            let major = Axis { start: x1, step: sx, len: dx };
            let minor = Axis { start: y1, step: sy, len: dy };
            for (x, y) in line_points(major, minor, i64::from(self.width)) {
                self.plot(x, y, pixel);
            }
        } else {
            // Steep: step along y, occasionally along x
            let major = Axis { start: y1, step: sy, len: dy };
            let minor = Axis { start: x1, step: sx, len: dx };
            for (y, x) in line_points(major, minor, i64::from(self.height)) {
                self.plot(x, y, pixel);
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, pixel: Pixel) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y, pixel);
        }
    }

    /// Fill the whole buffer with one pixel.
    pub fn fill(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    /// Reset every pixel to [`Pixel::EMPTY`].
    pub fn clear(&mut self) {
        self.fill(Pixel::EMPTY);
    }

    /// Get an iterator over rows. Always yields exactly `height` rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        let width = self.width as usize;
        (0..self.height as usize).map(move |y| &self.pixels[y * width..(y + 1) * width])
    }

    /// Serialize the buffer as ANSI text into `out`.
    ///
    /// Every pixel is emitted as foreground SGR, background SGR, the
    /// character, then an attribute reset. Adjacent pixels with equal colors
    /// are not merged. Rows are separated by `\n`.
    pub fn write_ansi(&self, out: &mut OutputBuffer) {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                out.write_byte(b'\n');
            }
            for pixel in row {
                out.set_fg(pixel.fg);
                out.set_bg(pixel.bg);
                out.write_char(pixel.ch);
                out.reset_attrs();
            }
        }
    }

    /// Serialize the buffer as an ANSI string ready for a renderer.
    pub fn render_to_terminal(&self) -> String {
        // ~25 bytes of escapes per pixel
        let mut out = OutputBuffer::with_capacity(self.len() * 25 + self.height as usize);
        self.write_ansi(&mut out);
        out.into_string()
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// One axis of a line: start coordinate, direction and number of steps.
#[derive(Debug, Clone, Copy)]
struct Axis {
    start: i64,
    step: i64,
    len: i64,
}

/// Points of a Bresenham line whose major coordinate lies in `0..extent`.
///
/// The decision variable after `k` major steps has advanced the minor axis
/// `ceil((2 * minor.len * k - major.len) / (2 * major.len))` times, which
/// lets the walk start at the first visible step instead of at the endpoint.
fn line_points(major: Axis, minor: Axis, extent: i64) -> impl Iterator<Item = (i64, i64)> {
    let (first, last) = if major.step > 0 {
        (-major.start, extent - 1 - major.start)
    } else {
        (major.start - (extent - 1), major.start)
    };
    let first = first.max(0);
    let last = last.min(major.len);

    (first..=last).filter_map(move |k| {
        let offset = if major.len == 0 {
            0
        } else {
            let num = 2 * i128::from(minor.len) * i128::from(k) - i128::from(major.len);
            let den = 2 * i128::from(major.len);
            num.div_euclid(den) + i128::from(num.rem_euclid(den) != 0)
        };
        let minor_at = i128::from(minor.start) + i128::from(minor.step) * offset;
        Some((major.start + major.step * k, i64::try_from(minor_at).ok()?))
    })
}
