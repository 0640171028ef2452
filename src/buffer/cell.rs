//! Pixel: The atomic unit of the pixel grid.
//!
//! A pixel is one character cell with an 8-value foreground and background
//! color drawn from the base ANSI palette.

/// One of the eight base ANSI colors.
///
/// The discriminant is the palette index used in 256-color SGR sequences.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Palette index 0.
    #[default]
    Black = 0,
    /// Palette index 1.
    Red = 1,
    /// Palette index 2.
    Green = 2,
    /// Palette index 3.
    Yellow = 3,
    /// Palette index 4.
    Blue = 4,
    /// Palette index 5.
    Magenta = 5,
    /// Palette index 6.
    Cyan = 6,
    /// Palette index 7.
    White = 7,
}

impl Color {
    /// All colors in palette order.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// The palette index of this color.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look up a color by palette index.
    ///
    /// Returns `None` for indices outside `0..8`.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }
}

/// A single colored character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// The character drawn in the cell.
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Pixel {
    /// A blank pixel: a space on black, black foreground.
    ///
    /// Freshly allocated buffers are filled with this value.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: Color::Black,
        bg: Color::Black,
    };

    /// Create a pixel.
    #[inline]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Builder: set the character.
    #[inline]
    #[must_use]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    /// Builder: set the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Builder: set the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<char> for Pixel {
    fn from(ch: char) -> Self {
        Self::EMPTY.with_fg(Color::White).with_char(ch)
    }
}
