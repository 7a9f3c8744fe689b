#![forbid(unsafe_code)]

//! The unit of the screen grid.
//!
//! A [`Cell`] is one character with a foreground and background color. It is
//! a small `Copy` value: layers store `Option<Cell>` and the merged grid
//! stores plain cells, so compositing is a straight copy.

use stui_core::Color;

/// One character on screen with its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character drawn in this position.
    pub ch: char,
    /// Foreground (TEXT_*) color.
    pub fg: Color,
    /// Background (BG_*) color.
    pub bg: Color,
}

impl Cell {
    /// What an unset position renders as: a blank on white.
    pub const DEFAULT: Self = Self::new(' ', Color::TEXT_WHITE, Color::BG_WHITE);

    #[inline]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Same character and foreground, different background.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::DEFAULT
    }
}
