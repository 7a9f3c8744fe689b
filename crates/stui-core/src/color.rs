#![forbid(unsafe_code)]

//! ANSI SGR color codes.
//!
//! Every color is a single SGR parameter: `30..=37`/`90..=97` select a
//! foreground, `40..=47`/`100..=107` a background. Rendering a color is
//! always `ESC [ <code> m`, so the renderer never needs to know which
//! plane a color belongs to.
//!
//! # Example
//!
//! ```
//! use stui_core::color::Color;
//!
//! assert_eq!(Color::TEXT_RED.code(), 31);
//! assert!(Color::BG_BRIGHT_WHITE.is_background());
//! assert_eq!(Color::TEXT_RED.escape(), "\x1b[31m");
//! ```

use std::fmt;
use std::io::{self, Write};

/// One SGR color parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u8);

impl Color {
    /// Attribute reset (`ESC [ 0 m`).
    pub const RESET: Self = Self(0);

    pub const TEXT_BLACK: Self = Self(30);
    pub const TEXT_RED: Self = Self(31);
    pub const TEXT_GREEN: Self = Self(32);
    pub const TEXT_YELLOW: Self = Self(33);
    pub const TEXT_BLUE: Self = Self(34);
    pub const TEXT_MAGENTA: Self = Self(35);
    pub const TEXT_CYAN: Self = Self(36);
    pub const TEXT_WHITE: Self = Self(37);
    pub const TEXT_BRIGHT_BLACK: Self = Self(90);
    pub const TEXT_BRIGHT_RED: Self = Self(91);
    pub const TEXT_BRIGHT_GREEN: Self = Self(92);
    pub const TEXT_BRIGHT_YELLOW: Self = Self(93);
    pub const TEXT_BRIGHT_BLUE: Self = Self(94);
    pub const TEXT_BRIGHT_MAGENTA: Self = Self(95);
    pub const TEXT_BRIGHT_CYAN: Self = Self(96);
    pub const TEXT_BRIGHT_WHITE: Self = Self(97);

    pub const BG_BLACK: Self = Self(40);
    pub const BG_RED: Self = Self(41);
    pub const BG_GREEN: Self = Self(42);
    pub const BG_YELLOW: Self = Self(43);
    pub const BG_BLUE: Self = Self(44);
    pub const BG_MAGENTA: Self = Self(45);
    pub const BG_CYAN: Self = Self(46);
    pub const BG_WHITE: Self = Self(47);
    pub const BG_BRIGHT_BLACK: Self = Self(100);
    pub const BG_BRIGHT_RED: Self = Self(101);
    pub const BG_BRIGHT_GREEN: Self = Self(102);
    pub const BG_BRIGHT_YELLOW: Self = Self(103);
    pub const BG_BRIGHT_BLUE: Self = Self(104);
    pub const BG_BRIGHT_MAGENTA: Self = Self(105);
    pub const BG_BRIGHT_CYAN: Self = Self(106);
    pub const BG_BRIGHT_WHITE: Self = Self(107);

    /// Build a color from a raw SGR code.
    ///
    /// Returns `None` for codes that are not one of the 16 foreground,
    /// 16 background, or reset codes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 | 30..=37 | 40..=47 | 90..=97 | 100..=107 => Some(Self(code)),
            _ => None,
        }
    }

    /// The raw SGR parameter.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// True for `TEXT_*` codes.
    #[inline]
    #[must_use]
    pub const fn is_foreground(self) -> bool {
        matches!(self.0, 30..=37 | 90..=97)
    }

    /// True for `BG_*` codes.
    #[inline]
    #[must_use]
    pub const fn is_background(self) -> bool {
        matches!(self.0, 40..=47 | 100..=107)
    }

    /// The escape sequence as an owned string.
    #[must_use]
    pub fn escape(self) -> String {
        format!("\x1b[{}m", self.0)
    }

    /// Write `ESC [ code m` without allocating.
    #[inline]
    pub fn write_escape<W: Write>(self, w: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 6];
        let len = self.encode(&mut buf);
        w.write_all(&buf[..len])
    }

    /// Encode the escape into `buf`, returning the number of bytes used.
    fn encode(self, buf: &mut [u8; 6]) -> usize {
        buf[0] = 0x1b;
        buf[1] = b'[';
        let mut len = 2;
        let code = self.0;
        if code >= 100 {
            buf[len] = b'0' + code / 100;
            len += 1;
        }
        if code >= 10 {
            buf[len] = b'0' + (code / 10) % 10;
            len += 1;
        }
        buf[len] = b'0' + code % 10;
        len += 1;
        buf[len] = b'm';
        len + 1
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[{}m", self.0)
    }
}
