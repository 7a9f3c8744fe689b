#![forbid(unsafe_code)]

//! ANSI escape sequences used by the frame serializer.
//!
//! | Sequence | Bytes | Meaning |
//! |----------|-------|---------|
//! | CUP home | `ESC [ H` | cursor to row 1, column 1 |
//! | CNL | `ESC [ E` | cursor to start of next line |
//! | SGR reset | `ESC [ 0 m` | drop all colors |
//! | ED 2 | `ESC [ 2 J` | erase display |
//! | DECTCEM | `ESC [ ? 25 l/h` | hide/show cursor |
//!
//! Color escapes come from [`stui_core::Color::write_escape`].

use std::io::{self, Write};

use stui_core::Color;

/// Cursor home: `CSI H`
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Cursor next line: `CSI E`
pub const NEXT_LINE: &[u8] = b"\x1b[E";

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Erase display: `CSI 2 J`
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";

/// Hide cursor: `CSI ? 25 l`
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// Show cursor: `CSI ? 25 h`
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

#[inline]
pub fn cursor_home<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

#[inline]
pub fn next_line<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(NEXT_LINE)
}

#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY)
}

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

/// Write one cell: background code, foreground code, then the character.
#[inline]
pub fn cell<W: Write>(w: &mut W, ch: char, fg: Color, bg: Color) -> io::Result<()> {
    bg.write_escape(w)?;
    fg.write_escape(w)?;
    let mut utf8 = [0u8; 4];
    w.write_all(ch.encode_utf8(&mut utf8).as_bytes())
}
