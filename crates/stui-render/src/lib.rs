#![forbid(unsafe_code)]

//! Render kernel: cells, layered screen buffer, and ANSI frame output.

pub mod ansi;
pub mod cell;
pub mod screen;

pub use cell::Cell;
pub use screen::ScreenBuffer;
