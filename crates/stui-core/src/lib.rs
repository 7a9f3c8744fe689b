#![forbid(unsafe_code)]

//! Core: key events, the exact-match byte decoder, ANSI colors, and geometry.

pub mod color;
pub mod event;
pub mod geometry;
pub mod key_decoder;
pub mod logging;

pub use color::Color;
pub use event::{KeyEvent, KeyLabel};
pub use geometry::Rect;
pub use key_decoder::{KeyDecoder, RESIZE_SENTINEL};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
