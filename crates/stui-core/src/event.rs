#![forbid(unsafe_code)]

//! Semantic key events.
//!
//! A [`KeyEvent`] is the decoded meaning of one raw input chunk. It is
//! produced by [`KeyDecoder`](crate::key_decoder::KeyDecoder) and never
//! mutated afterwards.
//!
//! Two shapes exist:
//!
//! - **functional** keys (arrows, F-keys, ENTER, DELETE, ...) carry an empty
//!   value and are identified purely by their [`KeyLabel`];
//! - **literal** keys (digits, comma, period, space) carry the text they
//!   insert, so character-input widgets can append `value()` directly.

use std::fmt;

/// Semantic name of a decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLabel {
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Comma,
    Period,
    /// `CR LF`.
    Enter,
    /// A bare `CR`.
    EnterAlt,
    CtrlC,
    Delete,
    Esc,
    Space,
    /// No table entry matched the chunk.
    Unknown,
    /// Synthetic window-change notification injected by the transport.
    ///
    /// Never produced by a keystroke.
    WindowResize,
}

impl KeyLabel {
    /// Zero-based index of a function key (`F1` is 0).
    #[must_use]
    pub const fn function_key_index(self) -> Option<usize> {
        match self {
            Self::F1 => Some(0),
            Self::F2 => Some(1),
            Self::F3 => Some(2),
            Self::F4 => Some(3),
            Self::F5 => Some(4),
            Self::F6 => Some(5),
            Self::F7 => Some(6),
            Self::F8 => Some(7),
            Self::F9 => Some(8),
            Self::F10 => Some(9),
            Self::F11 => Some(10),
            Self::F12 => Some(11),
            _ => None,
        }
    }

    /// Label of the ASCII digit `d` (`0..=9`).
    #[must_use]
    pub const fn digit(d: u8) -> Option<Self> {
        match d {
            0 => Some(Self::Digit0),
            1 => Some(Self::Digit1),
            2 => Some(Self::Digit2),
            3 => Some(Self::Digit3),
            4 => Some(Self::Digit4),
            5 => Some(Self::Digit5),
            6 => Some(Self::Digit6),
            7 => Some(Self::Digit7),
            8 => Some(Self::Digit8),
            9 => Some(Self::Digit9),
            _ => None,
        }
    }

    /// Either ENTER variant.
    #[inline]
    #[must_use]
    pub const fn is_enter(self) -> bool {
        matches!(self, Self::Enter | Self::EnterAlt)
    }

    /// Keys that trigger a widget's primary action.
    #[inline]
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::EnterAlt | Self::Space)
    }
}

/// A decoded keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    value: String,
    functional: bool,
    label: KeyLabel,
}

impl KeyEvent {
    /// A functional key: empty value.
    #[must_use]
    pub const fn functional(label: KeyLabel) -> Self {
        Self {
            value: String::new(),
            functional: true,
            label,
        }
    }

    /// A key that inserts `value`.
    #[must_use]
    pub fn literal(value: impl Into<String>, label: KeyLabel) -> Self {
        Self {
            value: value.into(),
            functional: false,
            label,
        }
    }

    /// The event produced for an unmatched chunk.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::functional(KeyLabel::Unknown)
    }

    /// Text inserted by this key; empty for functional keys.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    #[must_use]
    pub const fn is_functional(&self) -> bool {
        self.functional
    }

    #[inline]
    #[must_use]
    pub const fn label(&self) -> KeyLabel {
        self.label
    }

    /// True when no table entry matched.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self.label, KeyLabel::Unknown)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.functional {
            write!(f, "{:?}", self.label)
        } else {
            write!(f, "{:?}({:?})", self.label, self.value)
        }
    }
}
