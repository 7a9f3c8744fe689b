#![forbid(unsafe_code)]

//! Exact-match decoder from raw input chunks to [`KeyEvent`]s.
//!
//! The decoder receives one already-delimited chunk (whatever a single
//! transport read returned) and looks it up verbatim in a fixed table.
//! There is no prefix matching, no partial-sequence buffering, and no
//! timeout-based ESC disambiguation: `[27, 91, 65]` is ARROW_UP while
//! `[27, 91, 65, 1]` is unknown.
//!
//! # Known gap
//!
//! A multi-byte escape sequence split across two transport reads decodes
//! as two unknown chunks. Interactive terminals send each keystroke in one
//! write, so this does not show up in practice, but pasted input or a
//! fragmenting transport will lose keys.
//!
//! # Table
//!
//! | Bytes | Label |
//! |-------|-------|
//! | `3` | CtrlC |
//! | `ESC [ A/B/C/D` | ArrowUp/Down/Right/Left |
//! | `ESC O P..S` | F1..F4 |
//! | `ESC [ 1 5 ~` .. `ESC [ 2 4 ~` | F5..F12 |
//! | `CR LF` / `CR` | Enter / EnterAlt |
//! | `127` | Delete |
//! | `32` | Space |
//! | `27` | Esc |
//! | `'0'..='9'`, `','`, `'.'` | literal keys |
//! | `255 255 0 255 255` | WindowResize (synthetic) |

use std::collections::HashMap;

use crate::event::{KeyEvent, KeyLabel};

/// Synthetic chunk a transport injects to signal a window-size change.
///
/// Telnet escapes a literal 255 as `IAC IAC`, and no terminal emits this
/// pattern for a keystroke.
pub const RESIZE_SENTINEL: [u8; 5] = [255, 255, 0, 255, 255];

/// Exact-match lookup table.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    keys: HashMap<Vec<u8>, KeyEvent>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Build the decoder with the standard table.
    #[must_use]
    pub fn new() -> Self {
        let mut decoder = Self {
            keys: HashMap::with_capacity(40),
        };

        decoder.functional(&[3], KeyLabel::CtrlC);
        decoder.functional(&[27, 91, 65], KeyLabel::ArrowUp);
        decoder.functional(&[27, 91, 66], KeyLabel::ArrowDown);
        decoder.functional(&[27, 91, 67], KeyLabel::ArrowRight);
        decoder.functional(&[27, 91, 68], KeyLabel::ArrowLeft);

        decoder.functional(&[27, 79, 80], KeyLabel::F1);
        decoder.functional(&[27, 79, 81], KeyLabel::F2);
        decoder.functional(&[27, 79, 82], KeyLabel::F3);
        decoder.functional(&[27, 79, 83], KeyLabel::F4);
        decoder.functional(&[27, 91, 49, 53, 126], KeyLabel::F5);
        decoder.functional(&[27, 91, 49, 55, 126], KeyLabel::F6);
        decoder.functional(&[27, 91, 49, 56, 126], KeyLabel::F7);
        decoder.functional(&[27, 91, 49, 57, 126], KeyLabel::F8);
        decoder.functional(&[27, 91, 50, 48, 126], KeyLabel::F9);
        decoder.functional(&[27, 91, 50, 49, 126], KeyLabel::F10);
        decoder.functional(&[27, 91, 50, 51, 126], KeyLabel::F11);
        decoder.functional(&[27, 91, 50, 52, 126], KeyLabel::F12);

        decoder.functional(&[13, 10], KeyLabel::Enter);
        decoder.functional(&[13], KeyLabel::EnterAlt);
        decoder.functional(&[127], KeyLabel::Delete);
        decoder.functional(&[27], KeyLabel::Esc);
        decoder.literal(b' ', KeyLabel::Space);

        for d in 0..=9u8 {
            if let Some(label) = KeyLabel::digit(d) {
                decoder.literal(b'0' + d, label);
            }
        }
        decoder.literal(b',', KeyLabel::Comma);
        decoder.literal(b'.', KeyLabel::Period);

        decoder.functional(&RESIZE_SENTINEL, KeyLabel::WindowResize);
        decoder
    }

    fn functional(&mut self, bytes: &[u8], label: KeyLabel) {
        self.keys.insert(bytes.to_vec(), KeyEvent::functional(label));
    }

    fn literal(&mut self, byte: u8, label: KeyLabel) {
        let value = char::from(byte).to_string();
        self.keys.insert(vec![byte], KeyEvent::literal(value, label));
    }

    /// Decode one chunk.
    ///
    /// Unmatched chunks yield [`KeyEvent::unknown`]; the caller decides
    /// whether to log and drop them.
    #[must_use]
    pub fn decode(&self, chunk: &[u8]) -> KeyEvent {
        self.lookup(chunk).cloned().unwrap_or_else(KeyEvent::unknown)
    }

    /// Borrowing lookup. `None` when the chunk is not in the table.
    #[inline]
    #[must_use]
    pub fn lookup(&self, chunk: &[u8]) -> Option<&KeyEvent> {
        self.keys.get(chunk)
    }

    /// Number of byte sequences in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(bytes: &[u8]) -> KeyLabel {
        KeyDecoder::new().decode(bytes).label()
    }

    #[test]
    fn arrows() {
        assert_eq!(label(b"\x1b[A"), KeyLabel::ArrowUp);
        assert_eq!(label(b"\x1b[B"), KeyLabel::ArrowDown);
        assert_eq!(label(b"\x1b[C"), KeyLabel::ArrowRight);
        assert_eq!(label(b"\x1b[D"), KeyLabel::ArrowLeft);
    }

    #[test]
    fn trailing_byte_defeats_match() {
        assert_eq!(label(&[27, 91, 65]), KeyLabel::ArrowUp);
        assert_eq!(label(&[27, 91, 65, 1]), KeyLabel::Unknown);
    }

    #[test]
    fn prefix_alone_is_not_a_key() {
        assert_eq!(label(&[27, 91]), KeyLabel::Unknown);
        assert_eq!(label(&[27, 91, 49, 53]), KeyLabel::Unknown);
    }

    #[test]
    fn function_keys() {
        assert_eq!(label(b"\x1bOP"), KeyLabel::F1);
        assert_eq!(label(b"\x1bOS"), KeyLabel::F4);
        assert_eq!(label(b"\x1b[15~"), KeyLabel::F5);
        assert_eq!(label(b"\x1b[17~"), KeyLabel::F6);
        assert_eq!(label(b"\x1b[18~"), KeyLabel::F7);
        assert_eq!(label(b"\x1b[19~"), KeyLabel::F8);
        assert_eq!(label(b"\x1b[20~"), KeyLabel::F9);
        assert_eq!(label(b"\x1b[21~"), KeyLabel::F10);
        assert_eq!(label(b"\x1b[23~"), KeyLabel::F11);
        assert_eq!(label(b"\x1b[24~"), KeyLabel::F12);
        // xterm skips 16 and 22.
        assert_eq!(label(b"\x1b[16~"), KeyLabel::Unknown);
        assert_eq!(label(b"\x1b[22~"), KeyLabel::Unknown);
    }

    #[test]
    fn enter_variants() {
        assert_eq!(label(b"\r\n"), KeyLabel::Enter);
        assert_eq!(label(b"\r"), KeyLabel::EnterAlt);
        assert_eq!(label(b"\n"), KeyLabel::Unknown);
    }

    #[test]
    fn control_keys() {
        assert_eq!(label(&[3]), KeyLabel::CtrlC);
        assert_eq!(label(&[127]), KeyLabel::Delete);
        assert_eq!(label(&[27]), KeyLabel::Esc);
    }

    #[test]
    fn literals_carry_their_text() {
        let decoder = KeyDecoder::new();
        for (byte, text) in [(b'0', "0"), (b'9', "9"), (b',', ","), (b'.', "."), (b' ', " ")] {
            let ev = decoder.decode(&[byte]);
            assert!(!ev.is_functional(), "{text} should be literal");
            assert_eq!(ev.value(), text);
        }
        assert_eq!(decoder.decode(b"5").label(), KeyLabel::Digit5);
        assert_eq!(decoder.decode(b" ").label(), KeyLabel::Space);
    }

    #[test]
    fn letters_are_not_in_the_table() {
        assert!(KeyDecoder::new().decode(b"a").is_unknown());
    }

    #[test]
    fn resize_sentinel_is_reserved() {
        assert_eq!(label(&RESIZE_SENTINEL), KeyLabel::WindowResize);
        assert_eq!(label(&[255, 255, 0, 255]), KeyLabel::Unknown);
    }

    #[test]
    fn empty_chunk_is_unknown() {
        assert!(KeyDecoder::new().decode(&[]).is_unknown());
    }

    #[test]
    fn table_size() {
        // 5 control + 12 F-keys + 2 enter + delete + esc + space
        // + 10 digits + comma + period + resize sentinel.
        assert_eq!(KeyDecoder::new().len(), 35);
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn appending_bytes_to_a_known_key_never_matches_it(
                extra in proptest::collection::vec(any::<u8>(), 1..4)
            ) {
                let decoder = KeyDecoder::new();
                let mut chunk = b"\x1b[A".to_vec();
                chunk.extend_from_slice(&extra);
                prop_assert_ne!(decoder.decode(&chunk).label(), KeyLabel::ArrowUp);
            }

            #[test]
            fn decode_agrees_with_lookup(chunk in proptest::collection::vec(any::<u8>(), 0..6)) {
                let decoder = KeyDecoder::new();
                match decoder.lookup(&chunk) {
                    Some(ev) => prop_assert_eq!(&decoder.decode(&chunk), ev),
                    None => prop_assert!(decoder.decode(&chunk).is_unknown()),
                }
            }
        }
    }
}
