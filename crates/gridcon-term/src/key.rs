// SPDX-License-Identifier: MIT
//
// Input key decoder.
//
// Turns the front of a raw input chunk into one logical key and tells the
// caller how many bytes it used. Only the legacy xterm/VT sequences the
// console needs are recognized:
//
// - CSI / SS3 arrows, Home, End and F1-F4 (`ESC [ X` or `ESC O X`)
// - `ESC [ 3 ~` Delete, `ESC [ 5 ~` / `ESC [ 6 ~` PageUp / PageDown
// - `ESC [ 1 5 ~`, `ESC [ 1 7 ~` .. `ESC [ 1 9 ~` for F5-F8 (an optional `;`
//   between the `1` and the digit is tolerated)
//
// Everything else in the 7-bit range is handed through as `Key::Byte`,
// including a lone ESC. Bytes with the high bit set are not assembled into
// characters here; they decode to `Key::Unknown` one byte at a time.
//
// Decoding is stateless. A sequence split across two reads decodes as
// whatever its first half looks like; at the read timeouts the console uses
// that does not happen in practice.

use std::fmt;

const ESC: u8 = 0x1B;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F8.
    F(u8),
    Enter,
    Backspace,
    Delete,
    /// A recognized introducer followed by something we don't know.
    Unknown,
    /// Any other 7-bit byte, passed through verbatim (letters, control codes,
    /// a bare ESC).
    Byte(u8),
}

impl Key {
    /// Human-readable name, for logs and the demo.
    #[must_use]
    pub fn name(self) -> String {
        self.to_string()
    }

    /// The passed-through byte, if this is [`Key::Byte`].
    #[inline]
    #[must_use]
    pub const fn byte(self) -> Option<u8> {
        match self {
            Self::Byte(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this is the control byte for `letter` (`Ctrl-C` is `0x03`).
    #[inline]
    #[must_use]
    pub const fn is_ctrl(self, letter: u8) -> bool {
        matches!(self, Self::Byte(b) if b == (letter.to_ascii_lowercase() & 0x1F))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Enter => f.write_str("Enter"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Delete => f.write_str("Delete"),
            Self::Unknown => f.write_str("Unknown"),
            Self::Byte(ESC) => f.write_str("Esc"),
            Self::Byte(b @ 0x00..=0x1F) => write!(f, "Ctrl-{}", char::from(b | 0x40)),
            Self::Byte(b @ 0x20..=0x7E) => write!(f, "'{}'", char::from(b)),
            Self::Byte(b) => write!(f, "0x{b:02X}"),
        }
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// One decoded key and the number of input bytes it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub key: Key,
    /// Always at least 1.
    pub len: usize,
}

impl Decoded {
    #[inline]
    const fn new(key: Key, len: usize) -> Self {
        Self { key, len }
    }
}

/// Decode the key at the front of `chunk`.
///
/// Returns `None` only for an empty chunk. Otherwise at least one byte is
/// consumed, so a caller looping on the remainder always makes progress.
///
/// ```
/// use gridcon_term::key::{translate_key, Key};
///
/// let d = translate_key(b"\x1b[A").unwrap();
/// assert_eq!((d.key, d.len), (Key::Up, 3));
/// ```
#[must_use]
pub fn translate_key(chunk: &[u8]) -> Option<Decoded> {
    let &first = chunk.first()?;
    let decoded = match first {
        0x80..=0xFF => Decoded::new(Key::Unknown, 1),
        b'\r' if chunk.get(1) == Some(&b'\n') => Decoded::new(Key::Enter, 2),
        b'\r' | b'\n' => Decoded::new(Key::Enter, 1),
        0x7F => Decoded::new(Key::Backspace, 1),
        0x7E => Decoded::new(Key::Delete, 1),
        ESC => decode_escape(chunk),
        b => Decoded::new(Key::Byte(b), 1),
    };
    Some(decoded)
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn decode_escape(chunk: &[u8]) -> Decoded {
    debug_assert_eq!(chunk[0], ESC);

    match chunk.get(1) {
        Some(b'[' | b'O') => {}
        _ => return Decoded::new(Key::Byte(ESC), 1),
    }
    let Some(&c3) = chunk.get(2) else {
        return Decoded::new(Key::Unknown, 2);
    };

    let key = match c3 {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'P' => Key::F(1),
        b'Q' => Key::F(2),
        b'R' => Key::F(3),
        b'S' => Key::F(4),
        b'3' => {
            let len = if chunk.get(3) == Some(&b'~') { 4 } else { 3 };
            return Decoded::new(Key::Delete, len);
        }
        b'5' | b'6' => {
            let key = if c3 == b'5' { Key::PageUp } else { Key::PageDown };
            return Decoded::new(key, chunk.len().min(4));
        }
        b'1' => return decode_high_function(chunk),
        _ => Key::Unknown,
    };
    Decoded::new(key, 3)
}

/// `ESC [ 1 [;] d ~` with `d` in `5 7 8 9` → F5..F8.
fn decode_high_function(chunk: &[u8]) -> Decoded {
    let mut pos = 3;
    if chunk.get(pos) == Some(&b';') {
        pos += 1;
    }
    let Some(&digit) = chunk.get(pos) else {
        return Decoded::new(Key::Unknown, pos);
    };
    if chunk.get(pos + 1) != Some(&b'~') {
        return Decoded::new(Key::Unknown, pos + 1);
    }

    let key = match digit {
        b'5' => Key::F(5),
        b'7' => Key::F(6),
        b'8' => Key::F(7),
        b'9' => Key::F(8),
        _ => Key::Unknown,
    };
    Decoded::new(key, pos + 2)
}

// ─── Iteration ───────────────────────────────────────────────────────────────

/// Iterator over every key in a chunk, front to back.
#[derive(Debug, Clone)]
pub struct KeyIter<'a> {
    rest: &'a [u8],
}

impl<'a> KeyIter<'a> {
    /// The bytes not yet decoded.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for KeyIter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let decoded = translate_key(self.rest)?;
        self.rest = &self.rest[decoded.len.min(self.rest.len())..];
        Some(decoded.key)
    }
}

/// Decode every key in `chunk`.
#[inline]
#[must_use]
pub const fn keys(chunk: &[u8]) -> KeyIter<'_> {
    KeyIter { rest: chunk }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn one(data: &[u8]) -> (Key, usize) {
        let d = translate_key(data).expect("non-empty input");
        (d.key, d.len)
    }

    // ── Plain bytes ─────────────────────────────────────────────────────

    #[test]
    fn empty_chunk_is_none() {
        assert_eq!(translate_key(b""), None);
    }

    #[test]
    fn letter_passes_through() {
        assert_eq!(one(b"A"), (Key::Byte(65), 1));
    }

    #[test]
    fn only_first_byte_consumed() {
        assert_eq!(one(b"ab"), (Key::Byte(b'a'), 1));
    }

    #[test]
    fn control_byte_passes_through() {
        assert_eq!(one(b"\x03"), (Key::Byte(3), 1));
        assert!(Key::Byte(3).is_ctrl(b'c'));
        assert!(Key::Byte(3).is_ctrl(b'C'));
        assert!(!Key::Byte(b'c').is_ctrl(b'c'));
    }

    #[test]
    fn high_bytes_are_unknown() {
        assert_eq!(one(&[0xC3, 0xA9]), (Key::Unknown, 1));
        assert_eq!(one(&[0xFF]), (Key::Unknown, 1));
    }

    // ── Enter / editing ─────────────────────────────────────────────────

    #[test]
    fn crlf_is_one_enter() {
        assert_eq!(one(&[0x0D, 0x0A]), (Key::Enter, 2));
    }

    #[test]
    fn lone_cr_and_lf() {
        assert_eq!(one(b"\r"), (Key::Enter, 1));
        assert_eq!(one(b"\n"), (Key::Enter, 1));
        assert_eq!(one(b"\rx"), (Key::Enter, 1));
    }

    #[test]
    fn lf_cr_is_two_enters() {
        let all: Vec<Key> = keys(b"\n\r").collect();
        assert_eq!(all, vec![Key::Enter, Key::Enter]);
    }

    #[test]
    fn del_byte_is_backspace() {
        assert_eq!(one(&[0x7F]), (Key::Backspace, 1));
    }

    #[test]
    fn tilde_is_delete() {
        assert_eq!(one(b"~"), (Key::Delete, 1));
    }

    // ── Escape ──────────────────────────────────────────────────────────

    #[test]
    fn lone_escape_is_byte() {
        assert_eq!(one(&[0x1B]), (Key::Byte(0x1B), 1));
    }

    #[test]
    fn escape_then_letter_is_byte() {
        assert_eq!(one(b"\x1bx"), (Key::Byte(0x1B), 1));
    }

    #[test]
    fn truncated_introducer_is_unknown() {
        assert_eq!(one(b"\x1b["), (Key::Unknown, 2));
        assert_eq!(one(b"\x1bO"), (Key::Unknown, 2));
    }

    #[test]
    fn unrecognized_final_is_unknown() {
        assert_eq!(one(b"\x1b[Z"), (Key::Unknown, 3));
    }

    // ── Navigation ──────────────────────────────────────────────────────

    #[test]
    fn arrows_csi() {
        assert_eq!(one(&[0x1B, 0x5B, 0x41]), (Key::Up, 3));
        assert_eq!(one(b"\x1b[B"), (Key::Down, 3));
        assert_eq!(one(b"\x1b[C"), (Key::Right, 3));
        assert_eq!(one(b"\x1b[D"), (Key::Left, 3));
    }

    #[test]
    fn arrows_ss3() {
        assert_eq!(one(b"\x1bOA"), (Key::Up, 3));
        assert_eq!(one(b"\x1bOD"), (Key::Left, 3));
    }

    #[test]
    fn home_end() {
        assert_eq!(one(b"\x1b[H"), (Key::Home, 3));
        assert_eq!(one(b"\x1bOF"), (Key::End, 3));
    }

    #[test]
    fn delete_with_tilde() {
        assert_eq!(one(&[0x1B, 0x5B, 0x33, 0x7E]), (Key::Delete, 4));
    }

    #[test]
    fn delete_without_tilde() {
        assert_eq!(one(b"\x1b[3"), (Key::Delete, 3));
        assert_eq!(one(b"\x1b[3x"), (Key::Delete, 3));
    }

    #[test]
    fn page_keys() {
        assert_eq!(one(b"\x1b[5~"), (Key::PageUp, 4));
        assert_eq!(one(b"\x1b[6~"), (Key::PageDown, 4));
    }

    #[test]
    fn truncated_page_key() {
        assert_eq!(one(b"\x1b[5"), (Key::PageUp, 3));
    }

    // ── Function keys ───────────────────────────────────────────────────

    #[test]
    fn f1_to_f4() {
        assert_eq!(one(b"\x1bOP"), (Key::F(1), 3));
        assert_eq!(one(b"\x1bOQ"), (Key::F(2), 3));
        assert_eq!(one(b"\x1b[R"), (Key::F(3), 3));
        assert_eq!(one(b"\x1b[S"), (Key::F(4), 3));
    }

    #[test]
    fn f5_with_semicolon() {
        assert_eq!(one(&[0x1B, 0x5B, 0x31, 0x3B, 0x35, 0x7E]), (Key::F(5), 6));
    }

    #[test]
    fn f5_to_f8_xterm() {
        assert_eq!(one(b"\x1b[15~"), (Key::F(5), 5));
        assert_eq!(one(b"\x1b[17~"), (Key::F(6), 5));
        assert_eq!(one(b"\x1b[18~"), (Key::F(7), 5));
        assert_eq!(one(b"\x1b[19~"), (Key::F(8), 5));
    }

    #[test]
    fn unmapped_digit_is_unknown() {
        assert_eq!(one(b"\x1b[16~"), (Key::Unknown, 5));
    }

    #[test]
    fn malformed_high_function_is_unknown() {
        assert_eq!(one(b"\x1b[1"), (Key::Unknown, 3));
        assert_eq!(one(b"\x1b[15"), (Key::Unknown, 4));
        assert_eq!(one(b"\x1b[15x"), (Key::Unknown, 4));
    }

    // ── Iteration ───────────────────────────────────────────────────────

    #[test]
    fn keys_splits_chunk() {
        let all: Vec<Key> = keys(b"a\x1b[A\r\n\x1b[3~q").collect();
        assert_eq!(
            all,
            vec![
                Key::Byte(b'a'),
                Key::Up,
                Key::Enter,
                Key::Delete,
                Key::Byte(b'q')
            ]
        );
    }

    #[test]
    fn key_iter_tracks_remaining() {
        let mut it = keys(b"\x1b[Ax");
        assert_eq!(it.next(), Some(Key::Up));
        assert_eq!(it.remaining(), b"x");
    }

    // ── Names ───────────────────────────────────────────────────────────

    #[test]
    fn names() {
        assert_eq!(Key::Up.name(), "Up");
        assert_eq!(Key::F(7).name(), "F7");
        assert_eq!(Key::Byte(b'q').name(), "'q'");
        assert_eq!(Key::Byte(0x03).name(), "Ctrl-C");
        assert_eq!(Key::Byte(0x1B).name(), "Esc");
    }

    // ── Properties ──────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn always_makes_progress(data in proptest::collection::vec(any::<u8>(), 1..32)) {
            let d = translate_key(&data).unwrap();
            prop_assert!(d.len >= 1);
            prop_assert!(d.len <= data.len());
        }
    }
}
