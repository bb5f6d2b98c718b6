// SPDX-License-Identifier: MIT
//
// UTF-8 codec — DFA decoder and range-selected encoder.
//
// The decoder is Bjoern Hoehrmann's table-driven automaton
// (http://bjoern.hoehrmann.de/utf-8/decoder/dfa/): every byte maps to one of
// twelve classes, and (state, class) indexes a transition table. A scalar is
// produced each time the automaton returns to ACCEPT. Overlongs, surrogates
// and values above U+10FFFF all land in REJECT, so whatever the automaton
// accepts is a valid `char`.
//
// Malformed input never surfaces as an error. The decoder drops the faulty
// bytes and carries on:
//
//   - A lead byte that can never start a valid sequence (C0, C1, F5–F7)
//     swallows the number of bytes its bit pattern announces, whatever they
//     are. F8–FF and stray continuation bytes are dropped alone.
//   - A sequence that started well but meets a non-continuation byte is
//     truncated: the partial sequence is dropped and the byte is decoded
//     afresh.
//   - A sequence that meets a disallowed continuation byte (overlong,
//     surrogate, beyond U+10FFFF) is dropped together with the rest of its
//     continuation bytes.
//   - A partial sequence at end of input produces nothing.
//
// `decode_lossy` is the explicit alternative: one U+FFFD per rejected
// sequence instead of silence.

// ─── DFA Tables ──────────────────────────────────────────────────────────────

const ACCEPT: u8 = 0;
const REJECT: u8 = 1;

/// Class of a byte that can never appear in well-formed UTF-8.
const CLASS_INVALID: u8 = 8;

/// Map a byte value to its DFA character class.
const fn byte_class(byte: u8) -> u8 {
    match byte {
        0x00..=0x7F => 0,
        0x80..=0x8F => 1,
        0x90..=0x9F => 9,
        0xA0..=0xBF => 7,
        0xC2..=0xDF => 2,
        0xE0 => 10,
        0xE1..=0xEC | 0xEE..=0xEF => 3,
        0xED => 4,
        0xF0 => 11,
        0xF1..=0xF3 => 6,
        0xF4 => 5,
        // C0, C1, F5..FF
        _ => CLASS_INVALID,
    }
}

/// Byte → class lookup, built at compile time from [`byte_class`].
static CLASSES: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let byte = i as u8;
        table[i] = byte_class(byte);
        i += 1;
    }
    table
};

/// State × class → next state. Nine states, sixteen class columns.
#[rustfmt::skip]
static TRANSITIONS: [u8; 144] = [
    0, 1, 2, 3, 5, 8, 7, 1, 1, 1, 4, 6, 1, 1, 1, 1, // s0 (accept)
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // s1 (reject)
    1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, // s2 (one more)
    1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, // s3 (two more)
    1, 1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, // s4 (after E0)
    1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, // s5 (after ED)
    1, 1, 1, 1, 1, 1, 1, 3, 1, 3, 1, 1, 1, 1, 1, 1, // s6 (after F0)
    1, 3, 1, 1, 1, 1, 1, 3, 1, 3, 1, 1, 1, 1, 1, 1, // s7 (after F1..F3)
    1, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // s8 (after F4)
];

/// Total sequence length a lead byte announces by its high bits.
const fn announced_len(byte: u8) -> u8 {
    match byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[inline]
const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Outcome of feeding one byte to the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A complete scalar value.
    Emit(char),
    /// Mid-sequence, nothing to report yet.
    Pending,
    /// Byte discarded as part of an already-rejected sequence.
    Skipped,
    /// The current sequence was rejected.
    Rejected,
    /// The current sequence was truncated by this byte, which must be fed
    /// again from a fresh state.
    Retry,
}

/// Incremental UTF-8 decoder.
///
/// Holds the DFA state between bytes, so input may arrive in arbitrary
/// chunks. Never fails: faulty bytes are dropped and the decoder resumes
/// on its own. [`reset`](Self::reset) discards a pending partial sequence.
///
/// ```
/// use gridcon_term::utf8::Utf8Decoder;
///
/// let mut dec = Utf8Decoder::new();
/// assert_eq!(dec.push(0xE2), None);
/// assert_eq!(dec.push(0x82), None);
/// assert_eq!(dec.push(0xAC), Some('€'));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    state: u8,
    codepoint: u32,
    /// Length announced by the current sequence's lead byte.
    announced: u8,
    /// Bytes of the current sequence seen so far.
    seen: u8,
    /// Bytes to drop unconditionally (tail of an invalid lead).
    swallow: u8,
    /// Continuation bytes to drop (tail of a rejected sequence).
    drain: u8,
}

impl Utf8Decoder {
    /// A decoder in its initial state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ACCEPT,
            codepoint: 0,
            announced: 0,
            seen: 0,
            swallow: 0,
            drain: 0,
        }
    }

    /// Whether a multi-byte sequence is partially decoded (or being skipped).
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.state != ACCEPT || self.swallow > 0 || self.drain > 0
    }

    /// Forget any partial sequence.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one byte. Returns the scalar value it completes, if any.
    pub fn push(&mut self, byte: u8) -> Option<char> {
        match self.step(byte) {
            Step::Emit(ch) => Some(ch),
            Step::Retry => match self.step(byte) {
                Step::Emit(ch) => Some(ch),
                _ => None,
            },
            Step::Pending | Step::Skipped | Step::Rejected => None,
        }
    }

    fn step(&mut self, byte: u8) -> Step {
        if self.swallow > 0 {
            self.swallow -= 1;
            return Step::Skipped;
        }
        if self.drain > 0 {
            if is_continuation(byte) {
                self.drain -= 1;
                return Step::Skipped;
            }
            self.drain = 0;
        }

        let class = CLASSES[usize::from(byte)];
        let at_start = self.state == ACCEPT;

        if at_start {
            self.announced = announced_len(byte);
            self.seen = 0;
            self.codepoint = (0xFF_u32 >> class) & u32::from(byte);
        } else {
            self.codepoint = (u32::from(byte) & 0x3F) | (self.codepoint << 6);
        }
        self.seen += 1;
        self.state = TRANSITIONS[usize::from(self.state) * 16 + usize::from(class)];

        match self.state {
            // The automaton only accepts scalar values, so this never drops.
            ACCEPT => char::from_u32(self.codepoint).map_or(Step::Rejected, Step::Emit),
            REJECT => {
                self.state = ACCEPT;
                if at_start {
                    if class == CLASS_INVALID {
                        self.swallow = self.announced - 1;
                    }
                    Step::Rejected
                } else if is_continuation(byte) {
                    self.drain = self.announced.saturating_sub(self.seen);
                    Step::Rejected
                } else {
                    Step::Retry
                }
            }
            _ => Step::Pending,
        }
    }
}

/// Decode a byte stream into scalar values, silently dropping malformed
/// sequences.
///
/// ```
/// use gridcon_term::utf8::decode;
///
/// assert_eq!(decode("añ€😀".as_bytes()), vec!['a', 'ñ', '€', '😀']);
/// assert!(decode(&[0xC0, 0x20]).is_empty());
/// ```
#[must_use]
pub fn decode(bytes: &[u8]) -> Vec<char> {
    let mut dec = Utf8Decoder::new();
    bytes.iter().filter_map(|&b| dec.push(b)).collect()
}

/// Decode a byte stream, emitting U+FFFD for every rejected sequence and
/// for a partial sequence left at end of input.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> Vec<char> {
    let mut dec = Utf8Decoder::new();
    let mut out = Vec::with_capacity(bytes.len());

    for &byte in bytes {
        match dec.step(byte) {
            Step::Emit(ch) => out.push(ch),
            Step::Rejected => out.push(char::REPLACEMENT_CHARACTER),
            Step::Retry => {
                out.push(char::REPLACEMENT_CHARACTER);
                if let Some(ch) = dec.push(byte) {
                    out.push(ch);
                }
            }
            Step::Pending | Step::Skipped => {}
        }
    }

    if dec.state != ACCEPT {
        out.push(char::REPLACEMENT_CHARACTER);
    }
    out
}

// ─── Encoder ─────────────────────────────────────────────────────────────────

/// The UTF-8 encoding of one scalar value: up to four bytes, inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    bytes: [u8; 4],
    len: u8,
}

impl Encoded {
    /// The encoded bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// Number of bytes (1–4).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::ops::Deref for Encoded {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encode a scalar value as UTF-8.
///
/// The width is chosen purely by numeric range (`< 0x80`, `< 0x800`,
/// `< 0x10000`, otherwise four bytes). No surrogate check: callers pass
/// scalar values.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // every byte is masked first
pub const fn encode(cp: u32) -> Encoded {
    if cp < 0x80 {
        Encoded {
            bytes: [cp as u8, 0, 0, 0],
            len: 1,
        }
    } else if cp < 0x800 {
        Encoded {
            bytes: [0xC0 | ((cp >> 6) & 0x1F) as u8, 0x80 | (cp & 0x3F) as u8, 0, 0],
            len: 2,
        }
    } else if cp < 0x1_0000 {
        Encoded {
            bytes: [
                0xE0 | ((cp >> 12) & 0x0F) as u8,
                0x80 | ((cp >> 6) & 0x3F) as u8,
                0x80 | (cp & 0x3F) as u8,
                0,
            ],
            len: 3,
        }
    } else {
        Encoded {
            bytes: [
                0xF0 | ((cp >> 18) & 0x07) as u8,
                0x80 | ((cp >> 12) & 0x3F) as u8,
                0x80 | ((cp >> 6) & 0x3F) as u8,
                0x80 | (cp & 0x3F) as u8,
            ],
            len: 4,
        }
    }
}

/// Append the UTF-8 encoding of `cp` to `out`.
#[inline]
pub fn encode_into(cp: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(encode(cp).as_bytes());
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn cp(ch: char) -> u32 {
        u32::from(ch)
    }

    // ── Encode ──────────────────────────────────────────────────────────

    #[test]
    fn encode_ascii() {
        assert_eq!(encode(0x41).as_bytes(), b"A");
    }

    #[test]
    fn encode_widths_by_range() {
        assert_eq!(encode(0x7F).len(), 1);
        assert_eq!(encode(0x80).len(), 2);
        assert_eq!(encode(0x7FF).len(), 2);
        assert_eq!(encode(0x800).len(), 3);
        assert_eq!(encode(0xFFFF).len(), 3);
        assert_eq!(encode(0x1_0000).len(), 4);
        assert_eq!(encode(0x10_FFFF).len(), 4);
    }

    #[test]
    fn encode_matches_std() {
        for ch in ['é', '中', '€', '😀', '\u{10FFFF}'] {
            let mut buf = [0u8; 4];
            assert_eq!(encode(cp(ch)).as_bytes(), ch.encode_utf8(&mut buf).as_bytes());
        }
    }

    #[test]
    fn encode_into_appends() {
        let mut out = b"x".to_vec();
        encode_into(cp('€'), &mut out);
        assert_eq!(out, "x€".as_bytes());
    }

    // ── Round Trip ──────────────────────────────────────────────────────

    #[test]
    fn round_trip_representative_values() {
        for v in [0x41, 0x7FF, 0xFFFF - 1, 0x1F600] {
            let decoded = decode(&encode(v));
            assert_eq!(decoded.len(), 1, "value {v:#x}");
            assert_eq!(cp(decoded[0]), v);
        }
    }

    proptest! {
        #[test]
        fn round_trip_any_char(ch in any::<char>()) {
            prop_assert_eq!(decode(&encode(cp(ch))), vec![ch]);
        }

        #[test]
        fn decode_agrees_with_std_on_valid_text(s in "\\PC*") {
            prop_assert_eq!(decode(s.as_bytes()), s.chars().collect::<Vec<_>>());
        }

        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode(&bytes);
            let _ = decode_lossy(&bytes);
        }
    }

    // ── Leniency ────────────────────────────────────────────────────────

    #[test]
    fn invalid_lead_swallows_announced_byte() {
        assert!(decode(&[0xC0, 0x20]).is_empty());
    }

    #[test]
    fn valid_sequence_after_fault_decodes() {
        let mut bytes = vec![0xC0, 0x20];
        bytes.extend_from_slice("h€".as_bytes());
        assert_eq!(decode(&bytes), vec!['h', '€']);
    }

    #[test]
    fn stray_continuation_dropped_alone() {
        assert_eq!(decode(&[0x80, b'a', 0xBF, b'b']), vec!['a', 'b']);
    }

    #[test]
    fn truncated_sequence_resyncs_on_next_byte() {
        // E2 82 starts '€' but 'A' interrupts it.
        assert_eq!(decode(&[0xE2, 0x82, b'A']), vec!['A']);
    }

    #[test]
    fn surrogate_dropped_with_its_tail() {
        // ED A0 80 would be U+D800.
        assert_eq!(decode(&[0xED, 0xA0, 0x80, b'z']), vec!['z']);
    }

    #[test]
    fn overlong_three_byte_dropped() {
        assert_eq!(decode(&[0xE0, 0x80, 0xAF, b'q']), vec!['q']);
    }

    #[test]
    fn partial_at_end_yields_nothing() {
        assert_eq!(decode(&[b'o', b'k', 0xF0, 0x9F]), vec!['o', 'k']);
    }

    #[test]
    fn each_call_starts_fresh() {
        assert!(decode(&[0xF0, 0x9F]).is_empty());
        assert_eq!(decode(b"a"), vec!['a']);
    }

    #[test]
    fn high_invalid_byte_dropped_alone() {
        assert_eq!(decode(&[0xFF, b'x']), vec!['x']);
    }

    // ── Incremental ─────────────────────────────────────────────────────

    #[test]
    fn decoder_spans_chunks() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(0xF0), None);
        assert!(dec.is_pending());
        assert_eq!(dec.push(0x9F), None);
        assert_eq!(dec.push(0x98), None);
        assert_eq!(dec.push(0x80), Some('😀'));
        assert!(!dec.is_pending());
    }

    #[test]
    fn decoder_reset_discards_partial() {
        let mut dec = Utf8Decoder::new();
        dec.push(0xE2);
        dec.reset();
        assert!(!dec.is_pending());
        assert_eq!(dec.push(b'a'), Some('a'));
    }

    // ── Lossy ───────────────────────────────────────────────────────────

    #[test]
    fn lossy_marks_each_fault() {
        assert_eq!(
            decode_lossy(&[b'a', 0x80, b'b', 0xE2, 0x82, b'c']),
            vec!['a', '\u{FFFD}', 'b', '\u{FFFD}', 'c']
        );
    }

    #[test]
    fn lossy_marks_partial_tail() {
        assert_eq!(decode_lossy(&[b'a', 0xE2]), vec!['a', '\u{FFFD}']);
    }

    #[test]
    fn lossy_on_valid_input_is_plain_decode() {
        assert_eq!(decode_lossy("héllo".as_bytes()), decode("héllo".as_bytes()));
    }
}
