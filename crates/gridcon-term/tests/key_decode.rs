// SPDX-License-Identifier: MIT
//
// Keys from raw bytes, both directly and through a console's read path.

use gridcon_term::console::Console;
use gridcon_term::error::Error;
use gridcon_term::key::{Key, keys, translate_key};
use gridcon_term::terminal::MemoryTerminal;
use pretty_assertions::assert_eq;

fn decode(bytes: &[u8]) -> (Key, usize) {
    let d = translate_key(bytes).unwrap();
    (d.key, d.len)
}

// ── Sequences ───────────────────────────────────────────────────────────

#[test]
fn csi_and_ss3_arrows() {
    for intro in [b'[', b'O'] {
        assert_eq!(decode(&[0x1B, intro, b'A']), (Key::Up, 3));
        assert_eq!(decode(&[0x1B, intro, b'B']), (Key::Down, 3));
        assert_eq!(decode(&[0x1B, intro, b'C']), (Key::Right, 3));
        assert_eq!(decode(&[0x1B, intro, b'D']), (Key::Left, 3));
    }
}

#[test]
fn navigation_keys() {
    assert_eq!(decode(b"\x1b[H"), (Key::Home, 3));
    assert_eq!(decode(b"\x1b[F"), (Key::End, 3));
    assert_eq!(decode(b"\x1b[3~"), (Key::Delete, 4));
    assert_eq!(decode(b"\x1b[5~"), (Key::PageUp, 4));
    assert_eq!(decode(b"\x1b[6~"), (Key::PageDown, 4));
}

#[test]
fn function_keys() {
    assert_eq!(decode(b"\x1bOP"), (Key::F(1), 3));
    assert_eq!(decode(b"\x1bOS"), (Key::F(4), 3));
    assert_eq!(decode(b"\x1b[15~"), (Key::F(5), 5));
    assert_eq!(decode(b"\x1b[17~"), (Key::F(6), 5));
    assert_eq!(decode(b"\x1b[18~"), (Key::F(7), 5));
    assert_eq!(decode(b"\x1b[19~"), (Key::F(8), 5));
    assert_eq!(decode(b"\x1b[1;9~"), (Key::F(8), 6));
}

#[test]
fn plain_bytes() {
    assert_eq!(decode(b"\r"), (Key::Enter, 1));
    assert_eq!(decode(b"\r\n"), (Key::Enter, 2));
    assert_eq!(decode(b"\x7f"), (Key::Backspace, 1));
    assert_eq!(decode(b"q"), (Key::Byte(b'q'), 1));
    assert_eq!(decode(b"\x03"), (Key::Byte(3), 1));
    assert_eq!(decode(b"\x1b"), (Key::Byte(0x1B), 1));
    assert_eq!(decode(&[0xC3, 0xA9]), (Key::Unknown, 1));
}

#[test]
fn unknown_sequences_still_advance() {
    assert_eq!(decode(b"\x1b[Z"), (Key::Unknown, 3));
    assert_eq!(decode(b"\x1b["), (Key::Unknown, 2));
    assert_eq!(decode(b"\x1b[16~"), (Key::Unknown, 5));
}

#[test]
fn empty_input_is_none() {
    assert!(translate_key(b"").is_none());
}

#[test]
fn pasted_chunk_splits_into_keys() {
    let got: Vec<Key> = keys(b"hi\x1b[B\r\x1b[18~").collect();
    assert_eq!(
        got,
        vec![
            Key::Byte(b'h'),
            Key::Byte(b'i'),
            Key::Down,
            Key::Enter,
            Key::F(7),
        ]
    );
}

#[test]
fn names_for_display() {
    assert_eq!(Key::Byte(3).name(), "Ctrl-C");
    assert_eq!(Key::Byte(0x1B).name(), "Esc");
    assert_eq!(Key::Byte(b'q').name(), "'q'");
    assert_eq!(Key::F(7).name(), "F7");
    assert!(Key::Byte(3).is_ctrl(b'c'));
}

// ── Through the console ─────────────────────────────────────────────────

#[test]
fn console_reads_queued_keys_in_order() {
    let term = MemoryTerminal::new(10, 2).with_input([b"\x1b[Aq".to_vec(), b"\x1b[6~".to_vec()]);
    let mut con = Console::new(term).unwrap();

    assert_eq!(con.read_key().unwrap(), Some(Key::Up));
    assert_eq!(con.read_key().unwrap(), Some(Key::Byte(b'q')));
    assert_eq!(con.read_key().unwrap(), Some(Key::PageDown));
    assert_eq!(con.read_key().unwrap(), None);
    assert_eq!(con.terminal().read_calls(), 3);
}

#[test]
fn console_read_timeout_is_none() {
    let mut con = Console::new(MemoryTerminal::new(10, 2)).unwrap();
    assert_eq!(con.read_key().unwrap(), None);
    assert!(!con.has_pending_input());
}

#[test]
fn console_read_failure_propagates() {
    let mut con = Console::new(MemoryTerminal::new(10, 2)).unwrap();
    con.terminal_mut().fail_reads(true);
    assert!(matches!(con.read_key(), Err(Error::Io(_))));
    assert!(!con.has_pending_input());
}
