// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; the console's flush loop owns that. This
// module only knows the byte-level encoding of the fixed xterm subset the
// console speaks.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

use crate::color::Color;

// ─── Alternate Screen ────────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
///
/// The alternate screen preserves the user's shell content; leaving it with
/// [`exit`] brings that content back.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen and make the cursor visible again.
///
/// This is the full teardown sequence: after it the terminal looks the way
/// it did before [`enter_alt_screen`].
#[inline]
pub fn exit(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l\x1b[?25h")
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// Set the foreground color: SGR 39 for default, 24-bit `TrueColor` otherwise.
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    match color {
        Color::Default => w.write_all(b"\x1b[39m"),
        Color::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

/// Set the background color: SGR 49 for default, 24-bit `TrueColor` otherwise.
pub fn bg(w: &mut impl Write, color: Color) -> io::Result<()> {
    match color {
        Color::Default => w.write_all(b"\x1b[49m"),
        Color::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

/// Set both colors. The foreground sequence always comes first.
#[inline]
pub fn set_color(w: &mut impl Write, fg_color: Color, bg_color: Color) -> io::Result<()> {
    fg(w, fg_color)?;
    bg(w, bg_color)
}

/// Set both colors from the packed 32-bit form (`12345` foreground and `0`
/// background mean default).
#[inline]
pub fn set_color_packed(w: &mut impl Write, fg_packed: u32, bg_packed: u32) -> io::Result<()> {
    set_color(
        w,
        Color::from_packed_fg(fg_packed),
        Color::from_packed_bg(bg_packed),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
