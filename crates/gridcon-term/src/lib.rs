// SPDX-License-Identifier: MIT
//
// gridcon-term — a double-buffered cell console for ANSI terminals.
//
// Callers draw glyphs and 24-bit colors into an in-memory grid; a flush
// diffs that grid against what the terminal last received and sends only
// the changed cells, as one write per frame. Keyboard input comes back as
// decoded keys from raw terminal bytes.
//
// Layers, bottom up:
//
//   utf8, width       glyph codec and column classification
//   color, cell, grid the drawing model
//   ansi, key         escape sequences out, key sequences in
//   terminal, output  the device seam and frame buffering
//   console           the double-buffered renderer tying it together
//
// There is no TUI framework underneath: the terminal is driven directly
// with escape sequences and raw termios.

pub mod ansi;
pub mod cell;
pub mod color;
pub mod config;
pub mod console;
pub mod error;
pub mod grid;
pub mod key;
pub mod output;
pub mod terminal;
pub mod utf8;
pub mod width;

pub use cell::{Cell, Flags};
pub use color::Color;
pub use config::ConsoleConfig;
pub use console::{Console, FlushStats};
pub use error::{Error, Result};
pub use key::Key;
pub use terminal::Terminal;
