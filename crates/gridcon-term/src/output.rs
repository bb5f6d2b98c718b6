// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// A flush can produce hundreds of tiny sequences (a position, two colors and
// a glyph per changed cell). They all land in an `OutputBuffer` first and
// reach the terminal as one `write`, so the device sees a whole frame at a
// time instead of a trickle of fragments it might render half-way through.

use std::io::{self, Write};

use crate::error::Result;
use crate::terminal::Terminal;
use crate::utf8;

const DEFAULT_CAPACITY: usize = 16_384;

/// A byte buffer that accumulates one frame of terminal output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append one glyph as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        utf8::encode_into(u32::from(ch), &mut self.buf);
    }

    /// Append a single raw byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Hand the accumulated bytes to `term` in one write, flush it, and clear
    /// the buffer. Nothing is written when the buffer is empty, but the
    /// terminal is still flushed. Returns the number of bytes sent.
    ///
    /// # Errors
    ///
    /// Propagates the terminal's write or flush error. The buffer is left
    /// untouched on a failed write.
    pub fn flush_to<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<usize> {
        let sent = self.buf.len();
        if sent > 0 {
            term.write(&self.buf)?;
            self.buf.clear();
        }
        term.flush()?;
        Ok(sent)
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
