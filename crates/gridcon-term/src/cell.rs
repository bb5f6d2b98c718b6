// SPDX-License-Identifier: MIT
//
// Cell — one character position on the grid.
//
// A cell holds a Unicode scalar, foreground and background colors, and a
// small flag word. Equality is field-wise; the flush diff compares cells
// with `==` and nothing else, so anything that affects what a terminal
// shows must live in one of these four fields.
//
// Wide glyphs are not marked in the cell. The renderer decides width when
// it emits a glyph and silently accepts whatever sits in the column to its
// right, so a wide character never needs a special continuation value.

use crate::color::Color;

// ─── Flags ───────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Per-cell rendering flags.
    ///
    /// ```
    /// use gridcon_term::cell::Flags;
    ///
    /// let f = Flags::REVERSE;
    /// assert!(f.contains(Flags::REVERSE));
    /// assert!(!Flags::empty().contains(Flags::REVERSE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Flags: u16 {
        /// Swap foreground and background when rendering.
        const REVERSE = 1 << 0;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The glyph to display. Space when blank.
    pub ch: char,
    /// Foreground (text) color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Rendering flags.
    pub flags: Flags,
}

impl Cell {
    /// A blank cell: space, default colors, no flags.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: Color::Default,
        bg: Color::Default,
        flags: Flags::empty(),
    };

    /// A cell holding `ch` with default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// A fully specified cell.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: Color, bg: Color, flags: Flags) -> Self {
        Self { ch, fg, bg, flags }
    }

    /// Blank cell painted with the given colors.
    #[inline]
    #[must_use]
    pub const fn blank(fg: Color, bg: Color) -> Self {
        Self { ch: ' ', fg, bg, flags: Flags::empty() }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this cell is indistinguishable from [`Cell::EMPTY`].
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Whether the reverse flag is set.
    #[inline]
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        self.flags.contains(Flags::REVERSE)
    }

    /// The `(fg, bg)` pair actually sent to the terminal: swapped when the
    /// reverse flag is set.
    #[inline]
    #[must_use]
    pub const fn render_colors(self) -> (Color, Color) {
        if self.is_reversed() {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        }
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Replace the glyph.
    #[inline]
    #[must_use]
    pub const fn with_char(self, ch: char) -> Self {
        Self { ch, ..self }
    }

    /// Replace the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    /// Replace the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    /// Replace the flags.
    #[inline]
    #[must_use]
    pub const fn with_flags(self, flags: Flags) -> Self {
        Self { flags, ..self }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if !self.fg.is_default() {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.flags.is_empty() {
            write!(f, ", {:?}", self.flags)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
