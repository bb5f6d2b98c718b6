// SPDX-License-Identifier: MIT
//
// Cell colors.
//
// A color is either the terminal's own default or a 24-bit RGB triple. The
// tag keeps "default" out of the RGB number space: pure black is
// `Rgb(0, 0, 0)`, never confused with "use the terminal's background".
//
// Older callers hand colors around as packed 32-bit words (top 24 bits RGB,
// low 8 bits a reserved palette slot) with two magic sentinels: a foreground
// of 12345 and a background of 0 both mean "default". The `from_packed_*`
// constructors translate that form at the boundary so nothing past it has to
// know about the sentinels.
#![allow(clippy::many_single_char_names)]

use std::fmt;

/// Packed-foreground sentinel meaning "terminal default foreground".
pub const PACKED_DEFAULT_FG: u32 = 12345;

/// Packed-background sentinel meaning "terminal default background".
pub const PACKED_DEFAULT_BG: u32 = 0;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A cell color: terminal default, or 24-bit `TrueColor`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Whatever the terminal is configured to use.
    #[default]
    Default,
    /// 24-bit RGB.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::Rgb(0xFF, 0xFF, 0xFF);
    /// Pure black (a real color, distinct from [`Color::Default`]).
    pub const BLACK: Self = Self::Rgb(0, 0, 0);

    /// Build from a packed word, ignoring sentinels: top three bytes are
    /// R, G, B; the low byte is discarded.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_packed_rgb(v: u32) -> Self {
        Self::Rgb((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8)
    }

    /// Translate a packed foreground word; `12345` means default.
    #[inline]
    #[must_use]
    pub const fn from_packed_fg(v: u32) -> Self {
        if v == PACKED_DEFAULT_FG {
            Self::Default
        } else {
            Self::from_packed_rgb(v)
        }
    }

    /// Translate a packed background word; `0` means default.
    #[inline]
    #[must_use]
    pub const fn from_packed_bg(v: u32) -> Self {
        if v == PACKED_DEFAULT_BG {
            Self::Default
        } else {
            Self::from_packed_rgb(v)
        }
    }

    /// The packed form of this color. [`Color::Default`] packs to `0`.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::Rgb(r, g, b) => (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8,
        }
    }

    /// The RGB triple, or `None` for the terminal default.
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Default => None,
            Self::Rgb(r, g, b) => Some((r, g, b)),
        }
    }

    /// Whether this is the terminal default.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Parse `default`, `#rrggbb`, `rrggbb` or `#rgb`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("default") {
            return Some(Self::Default);
        }
        parse_hex(s)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    match bytes.len() {
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Color::Rgb(r << 4 | r, g << 4 | g, b << 4 | b))
        }
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
