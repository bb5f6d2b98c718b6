// SPDX-License-Identifier: MIT
//
// Wide-glyph classification.
//
// The renderer needs one bit per glyph: does it take one column or two? The
// default answer comes from a short hand-maintained list of emoji that the
// consoles we target actually draw double-width. The `Unicode` policy asks
// `unicode-width` instead, which is right for CJK text but disagrees with a
// number of terminals on emoji presentation.

use unicode_width::UnicodeWidthChar;

/// Codepoints drawn two columns wide under [`WidthPolicy::Allowlist`].
pub const WIDE_ALLOWLIST: [u32; 7] = [
    0x1FA78, // 🩸
    0x1F463, // 👣
    0x1F311, // 🌑
    0x1F3F9, // 🏹
    0x1F4B0, // 💰
    0x1F480, // 💀
    0x274C,  // ❌
];

/// How to decide whether a glyph occupies two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum WidthPolicy {
    /// Wide only if listed in [`WIDE_ALLOWLIST`].
    #[default]
    Allowlist,
    /// Wide if `unicode-width` reports two columns.
    Unicode,
}

impl WidthPolicy {
    /// Whether `ch` takes two columns under this policy.
    #[must_use]
    pub fn is_wide(self, ch: char) -> bool {
        match self {
            Self::Allowlist => WIDE_ALLOWLIST.contains(&u32::from(ch)),
            Self::Unicode => ch.width() == Some(2),
        }
    }

    /// Column count for `ch`: 1 or 2.
    #[inline]
    #[must_use]
    pub fn columns(self, ch: char) -> u16 {
        if self.is_wide(ch) { 2 } else { 1 }
    }

    /// Parse a policy name: `allowlist` or `unicode`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "allowlist" | "list" => Some(Self::Allowlist),
            "unicode" => Some(Self::Unicode),
            _ => None,
        }
    }

    /// The canonical name, the inverse of [`WidthPolicy::parse`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Allowlist => "allowlist",
            Self::Unicode => "unicode",
        }
    }
}
