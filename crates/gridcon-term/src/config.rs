// SPDX-License-Identifier: MIT
//
// Console configuration and `name=value` option parsing.
//
// Options arrive as short strings (from `--set` arguments or a
// comma-separated environment variable) and are parsed into directives
// before being applied, so a typo is reported with the offending text
// instead of being half-applied.
//
// | Syntax        | Effect                                   |
// |---------------|------------------------------------------|
// | `fg=c0c0c0`   | paint foreground (`rrggbb`, `#rgb`, `default`) |
// | `bg=default`  | paint background                         |
// | `wide=unicode`| width policy (`allowlist` or `unicode`)  |
// | `cursor`      | leave the hardware cursor visible        |
// | `nocursor`    | hide it (the default)                    |

use crate::color::Color;
use crate::error::{Error, Result};
use crate::width::WidthPolicy;

// ─── Directive ───────────────────────────────────────────────────────────────

/// One parsed option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `name`: enable a boolean option.
    On(String),
    /// `noname`: disable a boolean option.
    Off(String),
    /// `name=value`: assign a value.
    Assign(String, String),
}

/// Whether `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "cursor")
}

/// Parse a single option.
#[must_use]
pub fn parse_option(arg: &str) -> Directive {
    let arg = arg.trim();

    if let Some((name, value)) = arg.split_once('=') {
        return Directive::Assign(name.trim().to_string(), value.trim().to_string());
    }

    // Only strip "no" when what's left is a real boolean option.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return Directive::Off(name.to_string());
        }
    }

    Directive::On(arg.to_string())
}

/// Parse a comma- or whitespace-separated option list. Empty entries are
/// skipped.
#[must_use]
pub fn parse_options(list: &str) -> Vec<Directive> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_option)
        .collect()
}

// ─── ConsoleConfig ───────────────────────────────────────────────────────────

/// Initial paint colors and rendering choices for a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Paint foreground at startup.
    pub fg: Color,
    /// Paint background at startup.
    pub bg: Color,
    /// How wide glyphs are recognized during flush.
    pub width_policy: WidthPolicy,
    /// Hide the hardware cursor while the console is open.
    pub hide_cursor: bool,
}

impl ConsoleConfig {
    /// Light grey on the terminal's own background.
    pub const DEFAULT_FG: Color = Color::Rgb(0xC0, 0xC0, 0xC0);

    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] for an unknown name or an unparseable value.
    pub fn apply(&mut self, directive: &Directive) -> Result<()> {
        match directive {
            Directive::On(name) if name == "cursor" => self.hide_cursor = false,
            Directive::Off(name) if name == "cursor" => self.hide_cursor = true,
            Directive::Assign(name, value) => match name.as_str() {
                "fg" => self.fg = parse_color(value)?,
                "bg" => self.bg = parse_color(value)?,
                "wide" => {
                    self.width_policy = WidthPolicy::parse(value)
                        .ok_or_else(|| Error::InvalidOption(format!("wide={value}")))?;
                }
                _ => return Err(Error::InvalidOption(format!("{name}={value}"))),
            },
            Directive::On(name) | Directive::Off(name) => {
                return Err(Error::InvalidOption(name.clone()));
            }
        }
        Ok(())
    }

    /// Parse and apply every option in `list`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] naming the first bad option.
    pub fn apply_all(&mut self, list: &str) -> Result<()> {
        for directive in parse_options(list) {
            self.apply(&directive)?;
        }
        Ok(())
    }

    /// Builder form of [`apply_all`](Self::apply_all).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] naming the first bad option.
    pub fn with_options(mut self, list: &str) -> Result<Self> {
        self.apply_all(list)?;
        Ok(self)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            fg: Self::DEFAULT_FG,
            bg: Color::Default,
            width_policy: WidthPolicy::Allowlist,
            hide_cursor: true,
        }
    }
}

fn parse_color(value: &str) -> Result<Color> {
    Color::parse(value).ok_or_else(|| Error::InvalidOption(format!("bad color `{value}`")))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
