// SPDX-License-Identifier: MIT
//
// Console — a double-buffered cell grid over a terminal.
//
// Drawing calls only touch the *current* grid. `flush` compares it against
// the *previous* grid (what the terminal is believed to show) and emits the
// smallest set of escape sequences that makes the screen match, then copies
// each emitted cell into previous. A flush right after a flush has nothing
// to say and writes nothing.
//
// The flush, per row:
//
//   1. The physical cursor column is unknown at the start of every row, so
//      the first changed cell of a row always gets an absolute position.
//      Rows without changes produce no bytes at all.
//   2. A cell equal to its previous counterpart is skipped.
//   3. A changed cell gets: a position (only if the cursor isn't already
//      there), a color pair (fg/bg swapped for REVERSE), and its glyph.
//      The tracked cursor then advances one column, or two for a wide
//      glyph. After a wide glyph the next column is copied into previous
//      without output, since the terminal already covered it.
//
// All bytes for one flush go out in a single `Terminal::write`.
//
// Input: `read_key` does at most one bounded read and decodes one key. When
// a read brings in more than one key (fast typing, pasted text) the rest is
// kept and handed out by later calls before the terminal is asked again.

use log::{debug, trace, warn};

use crate::ansi;
use crate::cell::{Cell, Flags};
use crate::color::Color;
use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::key::{Key, translate_key};
use crate::output::OutputBuffer;
use crate::terminal::Terminal;
use crate::utf8;
use crate::width::WidthPolicy;

// ─── FlushStats ──────────────────────────────────────────────────────────────

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
    /// Cells whose glyph was sent.
    pub cells_written: usize,
    /// Cells left alone: unchanged, or covered by a wide glyph.
    pub cells_skipped: usize,
    /// Position sequences emitted.
    pub cursor_moves: usize,
    /// Bytes handed to the terminal.
    pub bytes: usize,
}

impl FlushStats {
    /// Total cells examined.
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_written + self.cells_skipped
    }

    /// Whether the flush sent nothing.
    #[inline]
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.bytes == 0
    }
}

// ─── Console ─────────────────────────────────────────────────────────────────

/// A double-buffered console drawing through a [`Terminal`].
///
/// ```
/// use gridcon_term::console::Console;
/// use gridcon_term::terminal::MemoryTerminal;
///
/// let mut con = Console::new(MemoryTerminal::new(20, 4))?;
/// con.set_xy(2, 1);
/// con.put("hi");
/// let stats = con.flush()?;
/// assert_eq!(stats.cells_written, 2);
/// assert!(con.flush()?.is_idle());
/// # Ok::<(), gridcon_term::error::Error>(())
/// ```
pub struct Console<T: Terminal> {
    /// Always `Some` until `into_terminal` takes it.
    terminal: Option<T>,

    current: Grid,
    previous: Grid,
    out: OutputBuffer,

    // Paint cursor: where `put` writes next and with which colors.
    put_x: i32,
    put_y: i32,
    put_fg: Color,
    put_bg: Color,

    width_policy: WidthPolicy,
    full_redraw: bool,

    // Bytes from the last read not yet decoded.
    input: Vec<u8>,
    input_pos: usize,
}

impl<T: Terminal> Console<T> {
    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Open a console with the default configuration.
    ///
    /// # Errors
    ///
    /// Propagates a failure to write the setup sequences.
    pub fn new(terminal: T) -> Result<Self> {
        Self::with_config(terminal, ConsoleConfig::default())
    }

    /// Open a console: switch to the alternate screen, set the initial
    /// colors, home and clear, optionally hide the cursor, and size both
    /// grids from the terminal.
    ///
    /// # Errors
    ///
    /// Propagates a failure to write the setup sequences.
    pub fn with_config(mut terminal: T, config: ConsoleConfig) -> Result<Self> {
        let mut out = OutputBuffer::new();
        ansi::enter_alt_screen(&mut out)?;
        ansi::set_color(&mut out, config.fg, config.bg)?;
        ansi::cursor_to(&mut out, 0, 0)?;
        ansi::clear_screen(&mut out)?;
        if config.hide_cursor {
            ansi::cursor_hide(&mut out)?;
        }
        out.flush_to(&mut terminal)?;

        let (w, h) = (terminal.width(), terminal.height());
        debug!("console open: {w}x{h}, {:?}", config);

        Ok(Self {
            terminal: Some(terminal),
            current: Grid::new(w, h),
            previous: Grid::new(w, h),
            out,
            put_x: 0,
            put_y: 0,
            put_fg: config.fg,
            put_bg: config.bg,
            width_policy: config.width_policy,
            full_redraw: false,
            input: Vec::new(),
            input_pos: 0,
        })
    }

    /// Leave the alternate screen and hand the terminal back.
    ///
    /// # Errors
    ///
    /// Propagates a failure to write the exit sequence; the terminal is
    /// dropped in that case.
    pub fn into_terminal(mut self) -> Result<T> {
        self.write_exit()?;
        let terminal = self.terminal.take();
        debug!("console closed");
        Ok(terminal.unwrap_or_else(|| unreachable!("terminal is only taken here")))
    }

    fn write_exit(&mut self) -> Result<()> {
        let Some(term) = self.terminal.as_mut() else {
            return Ok(());
        };
        self.out.clear();
        ansi::exit(&mut self.out)?;
        self.out.flush_to(term)?;
        Ok(())
    }

    /// The underlying terminal.
    #[must_use]
    pub fn terminal(&self) -> &T {
        self.terminal
            .as_ref()
            .unwrap_or_else(|| unreachable!("terminal is present until into_terminal"))
    }

    /// The underlying terminal, mutably.
    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal
            .as_mut()
            .unwrap_or_else(|| unreachable!("terminal is present until into_terminal"))
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.current.width()
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.current.height()
    }

    /// Resize both grids. All content is discarded and both become blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!("console resize: {width}x{height}");
        self.current.resize(width, height);
        self.previous.resize(width, height);
    }

    /// Resize to the terminal's current size if it changed. Returns whether
    /// a resize happened.
    pub fn sync_size(&mut self) -> bool {
        let (w, h) = {
            let term = self.terminal();
            (term.width(), term.height())
        };
        if (w, h) == (self.width(), self.height()) {
            return false;
        }
        self.resize(w, h);
        true
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Move the paint cursor.
    #[inline]
    pub const fn set_xy(&mut self, x: i32, y: i32) {
        self.put_x = x;
        self.put_y = y;
    }

    /// The paint cursor position.
    #[inline]
    #[must_use]
    pub const fn xy(&self) -> (i32, i32) {
        (self.put_x, self.put_y)
    }

    /// Set the paint colors used by [`put`](Self::put).
    #[inline]
    pub const fn set_color(&mut self, fg: Color, bg: Color) {
        self.put_fg = fg;
        self.put_bg = bg;
    }

    /// Write `text` at the paint cursor, one cell per character, advancing
    /// the cursor one column each. Characters that land outside the grid
    /// are dropped but still advance the cursor.
    pub fn put(&mut self, text: &str) {
        self.put_bytes(text.as_bytes());
    }

    /// [`put`](Self::put) for raw bytes. Malformed UTF-8 is skipped.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        for ch in utf8::decode(bytes) {
            let cell = Cell::styled(ch, self.put_fg, self.put_bg, Flags::empty());
            self.current.set_signed(self.put_x, self.put_y, cell);
            self.put_x = self.put_x.saturating_add(1);
        }
    }

    /// Replace the glyph at `(x, y)`, keeping its colors and flags.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char) {
        if let Some(cell) = self.cell_mut_signed(x, y) {
            cell.ch = ch;
        }
    }

    /// Replace the glyph and flags at `(x, y)`, keeping its colors.
    pub fn put_char_flags(&mut self, x: i32, y: i32, ch: char, flags: Flags) {
        if let Some(cell) = self.cell_mut_signed(x, y) {
            cell.ch = ch;
            cell.flags = flags;
        }
    }

    /// Replace the colors at `(x, y)`, keeping its glyph and flags.
    pub fn put_color(&mut self, x: i32, y: i32, fg: Color, bg: Color) {
        if let Some(cell) = self.cell_mut_signed(x, y) {
            cell.fg = fg;
            cell.bg = bg;
        }
    }

    /// Replace the colors and flags at `(x, y)`, keeping its glyph.
    pub fn put_color_flags(&mut self, x: i32, y: i32, fg: Color, bg: Color, flags: Flags) {
        if let Some(cell) = self.cell_mut_signed(x, y) {
            cell.fg = fg;
            cell.bg = bg;
            cell.flags = flags;
        }
    }

    /// Copy a block of cells with its top-left corner at `(x, y)`. Every
    /// `stride` cells start a new row; a stride of zero means one row.
    /// Cells falling outside the grid, including at negative offsets, are
    /// dropped individually.
    pub fn blit(&mut self, x: i32, y: i32, stride: usize, cells: &[Cell]) {
        if cells.is_empty() {
            return;
        }
        let stride = if stride == 0 { cells.len() } else { stride };
        for (row, chunk) in cells.chunks(stride).enumerate() {
            let cy = y.saturating_add(i32::try_from(row).unwrap_or(i32::MAX));
            for (col, &cell) in chunk.iter().enumerate() {
                let cx = x.saturating_add(i32::try_from(col).unwrap_or(i32::MAX));
                self.current.set_signed(cx, cy, cell);
            }
        }
    }

    /// Set every cell to a blank painted with `fg`/`bg`.
    pub fn fill(&mut self, fg: Color, bg: Color) {
        self.current.fill(Cell::blank(fg, bg));
    }

    // ─── Access ──────────────────────────────────────────────────────────

    /// The cell at `(x, y)` in the current grid.
    #[inline]
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.current.get(x, y)
    }

    /// Mutable cell at `(x, y)` in the current grid.
    #[inline]
    pub fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.current.get_mut(x, y)
    }

    /// The glyph at `(x, y)` in the current grid.
    #[inline]
    #[must_use]
    pub fn get_char(&self, x: u16, y: u16) -> Option<char> {
        self.current.get(x, y).map(|c| c.ch)
    }

    /// The grid being drawn.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> &Grid {
        &self.current
    }

    /// The grid the terminal is believed to show.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> &Grid {
        &self.previous
    }

    /// The active width policy.
    #[inline]
    #[must_use]
    pub const fn width_policy(&self) -> WidthPolicy {
        self.width_policy
    }

    /// Change how wide glyphs are recognized from the next flush on.
    #[inline]
    pub const fn set_width_policy(&mut self, policy: WidthPolicy) {
        self.width_policy = policy;
    }

    fn cell_mut_signed(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        self.current.get_mut(x, y)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Make the next flush resend every cell, whatever previous holds.
    pub const fn force_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Bring the terminal in line with the current grid.
    ///
    /// # Errors
    ///
    /// Propagates the terminal's write or flush error. Previous already
    /// reflects the attempted frame when that happens; call
    /// [`force_redraw`](Self::force_redraw) to resend it.
    pub fn flush(&mut self) -> Result<FlushStats> {
        let mut stats = FlushStats::default();
        let width = self.current.width();
        let policy = self.width_policy;
        let full = std::mem::take(&mut self.full_redraw);
        self.out.clear();

        for y in 0..self.current.height() {
            let (Some(cur_row), Some(prev_row)) = (self.current.row(y), self.previous.row_mut(y))
            else {
                continue;
            };

            if !full && cur_row == &*prev_row {
                stats.cells_skipped += cur_row.len();
                continue;
            }

            // Column the physical cursor sits at, if known on this row.
            let mut cursor: Option<u16> = None;
            let mut skip_next = false;

            for (x, (cell, prev)) in (0..width).zip(cur_row.iter().zip(prev_row.iter_mut())) {
                if skip_next {
                    *prev = *cell;
                    skip_next = false;
                    stats.cells_skipped += 1;
                    continue;
                }
                if !full && prev == cell {
                    stats.cells_skipped += 1;
                    continue;
                }

                if cursor != Some(x) {
                    ansi::cursor_to(&mut self.out, x, y)?;
                    stats.cursor_moves += 1;
                }
                let (fg, bg) = cell.render_colors();
                ansi::set_color(&mut self.out, fg, bg)?;
                self.out.write_char(cell.ch);

                let cols = policy.columns(cell.ch);
                cursor = x.checked_add(cols);
                skip_next = cols > 1;

                *prev = *cell;
                stats.cells_written += 1;
            }
        }

        if let Some(term) = self.terminal.as_mut() {
            stats.bytes = self.out.flush_to(term)?;
        }
        trace!(
            "flush: {} written, {} skipped, {} moves, {} bytes",
            stats.cells_written, stats.cells_skipped, stats.cursor_moves, stats.bytes
        );
        Ok(stats)
    }

    /// Dump the whole current grid as colored text, one line per row,
    /// followed by an SGR reset. Neither grid is changed; use it for
    /// printing a frame into ordinary scrollback.
    ///
    /// # Errors
    ///
    /// Propagates the terminal's write or flush error.
    pub fn print_all(&mut self) -> Result<()> {
        self.out.clear();
        for y in 0..self.current.height() {
            for cell in self.current.row(y).unwrap_or_default() {
                let (fg, bg) = cell.render_colors();
                ansi::set_color(&mut self.out, fg, bg)?;
                self.out.write_char(cell.ch);
            }
            self.out.push(b'\n');
        }
        ansi::reset(&mut self.out)?;

        if let Some(term) = self.terminal.as_mut() {
            self.out.flush_to(term)?;
        }
        Ok(())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Decode one key.
    ///
    /// Keys left over from an earlier read are returned first. Otherwise
    /// one read is made; `None` means nothing arrived within its timeout.
    ///
    /// # Errors
    ///
    /// Propagates the terminal's read error.
    pub fn read_key(&mut self) -> Result<Option<Key>> {
        if self.input_pos >= self.input.len() {
            self.input_pos = 0;
            let Some(term) = self.terminal.as_mut() else {
                return Ok(None);
            };
            if !term.read(&mut self.input)? {
                self.input.clear();
                return Ok(None);
            }
        }

        let Some(decoded) = translate_key(&self.input[self.input_pos..]) else {
            return Ok(None);
        };
        self.input_pos += decoded.len;
        if self.input_pos >= self.input.len() {
            self.input.clear();
            self.input_pos = 0;
        }
        Ok(Some(decoded.key))
    }

    /// Whether undecoded input from an earlier read is waiting.
    #[inline]
    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        self.input_pos < self.input.len()
    }
}

impl<T: Terminal> Drop for Console<T> {
    fn drop(&mut self) {
        if self.terminal.is_none() {
            return;
        }
        if let Err(e) = self.write_exit() {
            warn!("failed to restore screen on console drop: {e}");
        }
        debug!("console closed");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
