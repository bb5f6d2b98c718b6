// SPDX-License-Identifier: MIT
//
// Grid — the 2D cell array the console draws into.
//
// The console owns two of these: the one being drawn (current) and the
// one the terminal is believed to show (previous). Flushing compares them
// cell by cell, so the layout is a flat `Vec<Cell>` in row-major order and
// each row is a contiguous slice.
//
// Both grids always hold exactly `width * height` cells. Resizing clears.

use crate::cell::Cell;

/// A row-major grid of cells.
///
/// ```
/// use gridcon_term::grid::Grid;
/// use gridcon_term::cell::Cell;
///
/// let mut grid = Grid::new(80, 24);
/// assert!(grid.set(5, 3, Cell::new('X')));
/// assert_eq!(grid.get(5, 3).map(|c| c.ch), Some('X'));
/// assert!(!grid.set(80, 0, Cell::new('Y')));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    // ─── Construction ────────────────────────────────────────────────────

    /// A grid of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells (zero width or height).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(x, y)` is inside the grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Flat index of `(x, y)`.
    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Mutable cell at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All cells, row after row.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row `y` as a slice, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Row `y` as a mutable slice, or `None` if out of bounds.
    #[inline]
    pub fn row_mut(&mut self, y: u16) -> Option<&mut [Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            let w = usize::from(self.width);
            Some(&mut self.cells[start..start + w])
        } else {
            None
        }
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on 0; an empty grid has no rows either way.
        self.cells.chunks_exact(usize::from(self.width).max(1))
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Write a cell. Returns `true` if `(x, y)` was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Write a cell at signed coordinates; negative or overflowing positions
    /// are ignored. Returns `true` if the cell landed.
    #[inline]
    pub fn set_signed(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match (u16::try_from(x), u16::try_from(y)) {
            (Ok(x), Ok(y)) => self.set(x, y, cell),
            _ => false,
        }
    }

    /// Set every cell to `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Resize, discarding all content. Every cell becomes blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.ch).collect();
            writeln!(f, "  |{line}|")?;
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────────
