//! Board module - manages the game grid
//!
//! The board is a 10x20 grid of cell values stored as fixed-size rows.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! A cell value of 0 is empty; 1-7 identify the kind of piece that filled it.

use arrayvec::ArrayVec;

use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

/// One board row
pub type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [EMPTY_CELL; BOARD_WIDTH];

/// Row indices of completed rows, top to bottom
pub type CompletedRows = ArrayVec<usize, BOARD_HEIGHT>;

/// The game board - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    #[inline(always)]
    fn in_bounds(x: i8, y: i8) -> bool {
        x >= 0 && (x as usize) < BOARD_WIDTH && y >= 0 && (y as usize) < BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        if Self::in_bounds(x, y) {
            Some(self.rows[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        if Self::in_bounds(x, y) {
            self.rows[y as usize][x as usize] = cell;
            true
        } else {
            false
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY_CELL)
    }

    /// Fill an entire row with `cell`
    pub fn fill_row(&mut self, y: usize, cell: Cell) {
        self.rows[y] = [cell; BOARD_WIDTH];
    }

    /// Check if a row has no empty cell
    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT && self.rows[y].iter().all(|&cell| cell != EMPTY_CELL)
    }

    /// Indices of completed rows, scanned top to bottom
    pub fn completed_rows(&self) -> CompletedRows {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove every completed row at once and prepend the same number of
    /// empty rows, keeping the remaining rows in their relative order.
    ///
    /// Returns the removed row indices (top to bottom, pre-removal numbering).
    pub fn clear_full_rows(&mut self) -> CompletedRows {
        let cleared = self.completed_rows();
        if cleared.is_empty() {
            return cleared;
        }

        // Walk bottom-up, compacting surviving rows toward the floor.
        let mut write_y = BOARD_HEIGHT;
        for read_y in (0..BOARD_HEIGHT).rev() {
            if !self.is_row_full(read_y) {
                write_y -= 1;
                self.rows[write_y] = self.rows[read_y];
            }
        }
        for row in &mut self.rows[..write_y] {
            *row = EMPTY_ROW;
        }

        cleared
    }

    /// Board rows, top row first
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    /// Copy the grid into a caller-owned buffer without allocating
    pub fn write_grid(&self, out: &mut [Row; BOARD_HEIGHT]) {
        *out = self.rows;
    }

    /// Number of filled cells (used by tests and diagnostics)
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&cell| cell != EMPTY_CELL)
            .count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.rows = [EMPTY_ROW; BOARD_HEIGHT];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
