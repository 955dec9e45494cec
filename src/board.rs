//! Playfield representation and collision detection

use crate::piece::ActivePiece;
use crate::tetromino::Color;
use serde::Serialize;

/// Playfield dimensions
pub const ROWS: usize = 20;
pub const COLS: usize = 10;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The playfield grid
///
/// Board operations that change contents return a new board and leave the
/// receiver untouched, so a snapshot taken earlier never changes under a
/// reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= ROWS || col >= COLS {
            return false;
        }
        self.cells[row][col] = cell;
        true
    }

    /// Check whether a single block position is blocked
    ///
    /// Walls and the floor always block. Rows above the top (negative) only
    /// check the walls so pieces can spawn partially out of view.
    pub fn is_blocked(&self, row: i32, col: i32) -> bool {
        if col < 0 || col >= COLS as i32 || row >= ROWS as i32 {
            return true;
        }
        row >= 0 && self.cells[row as usize][col as usize].is_filled()
    }

    /// Check whether any block of the piece is blocked
    pub fn collides(&self, piece: &ActivePiece) -> bool {
        piece.blocks().any(|(row, col)| self.is_blocked(row, col))
    }

    /// Write the piece into a copy of the board
    ///
    /// Blocks above the top or outside the walls are dropped.
    pub fn merge(&self, piece: &ActivePiece) -> Board {
        let mut merged = *self;
        let color = piece.kind.color();
        for (row, col) in piece.blocks() {
            merged.set(row, col, Cell::Filled(color));
        }
        merged
    }

    /// Remove every full row and pack the rest toward the bottom
    ///
    /// Returns the repacked board and the number of rows removed.
    pub fn clear_full_rows(&self) -> (Board, usize) {
        let mut full_rows = [false; ROWS];
        for (row, full) in full_rows.iter_mut().enumerate() {
            *full = self.is_row_full(row);
        }
        let full = full_rows.iter().filter(|&&full| full).count();
        if full == 0 {
            return (*self, 0);
        }

        let mut cleared = Board::new();
        // Walk bottom-up so surviving rows keep their relative order
        let mut write_row = ROWS;
        for read_row in (0..ROWS).rev() {
            if !full_rows[read_row] {
                write_row -= 1;
                cleared.cells[write_row] = self.cells[read_row];
            }
        }
        (cleared, full)
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }
}
