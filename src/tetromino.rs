//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes as boolean occupancy matrices in their spawn
//! orientation. Rotations are computed from the current matrix on demand.

use serde::Serialize;

/// Side length of the largest shape matrix (the I piece)
pub const MAX_SHAPE: usize = 4;

/// The 7 tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

/// Display color tag carried by filled cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

impl PieceKind {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Orange,
        }
    }

    /// Get all tetromino kinds for bag randomization
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ]
    }

    /// Canonical spawn matrix for this kind
    pub fn shape(&self) -> Shape {
        match self {
            PieceKind::I => Shape::from_rows(&[
                "....", //
                "####",
                "....",
                "....",
            ]),
            PieceKind::O => Shape::from_rows(&[
                "##", //
                "##",
            ]),
            PieceKind::T => Shape::from_rows(&[
                ".#.", //
                "###",
                "...",
            ]),
            PieceKind::S => Shape::from_rows(&[
                ".##", //
                "##.",
                "...",
            ]),
            PieceKind::Z => Shape::from_rows(&[
                "##.", //
                ".##",
                "...",
            ]),
            PieceKind::J => Shape::from_rows(&[
                "#..", //
                "###",
                "...",
            ]),
            PieceKind::L => Shape::from_rows(&[
                "..#", //
                "###",
                "...",
            ]),
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Occupancy matrix of a piece in one orientation
///
/// Only the top-left `height` x `width` corner of `cells` is meaningful.
/// Shapes are values: rotating returns a new matrix and never touches `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: [[bool; MAX_SHAPE]; MAX_SHAPE],
}

impl Shape {
    /// Build a shape from text rows, `#` marking an occupied cell
    fn from_rows(rows: &[&str]) -> Self {
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        let mut width = 0;
        for (r, row) in rows.iter().enumerate() {
            width = width.max(row.len());
            for (c, ch) in row.chars().enumerate() {
                cells[r][c] = ch == '#';
            }
        }
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at (row, col) is occupied; out-of-range reads are empty
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row][col]
    }

    /// Iterate occupied cells as (row, col) offsets within the matrix
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (r as i32, c as i32))
        })
    }

    /// Index of the first row holding an occupied cell (0 for an empty matrix)
    pub fn top_filled_row(&self) -> usize {
        (0..self.height)
            .find(|&r| self.cells[r][..self.width].iter().any(|&c| c))
            .unwrap_or(0)
    }

    /// Rotate 90 degrees in the given direction
    pub fn rotated(&self, direction: RotationDirection) -> Shape {
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        // Output is width x height
        for r in 0..self.width {
            for c in 0..self.height {
                cells[r][c] = match direction {
                    // new[r][c] = old[h-1-c][r]
                    RotationDirection::Clockwise => self.cells[self.height - 1 - c][r],
                    // new[r][c] = old[c][w-1-r]
                    RotationDirection::CounterClockwise => self.cells[c][self.width - 1 - r],
                };
            }
        }
        Shape {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}
