//! Active falling piece logic

use crate::board::{Board, COLS};
use crate::kicks::KICK_OFFSETS;
use crate::tetromino::{PieceKind, RotationDirection, Shape};
use serde::Serialize;

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    /// The type of tetromino
    pub kind: PieceKind,
    /// Matrix in the current orientation
    pub shape: Shape,
    /// Column of the matrix's left edge
    pub x: i32,
    /// Row of the matrix's top edge, negative while above the board
    pub y: i32,
}

impl ActivePiece {
    /// Create a piece at its spawn position
    ///
    /// The matrix is centered horizontally and lifted so its first occupied
    /// row lands on row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            x: ((COLS - shape.width()) / 2) as i32,
            y: -(shape.top_filled_row() as i32),
        }
    }

    /// Get the absolute (row, col) positions of all blocks
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(r, c)| (self.y + r, self.x + c))
    }

    /// Try to translate the piece, returns true if successful
    ///
    /// A blocked move leaves the piece exactly where it was.
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let moved = Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        };
        if board.collides(&moved) {
            return false;
        }
        *self = moved;
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_move(board, -1, 0)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_move(board, 1, 0)
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_move(board, 0, 1)
    }

    /// Try to rotate, walking the kick table until a placement fits
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        let shape = self.shape.rotated(direction);
        for dx in KICK_OFFSETS {
            let candidate = Self {
                shape,
                x: self.x + dx,
                ..*self
            };
            if !board.collides(&candidate) {
                *self = candidate;
                return true;
            }
        }
        false
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }

    /// Get the ghost piece row (where the piece would land)
    pub fn ghost_y(&self, board: &Board) -> i32 {
        let mut ghost = *self;
        ghost.hard_drop(board);
        ghost.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, ROWS};
    use crate::tetromino::Color;

    fn vertical_i(x: i32, y: i32) -> ActivePiece {
        ActivePiece {
            kind: PieceKind::I,
            shape: PieceKind::I.shape().rotated(RotationDirection::Clockwise),
            x,
            y,
        }
    }

    #[test]
    fn test_spawn_position() {
        let t = ActivePiece::spawn(PieceKind::T);
        assert_eq!((t.x, t.y), (3, 0));

        // I has an empty top row, so it starts one row above the board
        let i = ActivePiece::spawn(PieceKind::I);
        assert_eq!((i.x, i.y), (3, -1));
        assert!(i.blocks().all(|(row, _)| row == 0));

        let o = ActivePiece::spawn(PieceKind::O);
        assert_eq!((o.x, o.y), (4, 0));
    }

    #[test]
    fn test_move_down() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::T);
        assert!(piece.move_down(&board));
        assert_eq!(piece.y, 1);
    }

    #[test]
    fn test_blocked_move_is_silent() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::O);
        while piece.move_left(&board) {}
        let before = piece;
        assert!(!piece.move_left(&board));
        assert_eq!(piece, before);
        assert_eq!(piece.x, 0);
    }

    #[test]
    fn test_hard_drop() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::O);
        let distance = piece.hard_drop(&board);
        assert_eq!(distance, ROWS as u32 - 2);
        assert_eq!(piece.y, ROWS as i32 - 2);
    }

    #[test]
    fn test_ghost_does_not_move_piece() {
        let mut board = Board::new();
        board.set(10, 4, Cell::Filled(Color::Red));
        let piece = ActivePiece::spawn(PieceKind::O);
        assert_eq!(piece.ghost_y(&board), 8);
        assert_eq!(piece.y, 0);
    }

    #[test]
    fn test_rotation_is_cumulative() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::T);
        piece.y = 5;
        assert!(piece.rotate(RotationDirection::Clockwise, &board));
        assert!(piece.rotate(RotationDirection::Clockwise, &board));
        let upside_down = PieceKind::T
            .shape()
            .rotated(RotationDirection::Clockwise)
            .rotated(RotationDirection::Clockwise);
        assert_eq!(piece.shape, upside_down);
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let board = Board::new();
        // Column 2 of the matrix sits on the last board column
        let mut piece = vertical_i(COLS as i32 - 3, 5);
        assert!(piece.blocks().all(|(_, col)| col == COLS as i32 - 1));

        // The horizontal result would span columns 7..=10; one step left fits
        assert!(piece.rotate(RotationDirection::Clockwise, &board));
        assert_eq!(piece.x, COLS as i32 - 4);
        let cols: Vec<_> = piece.blocks().map(|(_, col)| col).collect();
        assert_eq!(cols, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_rotation_rejected_when_no_kick_fits() {
        let mut board = Board::new();
        // Fill every column of row 7 except the last one, where the I stands
        for col in 0..COLS as i32 - 1 {
            board.set(7, col, Cell::Filled(Color::Red));
        }
        let mut piece = vertical_i(COLS as i32 - 3, 5);
        assert!(!board.collides(&piece));
        let before = piece;
        assert!(!piece.rotate(RotationDirection::Clockwise, &board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_uses_first_fitting_kick() {
        let mut board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::T);
        piece.y = 10;
        // Clockwise T occupies matrix column 1 plus (1, 2); these two cells
        // block the 0, -1 and +1 offsets
        board.set(11, piece.x + 1, Cell::Filled(Color::Red));
        board.set(11, piece.x + 2, Cell::Filled(Color::Red));
        let mut rotated = piece;
        assert!(rotated.rotate(RotationDirection::Clockwise, &board));
        assert!(!board.collides(&rotated));
        assert_eq!(rotated.x, piece.x - 2);
    }

    #[test]
    fn test_move_right_stops_at_wall() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::O);
        while piece.move_right(&board) {}
        assert_eq!(piece.x, COLS as i32 - 2);
        assert!(!board.collides(&piece));
    }

    #[test]
    fn test_rotation_kicks_right_by_one() {
        let board = Board::new();
        // Standing in column 1: flat I needs columns -1..=2, -1 makes it worse
        let mut piece = vertical_i(-1, 5);
        assert!(piece.rotate(RotationDirection::Clockwise, &board));
        assert_eq!(piece.x, 0);
        let cols: Vec<i32> = piece.blocks().map(|(_, col)| col).collect();
        assert_eq!(cols, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rotation_kicks_right_by_two() {
        let board = Board::new();
        // Standing in column 0: only the +2 offset brings the flat I inside
        let mut piece = vertical_i(-2, 5);
        assert!(piece.rotate(RotationDirection::Clockwise, &board));
        assert_eq!(piece.x, 0);
        let cols: Vec<i32> = piece.blocks().map(|(_, col)| col).collect();
        assert_eq!(cols, vec![0, 1, 2, 3]);
    }
}
