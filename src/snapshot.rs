//! Read-only view of the engine handed to the renderer each frame

use crate::board::Board;
use crate::score::clear_name;
use crate::tetromino::{Color, PieceKind, Shape};
use serde::Serialize;

/// Session status as seen from outside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

/// The falling piece, ready to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    /// Row the piece would land on if hard dropped
    pub ghost_y: i32,
}

/// What happened on the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub rows_cleared: usize,
    /// Line clear points awarded for this lock (drop bonuses not included)
    pub points: u64,
    pub level_up: bool,
}

impl LockEvent {
    /// Display text for the clear, e.g. "Double" or "Tetris - Level Up"
    pub fn label(&self) -> String {
        let mut label = String::from(clear_name(self.rows_cleared));
        if self.level_up {
            label.push_str(" - Level Up");
        }
        label
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub active: Option<ActiveSnapshot>,
    pub hold: Option<PieceKind>,
    pub hold_used: bool,
    pub next: Vec<PieceKind>,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub status: GameStatus,
    pub last_lock: Option<LockEvent>,
}
