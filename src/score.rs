//! Score, line count and level tracking

use crate::settings::GravitySettings;
use std::time::Duration;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for a lock that clears `rows` rows, before the level multiplier
pub fn line_clear_points(rows: usize) -> u64 {
    match rows {
        0 => 0,
        1 => 100,
        2 => 300,
        3 => 500,
        _ => 800,
    }
}

/// Display name for a line clear
pub fn clear_name(rows: usize) -> &'static str {
    match rows {
        0 => "",
        1 => "Single",
        2 => "Double",
        3 => "Triple",
        _ => "Tetris",
    }
}

/// Scoring state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, always 1 + lines / LINES_PER_LEVEL
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Pieces locked so far
    pub pieces: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            pieces: 0,
        }
    }

    /// Record a lock that cleared `rows` rows and return the points awarded
    ///
    /// Points use the level in effect before this lock; the level is
    /// recomputed afterwards from the new line total.
    pub fn add_clear(&mut self, rows: usize) -> u64 {
        let points = line_clear_points(rows) * u64::from(self.level);
        self.points += points;
        self.lines += rows as u32;
        self.level = 1 + self.lines / LINES_PER_LEVEL;
        self.pieces += 1;
        points
    }

    /// Add score for a successful soft drop step
    pub fn add_soft_drop(&mut self) {
        self.points += 1;
    }

    /// Add score for hard drop (2 points per cell)
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.points += u64::from(cells) * 2;
    }

    /// Gravity interval for the current level
    pub fn drop_interval(&self, gravity: &GravitySettings) -> Duration {
        gravity.interval_for_level(self.level)
    }
}
