//! Core game state and logic
//!
//! `Game` owns the board, the falling piece, the queue, the hold slot and
//! the score. Everything runs on the caller's thread: commands and
//! [`Game::advance`] each run to completion before returning, and a lock
//! (merge, clear, score, respawn) is never split across calls.

use crate::bag::Bag;
use crate::board::Board;
use crate::hold::HoldSlot;
use crate::piece::ActivePiece;
use crate::score::Score;
use crate::settings::{Settings, SettingsError};
use crate::snapshot::{ActiveSnapshot, GameStatus, LockEvent, Snapshot};
use crate::tetromino::{PieceKind, RotationDirection};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Where the session is, including the falling piece when there is one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between a lock and the next spawn
    NoPiece,
    Falling(ActivePiece),
    Paused(ActivePiece),
    /// A spawn collided; only a restart leaves this phase
    GameOver,
}

/// Abstract input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    TogglePause,
    Restart,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    phase: Phase,
    hold: HoldSlot,
    bag: Bag,
    score: Score,
    settings: Settings,
    /// Elapsed time not yet spent on gravity ticks
    accumulator: Duration,
    last_lock: Option<LockEvent>,
}

impl Game {
    /// Create a game and spawn its first piece
    ///
    /// Uses the configured seed if there is one, otherwise a random one.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        let seed = settings.queue.seed.unwrap_or_else(rand::random);
        Self::with_seed(settings, seed)
    }

    /// Create a reproducible game
    pub fn with_seed(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut game = Self {
            board: Board::new(),
            phase: Phase::NoPiece,
            hold: HoldSlot::new(),
            bag: Bag::with_seed(seed),
            score: Score::new(),
            settings,
            accumulator: Duration::ZERO,
            last_lock: None,
        };
        info!("New game, seed={}", seed);
        game.spawn_next();
        Ok(game)
    }

    pub fn status(&self) -> GameStatus {
        match self.phase {
            Phase::Paused(_) => GameStatus::Paused,
            Phase::GameOver => GameStatus::GameOver,
            Phase::NoPiece | Phase::Falling(_) => GameStatus::Running,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The falling piece, if the game is running
    pub fn active(&self) -> Option<&ActivePiece> {
        match &self.phase {
            Phase::Falling(piece) => Some(piece),
            _ => None,
        }
    }

    /// Current gravity interval
    pub fn drop_interval(&self) -> Duration {
        self.score.drop_interval(&self.settings.gravity)
    }

    /// Process a command
    ///
    /// Anything other than `TogglePause` and `Restart` is ignored unless a
    /// piece is falling.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Restart => self.restart(),
            Command::TogglePause => self.toggle_pause(),
            _ if !matches!(self.phase, Phase::Falling(_)) => {
                trace!("Ignoring {:?} in {:?}", command, self.status());
            }
            Command::MoveLeft => self.shift(-1),
            Command::MoveRight => self.shift(1),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(RotationDirection::Clockwise),
            Command::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            Command::Hold => self.hold(),
        }
    }

    /// Advance simulated time and run every gravity tick that is due
    ///
    /// Leftover time carries into the next call. Time passed while paused or
    /// after game over is discarded.
    pub fn advance(&mut self, dt: Duration) -> Snapshot {
        if matches!(self.phase, Phase::Falling(_)) {
            self.accumulator = self.accumulator.saturating_add(dt);
            loop {
                let interval = self.drop_interval();
                if self.accumulator < interval {
                    break;
                }
                self.accumulator -= interval;
                self.step_down();
                if !matches!(self.phase, Phase::Falling(_)) {
                    self.accumulator = Duration::ZERO;
                    break;
                }
            }
        }
        self.snapshot()
    }

    /// Build the renderer's view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let active = match &self.phase {
            Phase::Falling(piece) | Phase::Paused(piece) => Some(ActiveSnapshot {
                kind: piece.kind,
                color: piece.kind.color(),
                shape: piece.shape,
                x: piece.x,
                y: piece.y,
                ghost_y: piece.ghost_y(&self.board),
            }),
            Phase::NoPiece | Phase::GameOver => None,
        };
        Snapshot {
            board: self.board,
            active,
            hold: self.hold.held(),
            hold_used: self.hold.is_used(),
            next: self.bag.preview(self.settings.queue.preview),
            score: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
            status: self.status(),
            last_lock: self.last_lock,
        }
    }

    /// Throw away all state and start over with a fresh piece
    pub fn restart(&mut self) {
        let seed = self.settings.queue.seed.unwrap_or_else(rand::random);
        self.board = Board::new();
        self.phase = Phase::NoPiece;
        self.hold = HoldSlot::new();
        self.bag = Bag::with_seed(seed);
        self.score = Score::new();
        self.accumulator = Duration::ZERO;
        self.last_lock = None;
        info!("Restart, seed={}", seed);
        self.spawn_next();
    }

    fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Falling(piece) => {
                debug!("Paused");
                Phase::Paused(piece)
            }
            Phase::Paused(piece) => {
                debug!("Resumed");
                Phase::Falling(piece)
            }
            other => other,
        };
    }

    fn shift(&mut self, dx: i32) {
        if let Phase::Falling(piece) = &mut self.phase {
            if !piece.try_move(&self.board, dx, 0) {
                trace!("Move {} blocked", dx);
            }
        }
    }

    fn rotate(&mut self, direction: RotationDirection) {
        if let Phase::Falling(piece) = &mut self.phase {
            if !piece.rotate(direction, &self.board) {
                trace!("Rotation {:?} blocked", direction);
            }
        }
    }

    fn soft_drop(&mut self) {
        if let Phase::Falling(piece) = &mut self.phase {
            if piece.move_down(&self.board) {
                self.score.add_soft_drop();
                self.accumulator = Duration::ZERO;
            }
        }
    }

    fn hard_drop(&mut self) {
        if let Phase::Falling(piece) = &mut self.phase {
            let distance = piece.hard_drop(&self.board);
            self.score.add_hard_drop(distance);
            self.accumulator = Duration::ZERO;
            self.lock_piece();
        }
    }

    /// One gravity step; locks the piece when it cannot fall
    fn step_down(&mut self) {
        if let Phase::Falling(piece) = &mut self.phase {
            if !piece.move_down(&self.board) {
                self.lock_piece();
            }
        }
    }

    fn hold(&mut self) {
        let Phase::Falling(piece) = self.phase else {
            return;
        };
        let Some(previous) = self.hold.exchange(piece.kind) else {
            trace!("Hold already used this piece");
            return;
        };

        debug!("Hold {:?}, swap in {:?}", piece.kind, previous);
        match previous {
            Some(kind) => self.spawn(kind),
            None => self.spawn_next(),
        }
        self.hold.mark_used();
    }

    /// Lock the current piece, clear rows, score, and spawn the next piece
    fn lock_piece(&mut self) {
        let Phase::Falling(piece) = std::mem::replace(&mut self.phase, Phase::NoPiece) else {
            return;
        };

        let (board, rows) = self.board.merge(&piece).clear_full_rows();
        self.board = board;

        let level_before = self.score.level;
        let points = self.score.add_clear(rows);
        let level_up = self.score.level > level_before;
        self.last_lock = Some(LockEvent {
            kind: piece.kind,
            rows_cleared: rows,
            points,
            level_up,
        });

        debug!(
            "Locked {:?} at ({}, {}), cleared {} rows for {} points",
            piece.kind, piece.x, piece.y, rows, points
        );
        if level_up {
            info!(
                "Level {} reached, drop interval {:?}",
                self.score.level,
                self.drop_interval()
            );
        }

        self.spawn_next();
    }

    /// Spawn the next piece from the queue
    fn spawn_next(&mut self) {
        let kind = self.bag.next();
        self.hold.reset_on_spawn();
        self.spawn(kind);
    }

    /// Place a fresh piece of `kind`; a blocked spawn ends the game
    fn spawn(&mut self, kind: PieceKind) {
        let piece = ActivePiece::spawn(kind);
        if self.board.collides(&piece) {
            info!(
                "Game over: {:?} cannot spawn, score={} lines={} level={}",
                kind, self.score.points, self.score.lines, self.score.level
            );
            self.phase = Phase::GameOver;
            return;
        }
        trace!("Spawned {:?}", kind);
        self.phase = Phase::Falling(piece);
    }
}
