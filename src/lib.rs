//! BLOCKFALL - a falling-block puzzle engine
//!
//! The engine keeps a 20x10 playfield, one falling piece, a 7-bag piece
//! queue, a hold slot and the score/level progression. Rendering, input
//! decoding and frame scheduling live outside: a frontend feeds
//! [`Command`]s to [`Game::apply`], calls [`Game::advance`] once per frame,
//! and draws the returned [`Snapshot`].
//!
//! ```
//! use blockfall::{Command, Game, GameStatus, Settings};
//! use std::time::Duration;
//!
//! let mut game = Game::with_seed(Settings::default(), 7).unwrap();
//! game.apply(Command::RotateCw);
//! game.apply(Command::HardDrop);
//! let snapshot = game.advance(Duration::from_millis(16));
//! assert_eq!(snapshot.status, GameStatus::Running);
//! assert!(snapshot.score > 0);
//! ```

pub mod bag;
pub mod board;
pub mod game;
pub mod hold;
pub mod kicks;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod tetromino;

pub use bag::{Bag, new_bag};
pub use board::{Board, COLS, Cell, ROWS};
pub use game::{Command, Game, Phase};
pub use hold::HoldSlot;
pub use piece::ActivePiece;
pub use score::Score;
pub use settings::{GravitySettings, QueueSettings, Settings, SettingsError};
pub use snapshot::{ActiveSnapshot, GameStatus, LockEvent, Snapshot};
pub use tetromino::{Color, PieceKind, RotationDirection, Shape};
