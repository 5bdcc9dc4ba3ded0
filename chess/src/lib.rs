//! # Kingfall
//!
//! Move legality and game flow for a casual chess game against a bot.
//!
//! The rules are simplified on purpose: there are no checks, checkmates or stalemates, and no
//! enpassant or promotion. A game ends when a king is captured, or when the bot cannot come up with
//! a move.
//!
//! # Example
//!
//! ```
//! use kingfall::{Color, Controller, Coord, Mode, Settings};
//! use std::str::FromStr;
//!
//! let settings = Settings {
//!     mode: Mode::TwoPlayer,
//!     ..Settings::default()
//! };
//! let mut game = Controller::new(settings);
//! assert!(game.select(Coord::from_str("e2").unwrap()));
//! assert!(game.confirm(Coord::from_str("e4").unwrap()));
//! assert_eq!(game.turn(), Color::Black);
//! ```
//!
//! To play against the bot, use [`Session`], which runs the move source on a background thread.

pub mod between;
pub mod board;
pub mod castling;
pub mod config;
pub mod controller;
pub mod engine;
pub mod legal;
pub mod moves;
pub mod session;
pub mod source;
pub mod types;
pub mod worker;

pub use kingfall_base::geometry;

pub use board::Board;
pub use config::{Mode, PlayerColor, Settings};
pub use controller::{Controller, Phase};
pub use engine::Engine;
pub use moves::Move;
pub use session::Session;
pub use source::{Difficulty, MoveSource};
pub use types::{CastlingSide, Cell, Color, Coord, File, Outcome, Piece, PieceId, Rank, Verdict, WinReason};
