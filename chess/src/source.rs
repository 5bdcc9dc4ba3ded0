//! Move sources
//!
//! A move source is whatever picks moves for the bot side. It only sees the position as FEN and
//! answers with a pair of squares in algebraic notation, so any external engine speaking FEN can
//! be plugged in. Replies are decoded here and must be re-validated by the caller before use.

use crate::board::{Board, FenParseError};
use crate::moves::Move;
use crate::types::{Color, Coord, File, Rank};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by a move source
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SourceError {
    /// The source has not started or has been shut down
    #[error("move source is not ready")]
    NotReady,
    /// The source failed to produce a reply
    #[error("move source failed: {0}")]
    Failed(String),
    /// The request FEN was rejected
    #[error("bad request: {0}")]
    BadFen(#[from] FenParseError),
    /// The reply contains something that is not a square
    #[error("bad square {0:?} in reply")]
    BadSquare(String),
}

/// Bot strength as presented to the user
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn iter() -> impl Iterator<Item = Self> {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
        .into_iter()
    }

    /// Numeric strength passed along with the request
    pub const fn strength(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 5,
            Difficulty::Hard => 10,
            Difficulty::Expert => 15,
        }
    }

    /// Engine level (from 0 to 3) for this difficulty
    pub const fn level(self) -> u8 {
        level_for_strength(self.strength())
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

/// Maps a numeric strength onto the engine level
pub const fn level_for_strength(strength: u32) -> u8 {
    match strength {
        0..=1 => 0,
        2..=5 => 1,
        6..=10 => 2,
        _ => 3,
    }
}

/// Request for a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Full FEN of the position, with the side to move
    pub fen: String,
    pub side: Color,
    /// Engine level, from 0 to 3
    pub level: u8,
}

impl Request {
    pub fn new(board: &Board, side: Color, difficulty: Difficulty) -> Request {
        Request {
            fen: board.as_fen(side),
            side,
            level: difficulty.level(),
        }
    }
}

/// Raw reply of a move source: source and destination squares in algebraic notation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reply {
    pub from: String,
    pub to: String,
}

impl Reply {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Reply {
        Reply {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Decodes both squares into a [`Move`]
    pub fn decode(&self) -> Result<Move, SourceError> {
        Ok(Move::new(decode_square(&self.from)?, decode_square(&self.to)?))
    }
}

/// Something that picks moves for the bot
pub trait MoveSource: Send {
    /// Picks a move for `req.side` in the position `req.fen`
    ///
    /// Returns `Ok(None)` if the source has no move to offer.
    fn best_move(&mut self, req: &Request) -> Result<Option<Reply>, SourceError>;
}

impl<S: MoveSource + ?Sized> MoveSource for Box<S> {
    fn best_move(&mut self, req: &Request) -> Result<Option<Reply>, SourceError> {
        (**self).best_move(req)
    }
}

/// Asks `source` for a move and decodes its reply
pub fn query<S: MoveSource + ?Sized>(
    source: &mut S,
    req: &Request,
) -> Result<Option<Move>, SourceError> {
    match source.best_move(req)? {
        Some(reply) => reply.decode().map(Some),
        None => Ok(None),
    }
}

/// Decodes an algebraic square like `e2` or `E2`
pub fn decode_square(s: &str) -> Result<Coord, SourceError> {
    let bad = || SourceError::BadSquare(s.to_string());
    let mut chars = s.chars().map(|c| c.to_ascii_lowercase());
    let file = chars.next().and_then(File::from_char).ok_or_else(bad)?;
    let rank = chars.next().and_then(Rank::from_char).ok_or_else(bad)?;
    if chars.next().is_some() {
        return Err(bad());
    }
    Ok(Coord::from_parts(file, rank))
}

/// Encodes a square in the upper case form, like `E2`
pub fn encode_square(c: Coord) -> String {
    format!("{}{}", c.file().as_char().to_ascii_uppercase(), c.rank())
}
