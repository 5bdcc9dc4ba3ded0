use crate::board::{Board, PlacedPiece};
use crate::legal;
use crate::types::{Color, Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move from its text form
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
}

/// Error indicating that move is invalid
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// There is no piece on the source square
    #[error("no piece on {0}")]
    NoPiece(Coord),
    /// The piece on the source square belongs to the other side
    #[error("piece on {0} belongs to the other side")]
    WrongSide(Coord),
    /// The piece cannot move to the destination square
    #[error("move is not legal")]
    NotLegal,
}

/// Chess move
///
/// A move is just a pair of squares. It is not bound to any board, so it may be invalid for some
/// boards; use [`Move::validate()`] to check it.
///
/// Moves are printed and parsed as source square followed by destination square, like `e2e4`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Coord,
    dst: Coord,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move { src, dst }
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Checks that the move is legal on board `b` with `side` to move
    ///
    /// Returns the moving piece on success.
    pub fn validate<'a>(&self, b: &'a Board, side: Color) -> Result<&'a PlacedPiece, ValidateError> {
        let piece = b.get(self.src).ok_or(ValidateError::NoPiece(self.src))?;
        if piece.color != side {
            return Err(ValidateError::WrongSide(self.src));
        }
        if !legal::is_legal(piece, self.dst, b) {
            return Err(ValidateError::NotLegal);
        }
        Ok(piece)
    }

    #[inline]
    pub fn is_legal(&self, b: &Board, side: Color) -> bool {
        self.validate(b, side).is_ok()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(RawParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        Ok(Move { src, dst })
    }
}
