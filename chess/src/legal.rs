//! Move legality
//!
//! Legality here means "allowed by the movement rules of the piece". Checks and pins are not
//! considered at all, so a king may step onto an attacked square, and a move may leave the mover's
//! own king under attack.

use crate::board::{Board, PlacedPiece};
use crate::types::{Coord, Piece};
use crate::{between, castling, geometry};

use arrayvec::ArrayVec;

use std::ops::Deref;

fn is_pawn_legal(p: &PlacedPiece, dst: Coord, b: &Board) -> bool {
    let dir = geometry::pawn_forward_delta(p.color);
    let dr = dst.row() as isize - p.coord.row() as isize;
    let dc = dst.col() as isize - p.coord.col() as isize;
    let target = b.get(dst);

    if dc == 0 && target.is_none() {
        if dr == dir {
            return true;
        }
        if dr == 2 * dir && p.coord.rank() == geometry::pawn_start_rank(p.color) {
            return p
                .coord
                .try_shift(dir, 0)
                .map_or(false, |mid| !b.is_occupied(mid));
        }
        return false;
    }

    dc.abs() == 1 && dr == dir && target.map_or(false, |t| t.color != p.color)
}

fn is_knight_legal(p: &PlacedPiece, dst: Coord) -> bool {
    let dr = p.coord.row().abs_diff(dst.row());
    let dc = p.coord.col().abs_diff(dst.col());
    matches!((dr, dc), (1, 2) | (2, 1))
}

#[inline]
fn is_rook_legal(p: &PlacedPiece, dst: Coord, b: &Board) -> bool {
    between::is_rook_valid(p.coord, dst) && !between::is_path_blocked(p.coord, dst, b)
}

#[inline]
fn is_bishop_legal(p: &PlacedPiece, dst: Coord, b: &Board) -> bool {
    between::is_bishop_valid(p.coord, dst) && !between::is_path_blocked(p.coord, dst, b)
}

fn is_king_legal(p: &PlacedPiece, dst: Coord, b: &Board) -> bool {
    let dr = p.coord.row().abs_diff(dst.row());
    let dc = p.coord.col().abs_diff(dst.col());
    if dr <= 1 && dc <= 1 {
        return true;
    }
    castling::is_castling_move(p, dst) && castling::is_valid(p, dst, b)
}

/// Checks whether `piece` may move to `dst` on board `b`
///
/// A piece can never move onto its own square, and never onto a square taken by a piece of its
/// own color. Other than that, the usual movement rules apply: pawns move forward onto empty
/// squares (two squares from the start rank) and capture diagonally, sliding pieces need a free
/// path, and the king may castle. There is no enpassant and no promotion.
pub fn is_legal(piece: &PlacedPiece, dst: Coord, b: &Board) -> bool {
    if dst == piece.coord {
        return false;
    }
    if b.get(dst).map_or(false, |t| t.color == piece.color) {
        return false;
    }

    match piece.piece {
        Piece::Pawn => is_pawn_legal(piece, dst, b),
        Piece::Knight => is_knight_legal(piece, dst),
        Piece::Rook => is_rook_legal(piece, dst, b),
        Piece::Bishop => is_bishop_legal(piece, dst, b),
        Piece::Queen => is_rook_legal(piece, dst, b) || is_bishop_legal(piece, dst, b),
        Piece::King => is_king_legal(piece, dst, b),
    }
}

/// Set of squares a piece may legally move to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations(ArrayVec<Coord, 64>);

impl Destinations {
    #[inline]
    pub fn new() -> Destinations {
        Destinations(ArrayVec::new())
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.0.contains(&c)
    }
}

impl Deref for Destinations {
    type Target = [Coord];

    #[inline]
    fn deref(&self) -> &[Coord] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Destinations {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Finds all the squares `piece` may move to, by testing each of the 64 squares
pub fn destinations(piece: &PlacedPiece, b: &Board) -> Destinations {
    let mut res = Destinations::new();
    for c in Coord::iter() {
        if is_legal(piece, c, b) {
            res.0.push(c);
        }
    }
    res
}
