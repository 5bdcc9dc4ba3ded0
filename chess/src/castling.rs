//! Castling resolver
//!
//! Castling rights are not stored anywhere. Instead, castling is allowed if the king and the rook
//! both stand on their home squares and every square between them is empty. The squares are not
//! checked for attacks.

use crate::between;
use crate::board::{Board, PlacedPiece};
use crate::geometry;
use crate::types::{CastlingSide, Coord, Piece};

/// Returns the castling side if moving `piece` to `dst` is a castling attempt
///
/// A castling attempt is a king move by exactly two columns along the same row. The attempt is not
/// checked for validity here, see [`is_valid()`].
#[inline]
pub fn side(piece: &PlacedPiece, dst: Coord) -> Option<CastlingSide> {
    if piece.piece != Piece::King || piece.coord.row() != dst.row() {
        return None;
    }
    match dst.col() as isize - piece.coord.col() as isize {
        2 => Some(CastlingSide::King),
        -2 => Some(CastlingSide::Queen),
        _ => None,
    }
}

#[inline]
pub fn is_castling_move(piece: &PlacedPiece, dst: Coord) -> bool {
    side(piece, dst).is_some()
}

/// Finds the rook which participates in castling to the given side
fn rook<'a>(king: &PlacedPiece, s: CastlingSide, board: &'a Board) -> Option<&'a PlacedPiece> {
    board
        .get(geometry::castling_rook_src(king.color, s))
        .filter(|p| p.is(king.color, Piece::Rook))
}

/// Checks whether `king` may castle by moving to `dst`
pub fn is_valid(king: &PlacedPiece, dst: Coord, board: &Board) -> bool {
    if king.piece != Piece::King || king.coord != geometry::king_home(king.color) {
        return false;
    }
    let Some(s) = side(king, dst) else {
        return false;
    };
    if dst != geometry::castling_king_dst(king.color, s) {
        return false;
    }
    match rook(king, s, board) {
        Some(rook) => !between::is_path_blocked(king.coord, rook.coord, board),
        None => false,
    }
}

/// Performs castling, returning the new board
///
/// The king goes to `dst`, and the rook goes to the square the king has passed over. The move
/// must be valid according to [`is_valid()`]; if the rook is missing, only the king is moved.
pub fn execute(king: &PlacedPiece, dst: Coord, board: &Board) -> Board {
    let s = if dst.col() > king.coord.col() {
        CastlingSide::King
    } else {
        CastlingSide::Queen
    };
    let rook_id = rook(king, s, board).map(|r| r.id);
    let rook_dst = geometry::castling_rook_dst(king.color, s);
    let pieces = board
        .pieces()
        .iter()
        .map(|p| {
            if p.id == king.id {
                p.moved_to(dst)
            } else if Some(p.id) == rook_id {
                p.moved_to(rook_dst)
            } else {
                *p
            }
        })
        .collect();
    board.successor(pieces)
}
