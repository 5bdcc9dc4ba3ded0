use super::base::{Move, ValidateError};
use crate::board::{Board, PlacedPiece};
use crate::castling;
use crate::types::{CastlingSide, Color, Coord};

/// Result of executing a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Board after the move
    pub board: Board,
    /// Piece removed from the destination square, if any
    pub captured: Option<PlacedPiece>,
    /// Castling side if the move was castling
    pub castling: Option<CastlingSide>,
}

/// Executes the move of `piece` to `dst`, returning the new board
///
/// The move must be legal (see [`crate::legal::is_legal()`]); this is not checked. Castling moves
/// relocate the rook as well. For other moves, the piece standing on `dst` is captured. The input
/// board is never modified.
pub fn apply_move(piece: &PlacedPiece, dst: Coord, board: &Board) -> Applied {
    if let Some(side) = castling::side(piece, dst) {
        return Applied {
            board: castling::execute(piece, dst, board),
            captured: None,
            castling: Some(side),
        };
    }

    let captured = board.get(dst).copied();
    let pieces = board
        .pieces()
        .iter()
        .filter(|p| p.coord != dst)
        .map(|p| if p.id == piece.id { p.moved_to(dst) } else { *p })
        .collect();
    Applied {
        board: board.successor(pieces),
        captured,
        castling: None,
    }
}

impl Move {
    /// Validates the move and executes it
    pub fn make(&self, board: &Board, side: Color) -> Result<Applied, ValidateError> {
        let piece = self.validate(board, side)?;
        Ok(apply_move(piece, self.dst(), board))
    }
}
