use crate::board::Board;
use crate::types::Coord;

/// Iterator over the squares strictly between two squares, see [`strict()`]
#[derive(Debug, Clone)]
pub struct Strict {
    cur: Coord,
    step: (isize, isize),
    left: usize,
}

impl Iterator for Strict {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        self.cur = self.cur.try_shift(self.step.0, self.step.1)?;
        Some(self.cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.left))
    }
}

#[inline]
fn deltas(src: Coord, dst: Coord) -> (isize, isize) {
    (
        dst.row() as isize - src.row() as isize,
        dst.col() as isize - src.col() as isize,
    )
}

/// Walks from `src` towards `dst` with a unit step, yielding every square in between
///
/// Neither `src` nor `dst` is yielded. The result is only meaningful if `src` and `dst` lie on
/// one line or one diagonal (see [`is_rook_valid()`] and [`is_bishop_valid()`]); otherwise the
/// walk still takes `max(|d_row|, |d_col|) - 1` unit steps, which don't end next to `dst`.
#[inline]
pub fn strict(src: Coord, dst: Coord) -> Strict {
    let (dr, dc) = deltas(src, dst);
    let len = dr.unsigned_abs().max(dc.unsigned_abs());
    Strict {
        cur: src,
        step: (dr.signum(), dc.signum()),
        left: len.saturating_sub(1),
    }
}

/// Returns `true` if `src` and `dst` are distinct squares on one diagonal
#[inline]
pub fn is_bishop_valid(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = deltas(src, dst);
    dr != 0 && dr.abs() == dc.abs()
}

/// Returns `true` if `src` and `dst` are distinct squares on one row or one column
#[inline]
pub fn is_rook_valid(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = deltas(src, dst);
    (dr == 0) != (dc == 0)
}

/// Returns `true` if any square strictly between `src` and `dst` is occupied
///
/// The caller must ensure that the squares are on one line or diagonal.
pub fn is_path_blocked(src: Coord, dst: Coord, board: &Board) -> bool {
    strict(src, dst).any(|c| board.is_occupied(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_bishop() {
        let b4 = Coord::from_parts(File::B, Rank::R4);
        let e7 = Coord::from_parts(File::E, Rank::R7);
        let c5 = Coord::from_parts(File::C, Rank::R5);
        let d6 = Coord::from_parts(File::D, Rank::R6);
        assert!(is_bishop_valid(b4, e7));
        assert_eq!(strict(b4, e7).collect::<Vec<_>>(), vec![c5, d6]);
        assert_eq!(strict(e7, b4).collect::<Vec<_>>(), vec![d6, c5]);

        let f3 = Coord::from_parts(File::F, Rank::R3);
        let c6 = Coord::from_parts(File::C, Rank::R6);
        assert!(is_bishop_valid(f3, c6));
        assert_eq!(
            strict(f3, c6).collect::<Vec<_>>(),
            vec![
                Coord::from_parts(File::E, Rank::R4),
                Coord::from_parts(File::D, Rank::R5),
            ]
        );

        assert!(!is_bishop_valid(b4, b4));
        assert!(!is_bishop_valid(b4, c6));
        assert!(!is_bishop_valid(b4, Coord::from_parts(File::B, Rank::R6)));
    }

    #[test]
    fn test_rook() {
        let b4 = Coord::from_parts(File::B, Rank::R4);
        let b7 = Coord::from_parts(File::B, Rank::R7);
        assert!(is_rook_valid(b4, b7));
        assert_eq!(
            strict(b4, b7).collect::<Vec<_>>(),
            vec![
                Coord::from_parts(File::B, Rank::R5),
                Coord::from_parts(File::B, Rank::R6),
            ]
        );

        let a1 = Coord::from_parts(File::A, Rank::R1);
        let h1 = Coord::from_parts(File::H, Rank::R1);
        assert!(is_rook_valid(a1, h1));
        assert_eq!(strict(a1, h1).count(), 6);
        assert_eq!(strict(h1, a1).next(), Some(Coord::from_parts(File::G, Rank::R1)));

        assert!(!is_rook_valid(a1, a1));
        assert!(!is_rook_valid(a1, b4));
    }

    #[test]
    fn test_adjacent() {
        let e4 = Coord::from_parts(File::E, Rank::R4);
        for (dr, dc) in [(-1, -1), (-1, 0), (0, 1), (1, 1)] {
            let dst = e4.try_shift(dr, dc).unwrap();
            assert_eq!(strict(e4, dst).next(), None);
        }
        assert_eq!(strict(e4, e4).next(), None);
    }

    #[test]
    fn test_path_blocked() {
        let board = Board::initial();
        let f1 = Coord::from_parts(File::F, Rank::R1);
        let b5 = Coord::from_parts(File::B, Rank::R5);
        let e2 = Coord::from_parts(File::E, Rank::R2);
        assert!(is_path_blocked(f1, b5, &board));
        assert!(!is_path_blocked(e2, Coord::from_parts(File::E, Rank::R4), &board));
        // Endpoints are not part of the path.
        assert!(!is_path_blocked(
            Coord::from_parts(File::A, Rank::R1),
            Coord::from_parts(File::A, Rank::R2),
            &board
        ));
        assert!(is_path_blocked(
            Coord::from_parts(File::A, Rank::R1),
            Coord::from_parts(File::A, Rank::R7),
            &board
        ));

        let board = Board::from_fen_placement("8/8/8/8/8/8/8/R3K2R").unwrap();
        assert!(!is_path_blocked(
            Coord::from_parts(File::E, Rank::R1),
            Coord::from_parts(File::H, Rank::R1),
            &board
        ));
    }
}
