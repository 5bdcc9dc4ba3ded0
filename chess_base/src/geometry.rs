use crate::types::{CastlingSide, Color, Coord, File, Rank};

/// Back rank of the given side, where its king and rooks start
pub const fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Rank from which pawns of the given side may make a double step
pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Row delta of a pawn step: White moves toward row 0, Black toward row 7
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const fn king_home(c: Color) -> Coord {
    Coord::from_parts(File::E, home_rank(c))
}

pub const fn castling_king_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Coord::from_parts(file, home_rank(c))
}

pub const fn castling_rook_src(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Coord::from_parts(file, home_rank(c))
}

pub const fn castling_rook_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Coord::from_parts(file, home_rank(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        assert_eq!(home_rank(Color::White).index(), 7);
        assert_eq!(home_rank(Color::Black).index(), 0);
        assert_eq!(pawn_start_rank(Color::White).index(), 6);
        assert_eq!(pawn_start_rank(Color::Black).index(), 1);
    }

    #[test]
    fn test_castling_squares() {
        assert_eq!(king_home(Color::White), Coord::new(7, 4));
        assert_eq!(king_home(Color::Black), Coord::new(0, 4));
        assert_eq!(
            castling_king_dst(Color::White, CastlingSide::King),
            Coord::new(7, 6)
        );
        assert_eq!(
            castling_rook_src(Color::White, CastlingSide::Queen),
            Coord::new(7, 0)
        );
        assert_eq!(
            castling_rook_dst(Color::Black, CastlingSide::King),
            Coord::new(0, 5)
        );
        assert_eq!(
            castling_rook_dst(Color::Black, CastlingSide::Queen),
            Coord::new(0, 3)
        );
    }
}
