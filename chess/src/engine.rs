//! Built-in move source
//!
//! A small material-greedy engine. It looks at the position only through FEN, so it can stand in
//! for any external engine. The search is a plain negamax with alpha-beta pruning, with depth equal
//! to the requested level. Level 0 picks a random legal move.
//!
//! The engine uses the same movement rules as the rest of the crate, so it doesn't know about
//! checks either. It wins by capturing the king, which is valued above all the other material.

use crate::board::{Board, PlacedPiece};
use crate::{geometry, legal};
use crate::moves::{apply_move, Move};
use crate::source::{self, MoveSource, Reply, Request, SourceError};
use crate::types::{Color, Coord, Piece};

use rand::seq::SliceRandom;
use rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

const KING_VALUE: i32 = 20_000;
const NO_MOVES: i32 = KING_VALUE / 2;
const INF: i32 = KING_VALUE * 2;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(isize, isize); 10] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -2),
    (0, 2),
];

const ROOK_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[inline]
fn value(p: Piece) -> i32 {
    match p {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => KING_VALUE,
    }
}

/// Material balance from the point of view of `side`, kings excluded
fn evaluate(b: &Board, side: Color) -> i32 {
    b.pieces()
        .iter()
        .filter(|p| p.piece != Piece::King)
        .map(|p| {
            let v = value(p.piece);
            if p.color == side {
                v
            } else {
                -v
            }
        })
        .sum()
}

fn push_offsets(res: &mut Vec<Coord>, p: &PlacedPiece, deltas: &[(isize, isize)]) {
    res.extend(deltas.iter().filter_map(|&(dr, dc)| p.coord.try_shift(dr, dc)));
}

fn push_ray(res: &mut Vec<Coord>, p: &PlacedPiece, b: &Board, dir: (isize, isize)) {
    let mut cur = p.coord;
    while let Some(next) = cur.try_shift(dir.0, dir.1) {
        res.push(next);
        if b.is_occupied(next) {
            break;
        }
        cur = next;
    }
}

/// Squares worth testing for `p`, a superset of its legal destinations
fn candidates(p: &PlacedPiece, b: &Board) -> Vec<Coord> {
    let mut res = Vec::new();
    match p.piece {
        Piece::Pawn => {
            let dir = geometry::pawn_forward_delta(p.color);
            push_offsets(&mut res, p, &[(dir, 0), (2 * dir, 0), (dir, -1), (dir, 1)]);
        }
        Piece::Knight => push_offsets(&mut res, p, &KNIGHT_DELTAS),
        Piece::King => push_offsets(&mut res, p, &KING_DELTAS),
        Piece::Rook => ROOK_DIRS.iter().for_each(|&d| push_ray(&mut res, p, b, d)),
        Piece::Bishop => BISHOP_DIRS.iter().for_each(|&d| push_ray(&mut res, p, b, d)),
        Piece::Queen => ROOK_DIRS
            .iter()
            .chain(BISHOP_DIRS.iter())
            .for_each(|&d| push_ray(&mut res, p, b, d)),
    }
    res
}

/// Enumerates all legal moves of `side`
pub fn legal_moves(b: &Board, side: Color) -> Vec<(PlacedPiece, Coord)> {
    let mut res = Vec::new();
    for p in b.pieces_of(side) {
        for dst in candidates(p, b) {
            if legal::is_legal(p, dst, b) {
                res.push((*p, dst));
            }
        }
    }
    res
}

/// Puts captures first, the most valuable victims ahead
fn order(moves: &mut [(PlacedPiece, Coord)], b: &Board) {
    moves.sort_by_key(|(_, dst)| -b.get(*dst).map_or(0, |t| value(t.piece)));
}

fn negamax(b: &Board, side: Color, depth: u8, mut alpha: i32, beta: i32) -> i32 {
    if !b.has_king(side) {
        // Prefer losing later and winning sooner.
        return -KING_VALUE - i32::from(depth);
    }
    if depth == 0 {
        return evaluate(b, side);
    }
    let mut moves = legal_moves(b, side);
    if moves.is_empty() {
        return -NO_MOVES;
    }
    order(&mut moves, b);
    let mut best = -INF;
    for (p, dst) in moves {
        let next = apply_move(&p, dst, b).board;
        let score = -negamax(&next, side.inv(), depth - 1, -beta, -alpha);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Built-in engine
pub struct Engine {
    rng: Xoshiro256PlusPlus,
}

impl Engine {
    /// Creates an engine seeded from the thread-local RNG
    pub fn new() -> Engine {
        Engine::with_seed(rand::random())
    }

    /// Creates an engine with reproducible tie-breaking
    pub fn with_seed(seed: u64) -> Engine {
        Engine {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Picks a move for `side`, searching `depth` plies ahead
    ///
    /// Returns `None` if `side` has no legal moves.
    pub fn pick(&mut self, b: &Board, side: Color, depth: u8) -> Option<Move> {
        let mut moves = legal_moves(b, side);
        moves.shuffle(&mut self.rng);
        if depth == 0 {
            return moves.first().map(|(p, dst)| Move::new(p.coord, *dst));
        }

        order(&mut moves, b);
        let mut best: Option<(i32, Move)> = None;
        let mut alpha = -INF;
        for (p, dst) in moves {
            let next = apply_move(&p, dst, b).board;
            let score = -negamax(&next, side.inv(), depth - 1, -INF, -alpha);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, Move::new(p.coord, dst)));
            }
            alpha = alpha.max(score);
        }
        if let Some((score, mv)) = best {
            debug!(%mv, score, depth, "engine picked a move");
        }
        best.map(|(_, mv)| mv)
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

impl MoveSource for Engine {
    fn best_move(&mut self, req: &Request) -> Result<Option<Reply>, SourceError> {
        let (board, side) = Board::from_fen(&req.fen)?;
        if side != req.side {
            return Err(SourceError::Failed(format!(
                "FEN has {} to move, requested {}",
                side.name(),
                req.side.name()
            )));
        }
        Ok(self.pick(&board, side, req.level).map(|mv| {
            Reply::new(
                source::encode_square(mv.src()),
                source::encode_square(mv.dst()),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Difficulty, Request};

    #[test]
    fn test_legal_moves() {
        let b = Board::initial();
        assert_eq!(legal_moves(&b, Color::White).len(), 20);
        assert_eq!(legal_moves(&b, Color::Black).len(), 20);

        let b = Board::from_fen_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let mut expected = 0;
        for p in b.pieces_of(Color::White) {
            expected += legal::destinations(p, &b).len();
        }
        assert_eq!(legal_moves(&b, Color::White).len(), expected);
    }

    #[test]
    fn test_random_level() {
        let b = Board::initial();
        let mut engine = Engine::with_seed(42);
        for _ in 0..10 {
            let mv = engine.pick(&b, Color::White, 0).unwrap();
            assert!(mv.is_legal(&b, Color::White));
        }
    }

    #[test]
    fn test_seeded() {
        let b = Board::initial();
        let a = Engine::with_seed(7).pick(&b, Color::Black, 1);
        let c = Engine::with_seed(7).pick(&b, Color::Black, 1);
        assert_eq!(a, c);
    }

    #[test]
    fn test_takes_king() {
        let b = Board::from_fen_placement("4k3/8/8/8/8/8/q7/4R1K1").unwrap();
        for depth in 1..=2 {
            let mv = Engine::with_seed(1).pick(&b, Color::White, depth).unwrap();
            assert_eq!(mv.to_string(), "e1e8");
        }
    }

    #[test]
    fn test_takes_queen() {
        let b = Board::from_fen_placement("4k3/8/8/8/8/8/8/q3R1K1").unwrap();
        let mv = Engine::with_seed(3).pick(&b, Color::White, 1).unwrap();
        assert_eq!(mv.to_string(), "e1e8");

        let b = Board::from_fen_placement("7k/8/8/8/8/8/8/q3R1K1").unwrap();
        let mv = Engine::with_seed(3).pick(&b, Color::White, 1).unwrap();
        assert_eq!(mv.to_string(), "e1a1");
    }

    #[test]
    fn test_avoids_hanging() {
        // Taking the pawn on d5 loses the queen to the pawn on e6.
        let b = Board::from_fen_placement("k7/8/4p3/3p4/8/8/8/3QK3").unwrap();
        let mv = Engine::with_seed(5).pick(&b, Color::White, 2).unwrap();
        assert_ne!(mv.to_string(), "d1d5");
    }

    #[test]
    fn test_no_moves() {
        let b = Board::from_fen_placement("8/8/8/8/8/p7/P7/8").unwrap();
        assert_eq!(Engine::with_seed(0).pick(&b, Color::White, 2), None);
        assert_eq!(Engine::with_seed(0).pick(&b, Color::White, 0), None);
    }

    #[test]
    fn test_source() {
        let mut engine = Engine::with_seed(11);
        let req = Request::new(&Board::initial(), Color::White, Difficulty::Medium);
        let reply = engine.best_move(&req).unwrap().unwrap();
        assert_eq!(reply.from, reply.from.to_ascii_uppercase());
        let mv = reply.decode().unwrap();
        assert!(mv.is_legal(&Board::initial(), Color::White));

        let req = Request {
            fen: "not a fen".to_string(),
            side: Color::White,
            level: 1,
        };
        assert!(matches!(
            engine.best_move(&req),
            Err(SourceError::BadFen(_))
        ));
    }
}
