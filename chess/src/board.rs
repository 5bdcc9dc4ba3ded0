//! Board and related things

use crate::types::{Cell, Color, ColorParseError, Coord, File, Piece, PieceId, Rank};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error putting a piece onto the board
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlaceError {
    /// The square is already taken by another piece
    #[error("square {0} is already occupied")]
    Occupied(Coord),
}

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing a [`Board`] together with the side to move from FEN
///
/// Only the first two fields of FEN are meaningful here. Castling rights, enpassant square and
/// move counters are not tracked by the board, so the rest of the string is ignored.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board from FEN
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side from FEN
    #[error("bad move side: {0}")]
    MoveSide(#[from] ColorParseError),
}

/// A piece standing on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlacedPiece {
    /// Identity token, assigned when the piece is created and never reused
    pub id: PieceId,
    pub color: Color,
    pub piece: Piece,
    pub coord: Coord,
}

impl PlacedPiece {
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::from_parts(self.color, self.piece)
    }

    #[inline]
    pub fn is(&self, color: Color, piece: Piece) -> bool {
        self.color == color && self.piece == piece
    }

    /// Returns the same piece (with the same identity) standing on `dst`
    #[inline]
    pub fn moved_to(&self, dst: Coord) -> PlacedPiece {
        PlacedPiece { coord: dst, ..*self }
    }
}

impl Display for PlacedPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.cell(), self.coord)
    }
}

/// Chess board
///
/// The board is an unordered collection of pieces, with at most one piece on every square. It
/// doesn't know whose turn it is, and doesn't track castling rights or enpassant.
///
/// Boards are immutable snapshots: executing a move (see [`crate::moves`]) returns a new board and
/// leaves the old one untouched.
///
/// # Example
///
/// ```
/// # use kingfall::{Board, Color, Coord, Piece};
/// #
/// let mut board = Board::empty();
/// board.put(Color::White, Piece::King, Coord::new(7, 4)).unwrap();
/// board.put(Color::Black, Piece::King, Coord::new(0, 4)).unwrap();
/// assert_eq!(board.as_fen(Color::White), "4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<PlacedPiece>,
    next_id: PieceId,
}

impl Board {
    /// Returns a board without any pieces
    pub fn empty() -> Board {
        Board {
            pieces: Vec::new(),
            next_id: PieceId::from(0),
        }
    }

    /// Returns a board with the initial position
    ///
    /// Pawns stand on rows 6 (White) and 1 (Black), other pieces stand on rows 7 (White) and 0
    /// (Black) in order rook, knight, bishop, queen, king, bishop, knight, rook.
    pub fn initial() -> Board {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut res = Board::empty();
        for file in File::iter() {
            res.push(Color::White, Piece::Pawn, Coord::from_parts(file, Rank::R2));
            res.push(Color::Black, Piece::Pawn, Coord::from_parts(file, Rank::R7));
        }
        for (file, piece) in File::iter().zip(BACK_RANK) {
            res.push(Color::White, piece, Coord::from_parts(file, Rank::R1));
            res.push(Color::Black, piece, Coord::from_parts(file, Rank::R8));
        }
        res
    }

    /// Parses a board from the piece placement part of FEN
    pub fn from_fen_placement(s: &str) -> Result<Board, CellsParseError> {
        let cells = parse_cells(s)?;
        let mut res = Board::empty();
        for (idx, cell) in cells.iter().enumerate() {
            if let (Some(color), Some(piece)) = (cell.color(), cell.piece()) {
                res.push(color, piece, Coord::from_index(idx));
            }
        }
        Ok(res)
    }

    /// Parses a board and the side to move from FEN
    ///
    /// Fields after the side to move are ignored.
    pub fn from_fen(fen: &str) -> Result<(Board, Color), FenParseError> {
        type Error = FenParseError;

        if !fen.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = fen.split_ascii_whitespace();
        let board = Board::from_fen_placement(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        Ok((board, side))
    }

    /// Puts a new piece onto `coord` and returns its freshly assigned identity
    pub fn put(&mut self, color: Color, piece: Piece, coord: Coord) -> Result<PieceId, PlaceError> {
        if self.is_occupied(coord) {
            return Err(PlaceError::Occupied(coord));
        }
        Ok(self.push(color, piece, coord))
    }

    /// Adds a piece without checking that `coord` is free
    fn push(&mut self, color: Color, piece: Piece, coord: Coord) -> PieceId {
        let id = self.next_id;
        self.next_id = id.next();
        self.pieces.push(PlacedPiece {
            id,
            color,
            piece,
            coord,
        });
        id
    }

    /// Builds a successor board with the given pieces, keeping identity allocation going
    pub(crate) fn successor(&self, pieces: Vec<PlacedPiece>) -> Board {
        Board {
            pieces,
            next_id: self.next_id,
        }
    }

    /// Returns the piece standing on `coord`, if any
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.coord == coord)
    }

    #[inline]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Returns the contents of `coord` as a [`Cell`]
    #[inline]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.get(coord).map_or(Cell::EMPTY, PlacedPiece::cell)
    }

    /// Finds a piece by its identity token
    #[inline]
    pub fn find(&self, id: PieceId) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn pieces(&self) -> &[PlacedPiece] {
        &self.pieces
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the king of the given color
    ///
    /// The king may be missing if it was captured, which means that the game is over.
    pub fn king(&self, color: Color) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.is(color, Piece::King))
    }

    #[inline]
    pub fn has_king(&self, color: Color) -> bool {
        self.king(color).is_some()
    }

    /// Returns the board as 64 cells, indexed by [`Coord::index()`]
    pub fn cells(&self) -> [Cell; 64] {
        let mut cells = [Cell::EMPTY; 64];
        for p in &self.pieces {
            cells[p.coord.index()] = p.cell();
        }
        cells
    }

    /// Converts the piece placement into the first field of FEN
    pub fn as_fen_placement(&self) -> String {
        self.to_string()
    }

    /// Converts the board into a full FEN string with `side` to move
    ///
    /// Castling rights, enpassant and move counters are not tracked, so fixed placeholders are
    /// emitted for them.
    pub fn as_fen(&self, side: Color) -> String {
        format!("{} {} KQkq - 0 1", self, side)
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use kingfall::{Board, Color, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii, Color::White).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle, side: Color) -> Pretty<'_> {
        Pretty {
            board: self,
            style,
            side,
        }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrettyStyle {
    /// Use only ASCII characters
    Ascii,
    /// Use Unicode chess pieces and box-drawing characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See [`Board::pretty()`] for details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
    side: Color,
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] = Cell::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                if cells[pos].is_empty() {
                    return Err(Error::UnexpectedChar(b as char));
                }
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

fn format_cells(cells: &[Cell; 64], f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter() {
        if rank.index() != 0 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let cell = cells[Coord::from_parts(file, rank).index()];
            if cell.is_empty() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
                empty = 0;
            }
            write!(f, "{}", cell)?;
        }
        if empty != 0 {
            write!(f, "{}", (b'0' + empty) as char)?;
        }
    }
    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_cells(&self.cells(), f)
    }
}

impl FromStr for Board {
    type Err = CellsParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Board::from_fen_placement(s)
    }
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const WHITE_INDICATOR: char;
    const BLACK_INDICATOR: char;

    fn cell(c: Cell) -> char;

    fn indicator(c: Color) -> char {
        match c {
            Color::White => Self::WHITE_INDICATOR,
            Color::Black => Self::BLACK_INDICATOR,
        }
    }

    fn fmt(b: &Board, side: Color, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let cells = b.cells();
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(cells[Coord::from_parts(file, rank).index()]))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(side), Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const WHITE_INDICATOR: char = 'W';
    const BLACK_INDICATOR: char = 'B';

    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const WHITE_INDICATOR: char = '○';
    const BLACK_INDICATOR: char = '●';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, self.side, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, self.side, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const INI_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_initial() {
        let board = Board::initial();
        assert_eq!(board.len(), 32);
        assert_eq!(board.as_fen_placement(), INI_PLACEMENT);
        assert_eq!(
            board.as_fen(Color::White),
            format!("{} w KQkq - 0 1", INI_PLACEMENT)
        );

        let king = board.king(Color::White).unwrap();
        assert_eq!(king.coord, Coord::new(7, 4));
        let king = board.king(Color::Black).unwrap();
        assert_eq!(king.coord, Coord::new(0, 4));

        for col in 0..8 {
            let p = board.get(Coord::new(6, col)).unwrap();
            assert!(p.is(Color::White, Piece::Pawn));
            let p = board.get(Coord::new(1, col)).unwrap();
            assert!(p.is(Color::Black, Piece::Pawn));
        }
        for row in 2..6 {
            for col in 0..8 {
                assert!(!board.is_occupied(Coord::new(row, col)));
            }
        }
    }

    #[test]
    fn test_identity() {
        let board = Board::initial();
        let ids: HashSet<_> = board.pieces().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 32);
        for p in board.pieces() {
            assert_eq!(board.find(p.id), Some(p));
        }

        let mut board = board;
        let id = board
            .put(Color::White, Piece::Queen, Coord::new(4, 4))
            .unwrap();
        assert!(!ids.contains(&id));
    }

    #[test]
    fn test_put_occupied() {
        let mut board = Board::initial();
        assert_eq!(
            board.put(Color::Black, Piece::Queen, Coord::new(7, 0)),
            Err(PlaceError::Occupied(Coord::new(7, 0)))
        );
        assert_eq!(board.len(), 32);
    }

    #[test]
    fn test_fen() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let (board, side) = Board::from_fen(FEN).unwrap();
        assert_eq!(side, Color::White);
        assert_eq!(
            board.as_fen_placement(),
            "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K"
        );
        assert_eq!(
            board.cell(Coord::from_parts(File::B, Rank::R4)),
            Cell::from_parts(Color::Black, Piece::Bishop)
        );
        assert_eq!(
            board.king(Color::White).map(|k| k.coord),
            Some(Coord::from_parts(File::H, Rank::R1))
        );

        let (_, side) = Board::from_fen("8/8/8/8/8/8/8/8 b").unwrap();
        assert_eq!(side, Color::Black);
    }

    #[test]
    fn test_bad_fen() {
        assert_eq!(
            Board::from_fen(INI_PLACEMENT),
            Err(FenParseError::NoMoveSide)
        );
        assert_eq!(Board::from_fen(""), Err(FenParseError::NoBoard));
        assert_eq!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(CellsParseError::Underflow)
        );
        assert_eq!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/9/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::UnexpectedChar('9'))
        );
        assert_eq!(
            Board::from_fen_placement("rnbqkbnrp/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::RankOverflow(Rank::R8))
        );
        assert_eq!(
            Board::from_fen_placement("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::RankUnderflow(Rank::R8))
        );
        assert_eq!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8"),
            Err(CellsParseError::Overflow)
        );
        assert_eq!(
            Board::from_fen_placement("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::UnexpectedChar('x'))
        );
        assert_eq!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x"),
            Err(FenParseError::MoveSide(ColorParseError::UnexpectedChar('x')))
        );
    }

    #[test]
    fn test_missing_king() {
        let board = Board::from_fen_placement("8/8/8/8/8/8/8/4K3").unwrap();
        assert!(board.has_king(Color::White));
        assert!(!board.has_king(Color::Black));
    }

    #[test]
    fn test_pretty() {
        let (board, side) =
            Board::from_fen("4k3/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        let res = r#"
8│....♚...
7│........
6│........
5│........
4│........
3│........
2│........
1│♖...♔..♖
─┼────────
●│abcdefgh
"#;
        assert_eq!(
            board.pretty(PrettyStyle::Utf8, side).to_string().trim(),
            res.trim()
        );
    }
}
