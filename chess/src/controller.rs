//! Turn and outcome controller
//!
//! [`Controller`] owns the whole state of one game: the board, whose turn it is, the current
//! selection, captured pieces and the outcome. The rendering side feeds it two kinds of events,
//! [`Controller::select()`] and [`Controller::confirm()`], and reads everything else back.
//!
//! Bot moves are asynchronous. When it's the bot's turn, [`Controller::bot_request()`] hands out
//! a request tagged with the current epoch, and the reply is fed back via
//! [`Controller::deliver()`]. Resetting the game bumps the epoch, so replies computed for an
//! abandoned game are dropped.
//!
//! None of the operations fail. Invalid requests are ignored, and a bot that cannot produce a
//! valid move loses the game.

use crate::board::{Board, PlacedPiece};
use crate::config::{Mode, Settings};
use crate::legal::{self, Destinations};
use crate::moves::{self, Applied, Move};
use crate::source::{Request, SourceError};
use crate::types::{Color, Coord, Outcome, Piece, Verdict, WinReason};

use tracing::{debug, info, warn};

/// Game generation counter
pub type Epoch = u64;

/// State of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the side to move to pick a piece
    AwaitingSelection,
    /// A piece is picked, waiting for the destination
    PieceSelected {
        piece: PlacedPiece,
        destinations: Destinations,
    },
    /// Waiting for the bot to reply
    AwaitingOpponent,
    /// The game is finished
    GameOver(Outcome),
}

/// Request for a bot move, tagged with the game epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotRequest {
    pub epoch: Epoch,
    pub request: Request,
}

/// Reply of the move source to a [`BotRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub epoch: Epoch,
    pub result: Result<Option<Move>, SourceError>,
}

/// Pieces taken off the board, grouped by the color of the captured piece
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    white: Vec<Piece>,
    black: Vec<Piece>,
}

impl Captures {
    /// Captured pieces of color `c`, in capture order
    pub fn of(&self, c: Color) -> &[Piece] {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn count(&self, c: Color, piece: Piece) -> usize {
        self.of(c).iter().filter(|&&p| p == piece).count()
    }

    pub fn len(&self) -> usize {
        self.white.len() + self.black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, p: &PlacedPiece) {
        match p.color {
            Color::White => self.white.push(p.piece),
            Color::Black => self.black.push(p.piece),
        }
    }
}

/// Game controller
#[derive(Debug, Clone)]
pub struct Controller {
    settings: Settings,
    human: Color,
    board: Board,
    turn: Color,
    phase: Phase,
    captures: Captures,
    last_move: Option<Move>,
    epoch: Epoch,
    in_flight: bool,
}

impl Controller {
    /// Starts a new game from the initial position
    pub fn new(settings: Settings) -> Controller {
        Controller::with_board(settings, Board::initial(), Color::White)
    }

    /// Starts a game from an arbitrary position with `turn` to move
    pub fn with_board(settings: Settings, board: Board, turn: Color) -> Controller {
        let human = settings.player_color.resolve(&mut rand::thread_rng());
        let mut res = Controller {
            settings,
            human,
            board,
            turn,
            phase: Phase::AwaitingSelection,
            captures: Captures::default(),
            last_move: None,
            epoch: 0,
            in_flight: false,
        };
        res.settle();
        res
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[inline]
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[inline]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Side of the human player
    ///
    /// In two-player mode both sides are human, and this is just the side from the settings.
    #[inline]
    pub fn human_side(&self) -> Color {
        self.human
    }

    /// Side played by the bot, if there is one
    #[inline]
    pub fn bot_side(&self) -> Option<Color> {
        match self.settings.mode {
            Mode::VsBot => Some(self.human.inv()),
            Mode::TwoPlayer => None,
        }
    }

    #[inline]
    pub fn is_bot_turn(&self) -> bool {
        self.bot_side() == Some(self.turn)
    }

    /// Returns `true` while a bot request is handed out and not yet answered
    #[inline]
    pub fn is_thinking(&self) -> bool {
        self.in_flight
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(o) => Some(o),
            _ => None,
        }
    }

    /// Outcome for the human player, only in games against the bot
    pub fn verdict(&self) -> Option<Verdict> {
        self.bot_side()?;
        self.outcome().map(|o| o.verdict(self.human))
    }

    pub fn selected(&self) -> Option<&PlacedPiece> {
        match &self.phase {
            Phase::PieceSelected { piece, .. } => Some(piece),
            _ => None,
        }
    }

    /// Squares the selected piece may move to; empty if nothing is selected
    pub fn destinations(&self) -> &[Coord] {
        match &self.phase {
            Phase::PieceSelected { destinations, .. } => destinations,
            _ => &[],
        }
    }

    /// Handles a click on a piece
    ///
    /// Selects the piece on `coord` if it belongs to the side to move and that side is played by a
    /// human. A click on an opponent piece keeps the current selection, so it can be confirmed as a
    /// capture next. A click on an empty square clears the selection. Returns `true` if a piece got
    /// selected.
    pub fn select(&mut self, coord: Coord) -> bool {
        match self.phase {
            Phase::GameOver(_) | Phase::AwaitingOpponent => {
                debug!(%coord, phase = ?self.phase, "selection ignored");
                return false;
            }
            Phase::AwaitingSelection | Phase::PieceSelected { .. } => {}
        }
        if self.is_bot_turn() {
            debug!(%coord, "selection ignored on bot turn");
            return false;
        }

        match self.board.get(coord) {
            Some(piece) if piece.color == self.turn => {
                let piece = *piece;
                let destinations = legal::destinations(&piece, &self.board);
                debug!(%piece, count = destinations.len(), "piece selected");
                self.phase = Phase::PieceSelected {
                    piece,
                    destinations,
                };
                true
            }
            Some(piece) => {
                debug!(%piece, "opponent piece not selectable");
                false
            }
            None => {
                debug!(%coord, "nothing to select");
                self.phase = Phase::AwaitingSelection;
                false
            }
        }
    }

    /// Handles a click on the destination square for the selected piece
    ///
    /// The move is made if `coord` is one of the legal destinations. The selection is cleared in
    /// any case. Returns `true` if the move was made.
    pub fn confirm(&mut self, coord: Coord) -> bool {
        let Phase::PieceSelected {
            piece,
            destinations,
        } = &self.phase
        else {
            debug!(%coord, phase = ?self.phase, "confirmation ignored");
            return false;
        };
        if !destinations.contains(coord) {
            debug!(piece = %piece, %coord, "illegal destination ignored");
            self.phase = Phase::AwaitingSelection;
            return false;
        }

        let piece = *piece;
        let applied = moves::apply_move(&piece, coord, &self.board);
        self.complete(Move::new(piece.coord, coord), applied);
        true
    }

    /// Hands out a request for the bot move
    ///
    /// Returns `None` unless it's the bot's turn and no request is in flight yet.
    pub fn bot_request(&mut self) -> Option<BotRequest> {
        if self.phase != Phase::AwaitingOpponent || self.in_flight {
            return None;
        }
        self.in_flight = true;
        let request = Request::new(&self.board, self.turn, self.settings.difficulty);
        info!(epoch = self.epoch, side = self.turn.name(), level = request.level, "bot request");
        Some(BotRequest {
            epoch: self.epoch,
            request,
        })
    }

    /// Feeds the bot reply back
    ///
    /// Replies for another epoch, or arriving when no request is in flight, are ignored. A reply
    /// without a valid move ends the game in favor of the human. Returns `true` if the reply was
    /// accepted.
    pub fn deliver(&mut self, reply: BotReply) -> bool {
        if reply.epoch != self.epoch {
            debug!(epoch = reply.epoch, current = self.epoch, "stale bot reply dropped");
            return false;
        }
        if !self.in_flight || self.phase != Phase::AwaitingOpponent {
            debug!(phase = ?self.phase, "unexpected bot reply dropped");
            return false;
        }
        self.in_flight = false;

        let mv = match reply.result {
            Ok(Some(mv)) => mv,
            Ok(None) => {
                info!(side = self.turn.name(), "bot has no move");
                self.bot_resigns();
                return true;
            }
            Err(e) => {
                warn!(error = %e, "move source failed");
                self.bot_resigns();
                return true;
            }
        };
        match mv.make(&self.board, self.turn) {
            Ok(applied) => self.complete(mv, applied),
            Err(e) => {
                warn!(%mv, error = %e, "bot proposed an invalid move");
                self.bot_resigns();
            }
        }
        true
    }

    /// Starts a new game, dropping all the outstanding bot replies
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.human = self.settings.player_color.resolve(&mut rand::thread_rng());
        self.board = Board::initial();
        self.turn = Color::White;
        self.captures = Captures::default();
        self.last_move = None;
        self.in_flight = false;
        self.settle();
        info!(epoch = self.epoch, human = self.human.name(), "new game");
    }

    /// Replaces the settings and starts a new game
    pub fn reconfigure(&mut self, settings: Settings) {
        self.settings = settings;
        self.reset();
    }

    fn complete(&mut self, mv: Move, applied: Applied) {
        let mover = self.turn;
        info!(side = mover.name(), %mv, castling = ?applied.castling, "move made");
        self.board = applied.board;
        self.last_move = Some(mv);
        self.turn = mover.inv();
        if let Some(captured) = applied.captured {
            self.captures.push(&captured);
            if captured.piece == Piece::King {
                self.finish(Outcome::new(mover, WinReason::KingCaptured));
                return;
            }
        }
        self.settle();
    }

    /// Picks the phase for the side to move, ending the game if its king is gone
    fn settle(&mut self) {
        if !self.board.has_king(self.turn) {
            self.finish(Outcome::new(self.turn.inv(), WinReason::KingCaptured));
            return;
        }
        self.phase = if self.is_bot_turn() {
            Phase::AwaitingOpponent
        } else {
            Phase::AwaitingSelection
        };
    }

    fn bot_resigns(&mut self) {
        self.finish(Outcome::new(self.turn.inv(), WinReason::NoReply));
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(%outcome, "game over");
        self.in_flight = false;
        self.phase = Phase::GameOver(outcome);
    }
}

impl Default for Controller {
    fn default() -> Controller {
        Controller::new(Settings::default())
    }
}
