//! Controller wired to a move source
//!
//! [`Session`] is what a user interface normally holds. It forwards user events to the
//! [`Controller`], sends bot requests to a [`Worker`] and feeds the replies back. Call
//! [`Session::pump()`] regularly (e.g. once per frame) to move the bot side along.

use crate::config::Settings;
use crate::controller::{BotReply, Controller};
use crate::engine::Engine;
use crate::source::MoveSource;
use crate::types::Coord;
use crate::worker::Worker;

use std::time::{Duration, Instant};

pub struct Session {
    controller: Controller,
    worker: Worker,
}

impl Session {
    /// Creates a session playing against the built-in engine
    pub fn new(settings: Settings) -> Session {
        let engine = match settings.engine_seed {
            Some(seed) => Engine::with_seed(seed),
            None => Engine::new(),
        };
        Session::with_source(settings, engine)
    }

    /// Creates a session with a custom move source
    pub fn with_source<S: MoveSource + 'static>(settings: Settings, source: S) -> Session {
        let mut res = Session {
            controller: Controller::new(settings),
            worker: Worker::spawn(source),
        };
        res.pump();
        res
    }

    #[inline]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn select(&mut self, coord: Coord) -> bool {
        self.controller.select(coord)
    }

    /// Confirms the destination and dispatches the bot request if the bot is to move
    pub fn confirm(&mut self, coord: Coord) -> bool {
        let res = self.controller.confirm(coord);
        self.pump();
        res
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.pump();
    }

    /// Applies new settings and starts a new game
    ///
    /// The move source keeps running, so a changed `engine_seed` takes effect only in a new
    /// session.
    pub fn reconfigure(&mut self, settings: Settings) {
        self.controller.reconfigure(settings);
        self.pump();
    }

    /// Delivers ready replies and dispatches a pending bot request
    ///
    /// Never blocks. Returns `true` if any reply was accepted.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(reply) = self.worker.try_recv() {
            changed |= self.controller.deliver(reply);
        }
        self.dispatch();
        changed
    }

    /// Blocks until the bot replies or `timeout` elapses
    ///
    /// Returns `true` if a reply was accepted. Returns `false` immediately if it's not the bot's
    /// turn.
    pub fn wait_for_bot(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pump() {
                return true;
            }
            if !self.controller.is_thinking() {
                return false;
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            if let Some(reply) = self.worker.recv_timeout(left) {
                if self.controller.deliver(reply) {
                    self.dispatch();
                    return true;
                }
            }
        }
    }

    fn dispatch(&mut self) {
        let Some(request) = self.controller.bot_request() else {
            return;
        };
        let epoch = request.epoch;
        let delay = self.controller.settings().bot_delay();
        if let Err(e) = self.worker.submit(request, delay) {
            self.controller.deliver(BotReply {
                epoch,
                result: Err(e),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, PlayerColor};
    use crate::controller::Phase;
    use crate::source::{Reply, Request, SourceError};
    use crate::types::{Color, Verdict, WinReason};
    use std::str::FromStr;
    use std::sync::mpsc;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn settings(human: PlayerColor) -> Settings {
        Settings {
            mode: Mode::VsBot,
            player_color: human,
            bot_delay_ms: 0,
            engine_seed: Some(42),
            ..Settings::default()
        }
    }

    struct Silent;

    impl MoveSource for Silent {
        fn best_move(&mut self, _req: &Request) -> Result<Option<Reply>, SourceError> {
            Ok(None)
        }
    }

    /// Source which waits for a signal before answering
    struct Gated(mpsc::Receiver<()>);

    impl MoveSource for Gated {
        fn best_move(&mut self, _req: &Request) -> Result<Option<Reply>, SourceError> {
            let _ = self.0.recv();
            Ok(Some(Reply::new("e2", "e4")))
        }
    }

    #[test]
    fn test_play() {
        let mut s = Session::new(settings(PlayerColor::White));
        assert!(s.select(Coord::from_str("e2").unwrap()));
        assert!(s.confirm(Coord::from_str("e4").unwrap()));
        assert!(s.controller().is_thinking());
        assert!(s.wait_for_bot(TIMEOUT));
        assert_eq!(s.controller().turn(), Color::White);
        assert_eq!(s.controller().phase(), &Phase::AwaitingSelection);
        assert_eq!(s.controller().board().len(), 32);
    }

    #[test]
    fn test_bot_first() {
        let mut s = Session::new(settings(PlayerColor::Black));
        assert!(s.controller().is_thinking());
        assert!(s.wait_for_bot(TIMEOUT));
        assert_eq!(s.controller().turn(), Color::Black);
        assert!(!s.wait_for_bot(Duration::ZERO));
    }

    #[test]
    fn test_silent_bot() {
        let mut s = Session::with_source(settings(PlayerColor::Black), Silent);
        assert!(s.wait_for_bot(TIMEOUT));
        let outcome = s.controller().outcome().unwrap();
        assert_eq!(outcome.reason, WinReason::NoReply);
        assert_eq!(s.controller().verdict(), Some(Verdict::Victory));
    }

    #[test]
    fn test_reset_while_thinking() {
        let (tx, rx) = mpsc::channel();
        let mut s = Session::with_source(settings(PlayerColor::Black), Gated(rx));
        assert!(s.controller().is_thinking());
        s.reset();
        assert_eq!(s.controller().epoch(), 1);

        // The reply to the first request is stale, the second one is accepted.
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        assert!(s.wait_for_bot(TIMEOUT));
        assert_eq!(s.controller().turn(), Color::Black);
        assert_eq!(
            s.controller().last_move().map(|m| m.to_string()),
            Some("e2e4".to_string())
        );
    }
}
