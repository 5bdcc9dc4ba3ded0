//! Core chess types
//!
//! Most of them are re-exported from the base crate. This module adds the game outcome types.

use std::fmt;

pub use kingfall_base::types::*;

/// Reason why the game was won
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    /// The loser's king was captured
    ///
    /// This is the only rule-based way to finish the game, as checks and checkmates are not tracked.
    KingCaptured,
    /// The move source of the bot side returned no move, or failed to produce one
    ///
    /// This is a policy decision rather than a chess rule. It covers both "checkmated" and
    /// "stalemated" from the point of view of the engine, and also engine failures.
    NoReply,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::KingCaptured => write!(f, "king captured"),
            Self::NoReply => write!(f, "opponent has no reply"),
        }
    }
}

/// Result of a finished game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub winner: Color,
    pub reason: WinReason,
}

impl Outcome {
    pub fn new(winner: Color, reason: WinReason) -> Outcome {
        Outcome { winner, reason }
    }

    /// Returns the outcome from the point of view of the human playing `human`
    pub fn verdict(&self, human: Color) -> Verdict {
        if self.winner == human {
            Verdict::Victory
        } else {
            Verdict::Defeat
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} wins ({})", self.winner.name(), self.reason)
    }
}

/// Outcome of the game relative to the human player
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Victory,
    Defeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict() {
        let outcome = Outcome::new(Color::White, WinReason::KingCaptured);
        assert_eq!(outcome.verdict(Color::White), Verdict::Victory);
        assert_eq!(outcome.verdict(Color::Black), Verdict::Defeat);
        assert_eq!(outcome.to_string(), "White wins (king captured)");
    }
}
