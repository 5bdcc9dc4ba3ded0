//! Game settings
//!
//! Settings are stored as JSON. Every field has a default, so partial files are accepted.

use crate::source::Difficulty;
use crate::types::Color;

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Default pause before the bot request is sent
pub const DEFAULT_BOT_DELAY_MS: u64 = 800;

/// Error loading or saving [`Settings`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("bad settings file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns `true` if the settings file doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Who plays against whom
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Human against the bot
    #[default]
    VsBot,
    /// Two humans at one board
    TwoPlayer,
}

/// Side chosen by the human player
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerColor {
    #[default]
    White,
    Black,
    /// Pick a side at random at the start of every game
    Random,
}

impl PlayerColor {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Color {
        match self {
            PlayerColor::White => Color::White,
            PlayerColor::Black => Color::Black,
            PlayerColor::Random => {
                if rng.gen_bool(0.5) {
                    Color::White
                } else {
                    Color::Black
                }
            }
        }
    }
}

impl From<Color> for PlayerColor {
    fn from(c: Color) -> Self {
        match c {
            Color::White => PlayerColor::White,
            Color::Black => PlayerColor::Black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    pub player_color: PlayerColor,
    pub difficulty: Difficulty,
    /// Pause before the bot request is sent, in milliseconds
    pub bot_delay_ms: u64,
    /// Seed for the built-in engine; random if not set
    pub engine_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: Mode::default(),
            player_color: PlayerColor::default(),
            difficulty: Difficulty::default(),
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
            engine_seed: None,
        }
    }
}

impl Settings {
    #[inline]
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    #[inline]
    pub fn is_vs_bot(&self) -> bool {
        self.mode == Mode::VsBot
    }

    pub fn from_json(s: &str) -> Result<Settings, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        Settings::from_json(&fs::read_to_string(path)?)
    }

    /// Loads settings from `path`, falling back to defaults if the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Settings {
        let path = path.as_ref();
        match Settings::load(path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) if e.is_not_found() => {
                info!(path = %path.display(), "no settings file, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot load settings, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.mode, Mode::VsBot);
        assert_eq!(s.player_color, PlayerColor::White);
        assert_eq!(s.difficulty, Difficulty::Medium);
        assert_eq!(s.bot_delay(), Duration::from_millis(800));
        assert_eq!(s.engine_seed, None);
        assert_eq!(Settings::from_json("{}").unwrap(), s);
    }

    #[test]
    fn test_json() {
        let s = Settings::from_json(
            r#"{"mode": "two_player", "player_color": "random", "difficulty": "expert",
                "bot_delay_ms": 0, "engine_seed": 17}"#,
        )
        .unwrap();
        assert_eq!(s.mode, Mode::TwoPlayer);
        assert_eq!(s.player_color, PlayerColor::Random);
        assert_eq!(s.difficulty, Difficulty::Expert);
        assert_eq!(s.bot_delay_ms, 0);
        assert_eq!(s.engine_seed, Some(17));
        assert!(!s.is_vs_bot());

        let json = s.to_json().unwrap();
        assert!(json.contains("\"two_player\""));
        assert_eq!(Settings::from_json(&json).unwrap(), s);

        assert!(matches!(
            Settings::from_json(r#"{"difficulty": "grandmaster"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_files() {
        let dir = std::env::temp_dir().join(format!("kingfall-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.is_not_found());
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        let s = Settings {
            player_color: PlayerColor::Black,
            difficulty: Difficulty::Hard,
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);

        fs::write(&path, "not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        // A directory in place of the file is an I/O error, but not a missing file.
        let err = Settings::load(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(!err.is_not_found());
        assert_eq!(Settings::load_or_default(&dir), Settings::default());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(PlayerColor::White.resolve(&mut rng), Color::White);
        assert_eq!(PlayerColor::Black.resolve(&mut rng), Color::Black);
        let mut seen = [false; 2];
        for _ in 0..64 {
            seen[PlayerColor::Random.resolve(&mut rng) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
        assert_eq!(PlayerColor::from(Color::Black), PlayerColor::Black);
    }
}
