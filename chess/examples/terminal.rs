// Command-line application to play against the bot, or with a friend at one terminal

use clap::{Parser, ValueEnum};
use kingfall::{
    board::PrettyStyle, config::PlayerColor, Color, Difficulty, Mode, Move, Piece, Session,
    Settings,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Side {
    White,
    Black,
    Random,
}

#[derive(Copy, Clone, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Parser)]
#[command(name = "terminal", about = "Play chess in the terminal")]
struct Cli {
    /// JSON settings file; command-line flags override it
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Two humans at one board, no bot
    #[arg(long)]
    two_player: bool,
    /// Side for the human player
    #[arg(long, value_enum)]
    color: Option<Side>,
    #[arg(long, value_enum)]
    difficulty: Option<Level>,
    /// Pause before the bot moves, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Seed for the bot
    #[arg(long)]
    seed: Option<u64>,
    /// Draw the board with Unicode chess pieces
    #[arg(long)]
    utf8: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut s = match &self.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if self.two_player {
            s.mode = Mode::TwoPlayer;
        }
        if let Some(side) = self.color {
            s.player_color = match side {
                Side::White => PlayerColor::White,
                Side::Black => PlayerColor::Black,
                Side::Random => PlayerColor::Random,
            };
        }
        if let Some(level) = self.difficulty {
            s.difficulty = match level {
                Level::Easy => Difficulty::Easy,
                Level::Medium => Difficulty::Medium,
                Level::Hard => Difficulty::Hard,
                Level::Expert => Difficulty::Expert,
            };
        }
        if let Some(ms) = self.delay_ms {
            s.bot_delay_ms = ms;
        }
        if self.seed.is_some() {
            s.engine_seed = self.seed;
        }
        s
    }
}

fn captured(session: &Session, color: Color) -> String {
    let captures = session.controller().captures();
    Piece::iter()
        .filter_map(|p| match captures.count(color, p) {
            0 => None,
            n => Some(format!("{}x{}", n, p.name())),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let style = if cli.utf8 {
        PrettyStyle::Utf8
    } else {
        PrettyStyle::Ascii
    };
    let mut session = Session::new(cli.settings());
    let mut stdin = io::stdin().lock();

    loop {
        let game = session.controller();
        println!("{}", game.board().pretty(style, game.turn()));
        for color in [Color::White, Color::Black] {
            let s = captured(&session, color);
            if !s.is_empty() {
                println!("{} lost: {}", color.name(), s);
            }
        }

        let game = session.controller();
        if let Some(outcome) = game.outcome() {
            match game.verdict() {
                Some(verdict) => println!("Game finished: {} ({:?})", outcome, verdict),
                None => println!("Game finished: {}", outcome),
            }
            print!("Play again? [y/N] ");
        } else if game.is_bot_turn() {
            println!("Bot is thinking...");
            session.wait_for_bot(Duration::from_secs(600));
            continue;
        } else {
            print!("{} move (like e2e4, or \"reset\", \"quit\"): ", game.turn().name());
        }
        let _ = io::stdout().flush();

        let mut s = String::new();
        match stdin.read_line(&mut s) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let s = s.trim();

        if session.controller().is_game_over() {
            if s.eq_ignore_ascii_case("y") {
                session.reset();
                println!();
                continue;
            }
            break;
        }
        match s {
            "quit" => break,
            "reset" => {
                session.reset();
                println!();
                continue;
            }
            _ => {}
        }

        let mv = match Move::from_str(s) {
            Ok(mv) => mv,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };
        if !session.select(mv.src()) {
            println!("No piece of yours on {}", mv.src());
        } else if !session.confirm(mv.dst()) {
            println!("Illegal move {}", mv);
        }
        println!();
    }
}
