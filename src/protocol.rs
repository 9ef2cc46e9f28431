//! Line-oriented text protocol for driving a game from outside.
//!
//! The framing follows GTP: one command per line with an optional numeric
//! id, replies start with `=` on success or `?` on failure, and each reply is
//! followed by a blank line. Blank lines and `#` comments are ignored.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version` - Engine identity
//! - `list_commands`, `known_command <cmd>` - Command discovery
//! - `quit` - End the session
//! - `reset` - Start a new game (high score is kept)
//! - `place <col> <row>` - Place the pending pattern
//! - `tick [n]` - Advance the clear countdown `n` times (default 1)
//! - `pending` - Show the pending pattern, e.g. `01-25-34`
//! - `set_pending <pattern>` - Override the pending pattern
//! - `setpos <col> <row> <pattern>` - Write a pattern onto a tile directly
//! - `probe <col> <row>` - Where each connection of the pending pattern would lead
//! - `empty <col> <row>`, `connections <col> <row>` - Tile queries
//! - `score` - Current and high score
//! - `showboard` - ASCII board
//!
//! ## Example
//!
//! ```ignore
//! use hexloop_rust::game::{Game, GameConfig};
//! use hexloop_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new(Game::new(GameConfig::default()));
//! engine.run()?;
//! ```

use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::debug;

use crate::game::Game;
use crate::hex::Coordinate;
use crate::loops::{Loop, WalkEnd};
use crate::scoring::with_commas;
use crate::tile::TilePattern;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "connections",
    "empty",
    "known_command",
    "list_commands",
    "name",
    "pending",
    "place",
    "probe",
    "protocol_version",
    "quit",
    "reset",
    "score",
    "set_pending",
    "setpos",
    "showboard",
    "tick",
    "version",
];

/// Why a command could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Fewer arguments than the command needs
    MissingArgument,
    /// An argument that should be a number is not one
    InvalidNumber(String),
    /// Coordinate outside the board
    OffBoard(Coordinate),
    /// Not a perfect matching of the six sides
    InvalidPattern(String),
    /// Command name not recognized
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::MissingArgument => write!(f, "missing argument"),
            CommandError::InvalidNumber(s) => write!(f, "invalid number: {s}"),
            CommandError::OffBoard(c) => write!(f, "coordinate {c} is off the board"),
            CommandError::InvalidPattern(s) => write!(f, "invalid pattern: {s}"),
            CommandError::Unknown(s) => write!(f, "unknown command: {s}"),
        }
    }
}

impl std::error::Error for CommandError {}

type Reply = Result<String, CommandError>;

/// Protocol session wrapping one game.
pub struct ProtocolEngine {
    game: Game,
}

impl ProtocolEngine {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!(%command, ?args, "command");

            let response = self.execute(&command, args);
            let (prefix, message) = match response {
                Ok(message) => ('=', message),
                Err(e) => ('?', e.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n").context("writing reply")?;
            output.flush().context("flushing reply")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_number<T: std::str::FromStr>(arg: Option<&&str>) -> Result<T, CommandError> {
        let arg = arg.ok_or(CommandError::MissingArgument)?;
        arg.parse()
            .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
    }

    fn parse_coord(&self, args: &[&str]) -> Result<Coordinate, CommandError> {
        let col = Self::parse_number(args.first())?;
        let row = Self::parse_number(args.get(1))?;
        let coord = Coordinate::new(col, row);
        if !self.game.contains(coord) {
            return Err(CommandError::OffBoard(coord));
        }
        Ok(coord)
    }

    fn parse_pattern(arg: Option<&&str>) -> Result<TilePattern, CommandError> {
        let arg = arg.ok_or(CommandError::MissingArgument)?;
        TilePattern::parse(arg).ok_or_else(|| CommandError::InvalidPattern(arg.to_string()))
    }

    /// Execute a command and return the reply text.
    fn execute(&mut self, command: &str, args: &[&str]) -> Reply {
        match command {
            "name" => Ok("hexloop-rust".to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().ok_or(CommandError::MissingArgument)?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "reset" => {
                self.game.reset();
                Ok(String::new())
            }

            "place" => {
                let coord = self.parse_coord(args)?;
                let result = self.game.place(coord);
                if !result.accepted {
                    return Ok("rejected".to_string());
                }
                Ok(format!(
                    "accepted loops={} points={} score={}",
                    format_loops(&result.closed_loops),
                    result.points_awarded,
                    self.game.score()
                ))
            }

            "tick" => {
                let n: u32 = if args.is_empty() {
                    1
                } else {
                    Self::parse_number(args.first())?
                };
                let mut cleared = Vec::new();
                let mut bonus = false;
                for _ in 0..n {
                    let t = self.game.tick();
                    cleared.extend(t.cleared_loops);
                    bonus |= t.board_clear_bonus_awarded;
                    if !self.game.is_resolving() {
                        break;
                    }
                }
                Ok(format!("cleared={} bonus={bonus}", format_loops(&cleared)))
            }

            "pending" => Ok(self.game.pending_pattern().to_string()),

            "set_pending" => {
                let pattern = Self::parse_pattern(args.first())?;
                self.game.set_pending(pattern);
                Ok(String::new())
            }

            "setpos" => {
                let coord = self.parse_coord(args)?;
                let pattern = Self::parse_pattern(args.get(2))?;
                if !self.game.arrange(coord, pattern) {
                    return Ok("rejected".to_string());
                }
                Ok(String::new())
            }

            "probe" => {
                let coord = self.parse_coord(args)?;
                let lines: Vec<String> = self
                    .game
                    .probe(coord)
                    .iter()
                    .map(|pr| {
                        format!(
                            "{} {} {} len={}",
                            pr.connection,
                            end_name(pr.ends[0]),
                            end_name(pr.ends[1]),
                            pr.chain.len()
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            }

            "empty" => {
                let coord = self.parse_coord(args)?;
                Ok(self.game.is_empty(coord).to_string())
            }

            "connections" => {
                let coord = self.parse_coord(args)?;
                let conns: Vec<String> = self
                    .game
                    .connections_at(coord)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                Ok(conns.join("-"))
            }

            "score" => Ok(format!(
                "score={} high={}",
                with_commas(self.game.score()),
                with_commas(self.game.high_score())
            )),

            "showboard" => Ok(format!("\n{}", self.game.grid())),

            _ => Err(CommandError::Unknown(command.to_string())),
        }
    }
}

/// Loop lengths as a comma list, `-` when there are none.
fn format_loops(loops: &[Loop]) -> String {
    if loops.is_empty() {
        return "-".to_string();
    }
    loops
        .iter()
        .map(|l| l.len().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn end_name(end: WalkEnd) -> &'static str {
    match end {
        WalkEnd::Closed => "closed",
        WalkEnd::TouchesEdge => "edge",
        WalkEnd::TouchesEmpty => "empty",
        WalkEnd::CapExceeded => "cap",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    fn engine() -> ProtocolEngine {
        ProtocolEngine::new(Game::new(GameConfig {
            clear_delay: 2,
            ..GameConfig::seeded(9)
        }))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut e = engine();
        assert_eq!(e.execute("name", &[]), Ok("hexloop-rust".to_string()));
    }

    #[test]
    fn test_known_command() {
        let mut e = engine();
        assert_eq!(e.execute("known_command", &["place"]), Ok("true".to_string()));
        assert_eq!(e.execute("known_command", &["genmove"]), Ok("false".to_string()));
        assert_eq!(
            e.execute("known_command", &[]),
            Err(CommandError::MissingArgument)
        );
    }

    #[test]
    fn test_place_and_reject() {
        let mut e = engine();
        let reply = e.execute("place", &["3", "2"]).unwrap();
        assert!(reply.starts_with("accepted loops=-"), "{reply}");
        assert_eq!(e.execute("place", &["3", "2"]), Ok("rejected".to_string()));
        assert_eq!(e.execute("empty", &["3", "2"]), Ok("false".to_string()));
    }

    #[test]
    fn test_bad_arguments() {
        let mut e = engine();
        assert_eq!(
            e.execute("place", &["x", "2"]),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            e.execute("place", &["99", "0"]),
            Err(CommandError::OffBoard(Coordinate::new(99, 0)))
        );
        assert_eq!(
            e.execute("set_pending", &["01-12-34"]),
            Err(CommandError::InvalidPattern("01-12-34".to_string()))
        );
        assert!(matches!(
            e.execute("genmove", &[]),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_triangle_session() {
        let mut e = engine();
        e.execute("setpos", &["1", "0", "05-12-34"]).unwrap();
        e.execute("setpos", &["2", "0", "01-25-34"]).unwrap();
        e.execute("set_pending", &["03-12-45"]).unwrap();
        assert_eq!(e.execute("pending", &[]), Ok("03-12-45".to_string()));

        assert_eq!(
            e.execute("place", &["0", "0"]),
            Ok("accepted loops=3 points=6 score=6".to_string())
        );
        assert_eq!(
            e.execute("tick", &["2"]),
            Ok("cleared=3 bonus=true".to_string())
        );
        assert_eq!(
            e.execute("score", &[]),
            Ok("score=5,006 high=5,006".to_string())
        );
    }

    #[test]
    fn test_serve_framing() {
        let mut e = engine();
        let input = b"# comment\n\n1 name\nbogus\n2 quit\nname\n";
        let mut out = Vec::new();
        e.serve(&input[..], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "=1 hexloop-rust\n\n? unknown command: bogus\n\n=2 \n\n"
        );
    }

    #[test]
    fn test_tick_stops_once_idle() {
        let mut e = engine();
        assert_eq!(
            e.execute("tick", &["4000000000"]),
            Ok("cleared=- bonus=false".to_string())
        );

        e.execute("setpos", &["1", "0", "05-12-34"]).unwrap();
        e.execute("setpos", &["2", "0", "01-25-34"]).unwrap();
        e.execute("set_pending", &["03-12-45"]).unwrap();
        e.execute("place", &["0", "0"]).unwrap();
        assert_eq!(
            e.execute("tick", &["4000000000"]),
            Ok("cleared=3 bonus=true".to_string())
        );
        assert!(!e.game().is_resolving());
    }

    #[test]
    fn test_probe_and_setpos_on_busy_tiles() {
        let mut e = engine();
        e.execute("setpos", &["4", "2", "01-23-45"]).unwrap();
        e.execute("set_pending", &["03-14-25"]).unwrap();
        assert_eq!(e.execute("probe", &["4", "2"]), Ok(String::new()));

        e.execute("setpos", &["1", "0", "05-12-34"]).unwrap();
        e.execute("setpos", &["2", "0", "01-25-34"]).unwrap();
        e.execute("set_pending", &["03-12-45"]).unwrap();
        e.execute("place", &["0", "0"]).unwrap();
        assert_eq!(
            e.execute("setpos", &["1", "0", "01-23-45"]),
            Ok("rejected".to_string())
        );
    }
}
