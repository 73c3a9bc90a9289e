//! Line-oriented text protocol for driving a game from another program.
//!
//! Each request is one line, optionally prefixed with a numeric id. Each
//! response is `=[id] text` on success or `?[id] message` on failure,
//! followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `clear_board` - Start a new game
//! - `setup <first> <second> <to-move>` - Start from a normal-play position;
//!   fields are comma separated, `-` for none
//! - `select <field>` - Feed one clicked field to the game
//! - `moves` - Fields the next selection may target
//! - `showboard` - Draw the board
//! - `status` - Side to move, phase, owed captures and winner
//! - `genmove` - Let the configured automated player move for the side to move
//! - `algorithm <min-max|alpha-beta|random>`, `heuristic <kind>`, `depth <n>`
//!
//! ## Example
//!
//! ```
//! use mill_rust::protocol::ProtocolEngine;
//!
//! let mut engine = ProtocolEngine::new();
//! let mut output = Vec::new();
//! engine.run("select D2\nquit\n".as_bytes(), &mut output).unwrap();
//! assert!(String::from_utf8(output).unwrap().starts_with("\n= \n"));
//! ```

use std::io::{self, BufRead, Write};

use clap::ValueEnum;

use crate::board::{Board, Player, Pos, field_name, parse_field};
use crate::constants::{FIELD_COUNT, MAX_SEARCH_DEPTH, PLAYER_PAWNS};
use crate::engine::GameEngine;
use crate::heuristic::HeuristicKind;
use crate::player::{AutomatedPlayer, PlayerConfig, Strategy};
use crate::state::GameState;

const KNOWN_COMMANDS: &[&str] = &[
    "algorithm",
    "clear_board",
    "depth",
    "genmove",
    "heuristic",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "quit",
    "select",
    "setup",
    "showboard",
    "status",
    "version",
];

pub struct ProtocolEngine {
    game: GameEngine,
    strategy: Strategy,
    heuristic: HeuristicKind,
    depth: usize,
    seed: u64,
    /// Moves generated so far, mixed into the random seed.
    generated: u64,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    pub fn new() -> Self {
        let defaults = PlayerConfig::new(Player::First);
        Self {
            game: GameEngine::new(),
            strategy: defaults.strategy,
            heuristic: defaults.heuristic,
            depth: defaults.depth,
            seed: defaults.seed,
            generated: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn game(&self) -> &GameEngine {
        &self.game
    }

    /// Serve requests from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

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

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "\n{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric request id off the front of the line.
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

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "clear_board" => {
                self.game = GameEngine::new();
                (true, String::new())
            }

            "setup" => match Self::parse_setup(args) {
                Ok(state) => {
                    self.game = GameEngine::from_state(state);
                    (true, String::new())
                }
                Err(msg) => (false, msg),
            },

            "select" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Some(field) = parse_field(arg) else {
                    return (false, format!("invalid field: {arg}"));
                };
                match self.game.try_select(field) {
                    Ok(()) => (true, String::new()),
                    Err(err) => (false, err.to_string()),
                }
            }

            "moves" => {
                let names: Vec<&str> = self
                    .game
                    .current_possible_move_indices()
                    .into_iter()
                    .map(field_name)
                    .collect();
                (true, names.join(" "))
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "status" => (true, self.status()),

            "genmove" => self.genmove(),

            "algorithm" => match args.first().map(|a| Strategy::from_str(a, true)) {
                Some(Ok(strategy)) => {
                    self.strategy = strategy;
                    (true, String::new())
                }
                Some(Err(_)) => (false, format!("unknown algorithm: {}", args[0])),
                None => (false, "missing argument".to_string()),
            },

            "heuristic" => match args.first().map(|a| HeuristicKind::from_str(a, true)) {
                Some(Ok(kind)) => {
                    self.heuristic = kind;
                    (true, String::new())
                }
                Some(Err(_)) => (false, format!("unknown heuristic: {}", args[0])),
                None => (false, "missing argument".to_string()),
            },

            "depth" => match args.first().map(|a| a.parse::<usize>()) {
                Some(Ok(depth)) if (1..=MAX_SEARCH_DEPTH).contains(&depth) => {
                    self.depth = depth;
                    (true, String::new())
                }
                Some(_) => (
                    false,
                    format!("depth must be between 1 and {MAX_SEARCH_DEPTH}"),
                ),
                None => (false, "missing argument".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn status(&self) -> String {
        let winner = self.game.winner().map_or("-", Player::name);
        format!(
            "to_move={} phase={:?} remove={} winner={}",
            self.game.current_player(),
            self.game.phase(),
            self.game.pawns_to_remove(),
            winner
        )
    }

    fn genmove(&mut self) -> (bool, String) {
        if self.game.is_finished() {
            return (false, "game is over".to_string());
        }
        let mover = self.game.current_player();
        let config = PlayerConfig {
            strategy: self.strategy,
            heuristic: self.heuristic,
            depth: self.depth,
            player: mover,
            seed: self.seed.wrapping_add(self.generated),
        };
        self.generated += 1;

        let before = *self.game.board();
        match AutomatedPlayer::new(config).make_move(&mut self.game) {
            Ok(()) => (true, describe_turn(&before, self.game.board(), mover)),
            Err(err) => (false, err.to_string()),
        }
    }

    fn parse_setup(args: &[&str]) -> Result<GameState, String> {
        let [first, second, to_move] = args else {
            return Err("expected: setup <first> <second> <to-move>".to_string());
        };
        let first = parse_fields(first)?;
        let second = parse_fields(second)?;
        if first.iter().any(|pos| second.contains(pos)) {
            return Err("a field cannot hold two pawns".to_string());
        }
        if first.len() > PLAYER_PAWNS || second.len() > PLAYER_PAWNS {
            return Err(format!("at most {PLAYER_PAWNS} pawns per side"));
        }
        let to_move = parse_player(to_move).ok_or_else(|| format!("invalid player: {to_move}"))?;
        Ok(GameState::from_board(
            Board::with_pawns(&first, &second),
            to_move,
        ))
    }
}

fn parse_fields(arg: &str) -> Result<Vec<Pos>, String> {
    if arg == "-" {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    for name in arg.split(',') {
        let pos = parse_field(name).ok_or_else(|| format!("invalid field: {name}"))?;
        if fields.contains(&pos) {
            return Err(format!("duplicate field: {name}"));
        }
        fields.push(pos);
    }
    Ok(fields)
}

fn parse_player(arg: &str) -> Option<Player> {
    match arg.to_lowercase().as_str() {
        "first" | "x" => Some(Player::First),
        "second" | "o" => Some(Player::Second),
        _ => None,
    }
}

/// Text form of a completed turn: `D1` for a placement, `A1-D1` for a move,
/// followed by ` xG7` for each captured pawn.
pub fn describe_turn(before: &Board, after: &Board, mover: Player) -> String {
    let mut from = None;
    let mut to = None;
    let mut captured = Vec::new();
    for pos in 0..FIELD_COUNT {
        match (before.get(pos), after.get(pos)) {
            (None, Some(p)) if p == mover => to = Some(pos),
            (Some(p), None) if p == mover => from = Some(pos),
            (Some(_), None) => captured.push(pos),
            _ => {}
        }
    }

    let mut text = match (from, to) {
        (Some(from), Some(to)) => format!("{}-{}", field_name(from), field_name(to)),
        (None, Some(to)) => field_name(to).to_string(),
        _ => String::new(),
    };
    for pos in captured {
        text.push_str(" x");
        text.push_str(field_name(pos));
    }
    text
}
