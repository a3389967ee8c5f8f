use crate::error::ChessError;
use crate::game_state::GameState;
use crate::piece::Color;
use crate::r#move::Move;
use crate::{divide, parallel_count};

use rand::seq::SliceRandom;
use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

const HELP: &str = "\
help                                  this message
new                                   start a new game
position startpos|\"<fen>\" [moves ..]  set up a position, then play the moves
show                                  print the board
fen                                   print the position as FEN
moves                                 list the legal moves
play <move>..                         play moves (a bare move works too)
undo [n]                              take back the last n moves (default 1)
random                                play a random legal move
history                               moves played so far
perft <depth>                         count leaf nodes
divide <depth>                        count leaf nodes below each move
options                               list the options
setoption name <name> value <value>   change an option
quit                                  exit";

pub struct Console {
    game: GameState,
    editor: Editor<()>,
    options: HashMap<String, ConsoleOption>,
}
impl Default for Console {
    fn default() -> Self {
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        editor.set_check_cursor_position(true);
        Console {
            game: GameState::new(),
            editor,
            options: HashMap::from([
                (
                    "Threads".to_string(),
                    ConsoleOption::IntValue {
                        name: "Threads".to_string(),
                        value: 1,
                        default: 1,
                        min: 1,
                        max: num_cpus::get() as i32,
                    },
                ),
                (
                    "ShowBoard".to_string(),
                    ConsoleOption::BoolValue {
                        name: "ShowBoard".to_string(),
                        value: true,
                        default: true,
                    },
                ),
                (
                    "Notation".to_string(),
                    ConsoleOption::StringChoice {
                        name: "Notation".to_string(),
                        value: "algebraic".to_string(),
                        default: "algebraic".to_string(),
                        possible_values: vec!["algebraic".to_string(), "long".to_string()],
                    },
                ),
            ]),
        }
    }
}

impl Console {
    pub fn run(&mut self) {
        println!("{}", self.game);
        while let Ok(line) = self.editor.readline("warden> ") {
            match self.handle_command(&line) {
                Ok(Reply::Quit) => break,
                Ok(Reply::Print(text)) => println!("{}", text),
                Ok(Reply::Done) | Err(CommandError::NoCommand) => (),
                Err(CommandError::MissingArg(arg)) => {
                    eprintln!("Missing an argument: {} {} <- here", line.trim(), arg)
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn handle_command(&mut self, line: &str) -> Result<Reply, CommandError> {
        let args_regex = Self::args_regex();
        let mut args = args_regex.find_iter(line).map(|m| m.as_str());
        let cmd = if let Some(c) = args.next() {
            c
        } else {
            return Err(CommandError::NoCommand);
        };
        log::debug!("console command: {}", line.trim());

        match cmd {
            "help" => return Ok(Reply::Print(HELP.to_string())),
            "new" => self.game = GameState::new(),
            "position" => {
                let game = match args.next() {
                    Some("startpos") => GameState::new(),
                    Some(fen) => GameState::from_fen(&fen.replace('"', ""))?,
                    None => return Err(CommandError::MissingArg(String::from("<startpos | fen>"))),
                };
                self.game = game;
                let moves: Vec<&str> = args.skip_while(|a| *a == "moves").collect();
                return self.play(&moves);
            }
            "show" => return Ok(Reply::Print(self.game.to_string())),
            "fen" => return Ok(Reply::Print(self.game.fen())),
            "moves" => {
                let mut moves: Vec<String> =
                    self.game.legal_moves().iter().map(|m| self.write_move(m)).collect();
                moves.sort();
                return Ok(Reply::Print(moves.join(" ")));
            }
            "play" => {
                let moves: Vec<&str> = args.collect();
                if moves.is_empty() {
                    return Err(CommandError::MissingArg(String::from("<move>")));
                }
                return self.play(&moves);
            }
            "undo" => {
                let count = match args.next() {
                    Some(n) => n
                        .parse::<usize>()
                        .map_err(|_| CommandError::BadCommand(format!("undo {}", n)))?,
                    None => 1,
                };
                for _ in 0..count.min(self.game.history().plies()) {
                    self.game.undo_move();
                }
                return Ok(self.after_move());
            }
            "random" => {
                let moves = self.game.legal_moves();
                let mv = match moves.as_slice().choose(&mut rand::thread_rng()) {
                    Some(mv) => *mv,
                    None => return Ok(Reply::Print(self.game_over_message())),
                };
                self.game.apply_move(mv);
                let reply = self.after_move();
                let played = self.write_move(&mv);
                return Ok(match reply {
                    Reply::Print(text) => Reply::Print(format!("{}\n{}", played, text)),
                    _ => Reply::Print(played),
                });
            }
            "history" => return Ok(Reply::Print(self.history())),
            "perft" | "divide" => {
                let depth = match args.next() {
                    Some(d) => d
                        .parse::<u32>()
                        .map_err(|_| CommandError::BadCommand(format!("{} {}", cmd, d)))?,
                    None => return Err(CommandError::MissingArg(String::from("<depth>"))),
                };
                if cmd == "perft" {
                    let nodes = parallel_count(&self.game, depth, self.threads());
                    return Ok(Reply::Print(format!("{} nodes", nodes)));
                }
                let split = divide(&mut self.game, depth);
                let mut lines: Vec<String> = split
                    .iter()
                    .map(|(mv, n)| format!("{}: {}", self.write_move(mv), n))
                    .collect();
                lines.sort();
                let total: u64 = split.iter().map(|(_, n)| n).sum();
                lines.push(format!("\n{} nodes", total));
                return Ok(Reply::Print(lines.join("\n")));
            }
            "options" => {
                let mut options: Vec<String> =
                    self.options.values().map(|o| format!("option {}", o)).collect();
                options.sort();
                return Ok(Reply::Print(options.join("\n")));
            }
            "setoption" => {
                let option_name = if let Some("name") = args.next() {
                    args.next().unwrap_or("")
                } else {
                    ""
                };
                let option_value = match args.nth(1) {
                    Some(v) => v,
                    None => return Err(CommandError::MissingArg(String::from("<value>"))),
                };
                match self.options.get_mut(option_name) {
                    Some(option) => option.set_value(option_value),
                    None => return Err(CommandError::UnknownOption(option_name.to_string())),
                }
            }
            "quit" => return Ok(Reply::Quit),
            _ => {
                // Anything else is given a chance as a move
                return match self.game.apply_str(cmd) {
                    Ok(_) => Ok(self.after_move()),
                    Err(_) => Err(CommandError::BadCommand(String::from(cmd))),
                };
            }
        }

        Ok(Reply::Done)
    }

    /// Plays the moves in order, stopping at the first one that isn't legal
    fn play(&mut self, moves: &[&str]) -> Result<Reply, CommandError> {
        if moves.is_empty() {
            return Ok(Reply::Done);
        }
        for mv in moves {
            self.game.apply_str(mv)?;
        }
        Ok(self.after_move())
    }

    /// What to tell the user once the position changed
    fn after_move(&mut self) -> Reply {
        // refreshes the checkmate and stalemate flags
        self.game.legal_moves();
        let mut text = String::new();
        if self.bool_option("ShowBoard") {
            text.push_str(&self.game.board().to_string());
        }
        let status = self.game_over_message();
        if !status.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&status);
        }
        if text.is_empty() {
            Reply::Done
        } else {
            Reply::Print(text)
        }
    }

    fn game_over_message(&self) -> String {
        if self.game.is_checkmate() {
            match self.game.side_to_move() {
                Color::White => String::from("checkmate, black wins"),
                Color::Black => String::from("checkmate, white wins"),
            }
        } else if self.game.is_stalemate() {
            String::from("stalemate")
        } else if self.game.in_check() {
            String::from("check")
        } else {
            String::new()
        }
    }

    fn history(&self) -> String {
        let fullmove = self.game.history().entries()[0].snapshot.fullmove_number;
        let black_first = self
            .game
            .history()
            .moves()
            .next()
            .map_or(false, |m| m.moved_piece().color == Color::Black);

        let mut moves: Vec<String> = self.game.moves().map(|m| self.write_move(&m)).collect();
        if black_first {
            moves.insert(0, String::from(".."));
        }
        moves
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", fullmove as usize + i, pair.join(" ")))
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn write_move(&self, mv: &Move) -> String {
        match self.options.get("Notation") {
            Some(ConsoleOption::StringChoice { value, .. }) if value == "long" => mv.to_string(),
            _ => mv.notation(),
        }
    }

    fn threads(&self) -> usize {
        if let Some(ConsoleOption::IntValue { value, .. }) = self.options.get("Threads") {
            *value as usize
        } else {
            1
        }
    }

    fn bool_option(&self, name: &str) -> bool {
        matches!(
            self.options.get(name),
            Some(ConsoleOption::BoolValue { value: true, .. })
        )
    }

    fn args_regex() -> Regex {
        Regex::new(r#"(".*?"|[^"\s]+)"#).unwrap()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Done,
    Print(String),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("missing an argument: {0}")]
    MissingArg(String),
    #[error("no command given")]
    NoCommand,
    #[error("unknown or badly formed command: {0}")]
    BadCommand(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error(transparent)]
    Chess(#[from] ChessError),
}

pub enum ConsoleOption {
    BoolValue {
        name: String,
        value: bool,
        default: bool,
    },
    IntValue {
        name: String,
        value: i32,
        default: i32,
        min: i32,
        max: i32,
    },
    StringChoice {
        name: String,
        value: String,
        default: String,
        possible_values: Vec<String>,
    },
}
impl ConsoleOption {
    pub fn set_value(&mut self, v: &str) {
        match self {
            Self::BoolValue { value, .. } => *value = v.parse::<bool>().unwrap_or(*value),
            Self::IntValue {
                value, min, max, ..
            } => {
                let parsed = v.parse::<i32>().unwrap_or(*value);
                *value = parsed.clamp(*min, *max)
            }
            Self::StringChoice {
                value,
                possible_values,
                ..
            } => {
                if let Some(set_to) = possible_values.iter().find(|x| x.as_str() == v) {
                    *value = set_to.clone();
                }
            }
        }
    }
}
impl Display for ConsoleOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoolValue { name, value, default } => {
                write!(f, "name {} type check default {} value {}", name, default, value)
            }
            Self::IntValue {
                name,
                value,
                default,
                min,
                max,
            } => write!(
                f,
                "name {} type spin default {} min {} max {} value {}",
                name, default, min, max, value
            ),
            Self::StringChoice {
                name,
                value,
                default,
                possible_values,
            } => write!(
                f,
                "name {} type combo default {}{} value {}",
                name,
                default,
                possible_values
                    .iter()
                    .fold(String::new(), |acc, x| format!("{} var {}", acc, x)),
                value
            ),
        }
    }
}
