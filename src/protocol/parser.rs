//! Command parser for the line protocol.

use crate::search::Difficulty;

/// Options accepted by the `new` command.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParams {
    pub seed: Option<u64>,
    pub bot: bool,
    pub difficulty: Difficulty,
    /// `None` disables the challenge timer.
    pub time_limit: Option<u32>,
    pub names: Option<[String; 2]>,
}

impl Default for NewParams {
    fn default() -> Self {
        NewParams {
            seed: None,
            bot: false,
            difficulty: Difficulty::Normal,
            time_limit: None,
            names: None,
        }
    }
}

/// A parsed client command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start a fresh game: `new [seed=N] [mode=pvp|bot] [difficulty=D] [time=N|off]`.
    New(NewParams),

    /// Load the bot's formula table: `formulas <path>`.
    Formulas { path: String },

    /// Select the run between two cells: `select <x1> <y1> <x2> <y2>`.
    Select { from: (u8, u8), to: (u8, u8) },

    /// Submit an expression for the pending target.
    Submit { expr: String },

    /// Forfeit the current challenge.
    Pass,

    /// Ask the bot to take its challenge.
    Bot,

    /// Advance the challenge clock: `tick [seconds]` (default 1).
    Tick { seconds: u32 },

    /// Print the board and game state.
    Show,

    /// Print a one-line machine-readable state summary.
    State,

    /// Restart the current game in place.
    Reset,

    /// Terminate the process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines and unrecognized or malformed commands.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match tokens[0] {
        "new" => parse_new(&tokens),
        "formulas" => {
            if tokens.len() == 2 {
                Some(Command::Formulas {
                    path: tokens[1].to_string(),
                })
            } else {
                None
            }
        }
        "select" => parse_select(&tokens),
        "submit" => {
            let expr = trimmed.strip_prefix("submit")?.trim();
            if expr.is_empty() {
                None
            } else {
                Some(Command::Submit {
                    expr: expr.to_string(),
                })
            }
        }
        "pass" => Some(Command::Pass),
        "bot" => Some(Command::Bot),
        "tick" => {
            let seconds = match tokens.get(1) {
                Some(s) => s.parse().ok()?,
                None => 1,
            };
            Some(Command::Tick { seconds })
        }
        "show" => Some(Command::Show),
        "state" => Some(Command::State),
        "reset" => Some(Command::Reset),
        "quit" => Some(Command::Quit),
        _ => None,
    }
}

fn parse_new(tokens: &[&str]) -> Option<Command> {
    let mut params = NewParams::default();
    for tok in &tokens[1..] {
        let (key, value) = tok.split_once('=')?;
        match key {
            "seed" => params.seed = Some(value.parse().ok()?),
            "mode" => match value {
                "pvp" => params.bot = false,
                "bot" => params.bot = true,
                _ => return None,
            },
            "difficulty" => params.difficulty = Difficulty::from_name(value)?,
            "time" => {
                params.time_limit = if value == "off" {
                    None
                } else {
                    Some(value.parse().ok()?)
                }
            }
            "p1" => {
                let names = params.names.get_or_insert_with(default_names);
                names[0] = value.to_string();
            }
            "p2" => {
                let names = params.names.get_or_insert_with(default_names);
                names[1] = value.to_string();
            }
            _ => return None,
        }
    }
    Some(Command::New(params))
}

fn default_names() -> [String; 2] {
    ["Player 1".to_string(), "Player 2".to_string()]
}

fn parse_select(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 5 {
        return None;
    }
    let mut coords = [0u8; 4];
    for (slot, tok) in coords.iter_mut().zip(&tokens[1..]) {
        *slot = tok.parse().ok()?;
    }
    Some(Command::Select {
        from: (coords[0], coords[1]),
        to: (coords[2], coords[3]),
    })
}
