//! Numclaim -- a number-territory game engine behind a line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! It hosts the game state machine for a UI (or a test harness) that
//! renders the board and relays player input.

use std::io::{self, BufRead, Write};

use numclaim::board::{internal_to_user, user_to_internal, Player, Pos, BOARD_SIZE};
use numclaim::engine::{
    BotAction, ChallengeResult, FailKind, Game, GameConfig, GameMode, Phase,
};
use numclaim::protocol::{parse_command, Command, NewParams};
use numclaim::search::FormulaTable;

/// Runs the main protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut game = Game::new(GameConfig::default());
    let mut formulas: Option<FormulaTable> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => {
                if !line.trim().is_empty() {
                    writeln!(out, "error unknown command").unwrap();
                    out.flush().unwrap();
                }
                continue;
            }
        };

        match cmd {
            Command::New(params) => {
                game = new_game(&params, formulas.clone());
                writeln!(out, "ok new first={}", seat(game.first_player())).unwrap();
            }
            Command::Formulas { path } => match FormulaTable::from_file(&path) {
                Ok(table) => {
                    writeln!(out, "ok formulas {}", table.len()).unwrap();
                    game.attach_formulas(table.clone());
                    formulas = Some(table);
                }
                Err(e) => {
                    writeln!(out, "error {}", e).unwrap();
                }
            },
            Command::Select { from, to } => handle_select(&mut game, from, to, &mut out),
            Command::Submit { expr } => match game.submit_expression(&expr) {
                Ok(result) => write_result(&result, &mut out),
                Err(e) => {
                    writeln!(out, "error {}", e).unwrap();
                }
            },
            Command::Pass => match game.pass_challenge() {
                Ok(_) => {
                    writeln!(out, "ok challenge passed").unwrap();
                }
                Err(e) => {
                    writeln!(out, "error {}", e).unwrap();
                }
            },
            Command::Bot => handle_bot(&mut game, &mut out),
            Command::Tick { seconds } => match game.tick(seconds) {
                Some(result) => write_result(&result, &mut out),
                None => match game.time_remaining() {
                    Some(left) => writeln!(out, "ok time {}", left).unwrap(),
                    None => writeln!(out, "ok time unlimited").unwrap(),
                },
            },
            Command::Show => show(&game, &mut out),
            Command::State => state_line(&game, &mut out),
            Command::Reset => {
                game.reset();
                writeln!(out, "ok new first={}", seat(game.first_player())).unwrap();
            }
            Command::Quit => {
                out.flush().unwrap();
                return;
            }
        }
        out.flush().unwrap();
    }
}

fn new_game(params: &NewParams, formulas: Option<FormulaTable>) -> Game {
    let config = GameConfig {
        mode: if params.bot {
            GameMode::Bot
        } else {
            GameMode::TwoPlayer
        },
        difficulty: params.difficulty,
        time_limit: params.time_limit,
        names: params
            .names
            .clone()
            .unwrap_or_else(|| GameConfig::default().names),
    };
    let mut game = match params.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    };
    if let Some(table) = formulas {
        game.attach_formulas(table);
    }
    game
}

fn handle_select<W: Write>(game: &mut Game, from: (u8, u8), to: (u8, u8), out: &mut W) {
    let (a, b) = match (
        user_to_internal(from.0, from.1),
        user_to_internal(to.0, to.1),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            writeln!(out, "error coordinates are 1..13").unwrap();
            return;
        }
    };
    match game.select_run(a, b) {
        Ok(target) => {
            writeln!(out, "ok target {}", target).unwrap();
        }
        Err(e) => {
            writeln!(out, "error {}", e).unwrap();
        }
    }
}

/// Runs the bot's whole challenge: selection, then submission of the
/// bot's own formula. The thinking pause is the UI's business, not ours.
fn handle_bot<W: Write>(game: &mut Game, out: &mut W) {
    match game.request_bot_move() {
        Ok(BotAction::Selected(mv)) => {
            writeln!(out, "info bot target {} = {}", mv.target, mv.formula).unwrap();
            match game.submit_expression(&mv.formula) {
                Ok(result) => write_result(&result, out),
                Err(e) => {
                    writeln!(out, "error {}", e).unwrap();
                }
            }
        }
        Ok(BotAction::Passed) => {
            writeln!(out, "ok bot passed").unwrap();
        }
        Err(e) => {
            writeln!(out, "error {}", e).unwrap();
        }
    }
}

fn write_result<W: Write>(result: &ChallengeResult, out: &mut W) {
    match result {
        ChallengeResult::Claimed { cells, target } => {
            writeln!(out, "ok claimed {} cells for {}", cells.len(), target).unwrap();
        }
        ChallengeResult::Failed(kind) => {
            let why = match kind {
                FailKind::WrongResult => "wrong result",
                FailKind::NumbersUnavailable => "numbers unavailable",
                FailKind::Timeout => "timeout",
                FailKind::NoAvailableMove => "no available move",
            };
            writeln!(out, "ok challenge failed: {}", why).unwrap();
        }
    }
}

fn seat(player: Player) -> &'static str {
    match player {
        Player::One => "p1",
        Player::Two => "p2",
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Selecting => "selecting",
        Phase::Equation => "equation",
        Phase::Over => "over",
    }
}

/// Prints the board: digits for open cells, `#` for obstacles, `a`/`b`
/// for claimed cells, with the pending selection bracketed.
fn show<W: Write>(game: &Game, out: &mut W) {
    let pending = game.pending_cells().unwrap_or(&[]);
    for row in 0..BOARD_SIZE as u8 {
        let mut line = String::with_capacity(BOARD_SIZE);
        for col in 0..BOARD_SIZE as u8 {
            let pos = Pos::new(row, col);
            let cell = game.board().cell(pos);
            let ch = match (cell.is_obstacle, cell.owner) {
                (true, _) => '#',
                (false, Some(Player::One)) => 'a',
                (false, Some(Player::Two)) => 'b',
                (false, None) => {
                    let digit = (b'0' + cell.value.unwrap_or(0)) as char;
                    if pending.contains(&pos) {
                        line.push('[');
                        line.push(digit);
                        line.push(']');
                        continue;
                    }
                    digit
                }
            };
            line.push(ch);
        }
        writeln!(out, "{}", line).unwrap();
    }
    if let Some(cells) = game.pending_cells() {
        let spots: Vec<String> = cells
            .iter()
            .map(|&p| {
                let (x, y) = internal_to_user(p);
                format!("{},{}", x, y)
            })
            .collect();
        writeln!(out, "info selection {}", spots.join(" ")).unwrap();
    }
    writeln!(out, "info {}", game.status_message()).unwrap();
}

fn state_line<W: Write>(game: &Game, out: &mut W) {
    let scores = game.scores();
    let target = match game.pending_target() {
        Some(t) => t.to_string(),
        None => "-".to_string(),
    };
    let time = match game.time_remaining() {
        Some(left) => left.to_string(),
        None => "off".to_string(),
    };
    let mut line = format!(
        "state phase={} active={} first={} turn={} challenge={} p1={} p2={} target={} time={}",
        phase_name(game.phase()),
        seat(game.active_player()),
        seat(game.first_player()),
        game.turn_count(),
        game.challenge_index(),
        scores[0],
        scores[1],
        target,
        time
    );
    if let Some(outcome) = game.outcome() {
        let winner = match outcome.winner {
            Some(p) => seat(p).to_string(),
            None => "draw".to_string(),
        };
        line.push_str(&format!(" winner={}", winner));
    }
    writeln!(out, "{}", line).unwrap();
}
