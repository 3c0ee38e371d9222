//! Game state machine.
//!
//! Owns the board, both territories, the challenge/turn counters, and the
//! per-challenge countdown. Each turn is exactly two challenges: a
//! selection followed by an expression submission. Wrong results, pool
//! shortfalls, timeouts, and forfeits consume the challenge; invalid
//! selections and malformed expressions are retry-in-place errors that
//! leave the state untouched.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::board::{Board, Player, Pos};
use crate::expr::{check_pool, evaluate, matches_target, ExprError};
use crate::movegen::{check_run, start_corner};
use crate::search::{find_best_move, CandidateMove, Difficulty, FormulaTable};

/// Number of player turns before the game ends.
pub const TURN_LIMIT: u32 = 12;

/// Challenges per turn.
pub const CHALLENGES_PER_TURN: u8 = 2;

/// Where the state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Selecting,
    Equation,
    Over,
}

/// Who the second seat is played by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    TwoPlayer,
    Bot,
}

/// Game setup options.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Seconds per challenge; `None` disables the timeout rule.
    pub time_limit: Option<u32>,
    pub names: [String; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::TwoPlayer,
            difficulty: Difficulty::Normal,
            time_limit: None,
            names: ["Player 1".to_string(), "Player 2".to_string()],
        }
    }
}

/// Recoverable, user-visible errors. None of these advance the challenge;
/// the player retries in place.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(#[from] ExprError),

    #[error("the game is over")]
    GameOver,

    #[error("not in the {0} phase")]
    WrongPhase(&'static str),

    #[error("it is the bot's turn")]
    BotTurn,

    #[error("it is not the bot's turn")]
    NotBotTurn,
}

/// Why a consumed challenge did not claim cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailKind {
    WrongResult,
    /// The expression needed more instances of a number than the pool has.
    NumbersUnavailable,
    Timeout,
    NoAvailableMove,
}

/// The outcome of a consumed challenge.
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeResult {
    Claimed { cells: Vec<Pos>, target: u32 },
    Failed(FailKind),
}

/// What a bot-move request did.
#[derive(Debug, Clone, PartialEq)]
pub enum BotAction {
    /// The bot selected a run; the game is now in the equation phase with
    /// the bot's formula pending.
    Selected(CandidateMove),
    /// No legal run had a known formula; the challenge was forfeited.
    Passed,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TurnLimit,
    BoardFull,
}

/// Final result, recorded once the game reaches `Phase::Over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    /// `None` is a draw.
    pub winner: Option<Player>,
    pub scores: [usize; 2],
    pub reason: EndReason,
}

/// The selection a challenge is currently working against.
#[derive(Debug, Clone)]
struct Pending {
    cells: Vec<Pos>,
    target: u32,
    /// Set for bot moves: the formula the bot will submit.
    formula: Option<String>,
}

/// A full game in progress.
pub struct Game {
    config: GameConfig,
    board: Board,
    rng: SmallRng,
    first_player: Player,
    active_player: Player,
    turn_count: u32,
    challenge_index: u8,
    phase: Phase,
    claimed: [Vec<Pos>; 2],
    pending: Option<Pending>,
    timer: u32,
    message: String,
    formulas: Option<FormulaTable>,
    outcome: Option<GameOutcome>,
}

impl Game {
    /// Starts a game with an entropy-seeded RNG.
    pub fn new(config: GameConfig) -> Self {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    /// Starts a deterministic game: board fill, the first-player coin
    /// flip, and every bot draw follow from the seed.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: SmallRng) -> Self {
        let board = Board::generate(&mut rng);
        let first_player = if rng.gen_bool(0.5) {
            Player::One
        } else {
            Player::Two
        };
        let timer = config.time_limit.unwrap_or(0);
        let mut game = Game {
            config,
            board,
            rng,
            first_player,
            active_player: first_player,
            turn_count: 0,
            challenge_index: 1,
            phase: Phase::Selecting,
            claimed: [Vec::new(), Vec::new()],
            pending: None,
            timer,
            message: String::new(),
            formulas: None,
            outcome: None,
        };
        game.prompt_selecting();
        game
    }

    /// Supplies the bot's formula table. Without one the bot has no moves
    /// and forfeits every challenge.
    pub fn attach_formulas(&mut self, table: FormulaTable) {
        self.formulas = Some(table);
    }

    /// Reinitializes the whole game as one unit: fresh board, fresh coin
    /// flip, empty territories, counters zeroed. The formula table and
    /// config survive the reset.
    pub fn reset(&mut self) {
        self.board = Board::generate(&mut self.rng);
        self.first_player = if self.rng.gen_bool(0.5) {
            Player::One
        } else {
            Player::Two
        };
        self.active_player = self.first_player;
        self.turn_count = 0;
        self.challenge_index = 1;
        self.phase = Phase::Selecting;
        self.claimed = [Vec::new(), Vec::new()];
        self.pending = None;
        self.timer = self.config.time_limit.unwrap_or(0);
        self.outcome = None;
        self.prompt_selecting();
    }

    // --- Selection ---

    /// Selects the straight run between two endpoint cells. The run is
    /// traversed from `a`, so `a` must satisfy the root rule.
    pub fn select_run(&mut self, a: Pos, b: Pos) -> Result<u32, GameError> {
        let mut path = self.board.cells_in_straight_path(a, b);
        if path.is_empty() {
            return Err(GameError::InvalidSelection(
                "cells must share a row or a column".to_string(),
            ));
        }
        if path[0] != a {
            path.reverse();
        }
        self.select_path(&path)
    }

    /// Selects an explicit run. The first cell of `path` is the root and
    /// must be adjacent to the player's territory (or be the player's
    /// start corner on their first claim).
    ///
    /// On success the target number is computed from the run's digits in
    /// (row, col)-sorted order and the game moves to the equation phase.
    /// On error nothing changes and the player retries.
    pub fn select_path(&mut self, path: &[Pos]) -> Result<u32, GameError> {
        match self.phase {
            Phase::Selecting => {}
            Phase::Over => return Err(GameError::GameOver),
            Phase::Equation => return Err(GameError::WrongPhase("selecting")),
        }
        if self.is_bot_turn() {
            return Err(GameError::BotTurn);
        }
        self.validate_selection(path)?;

        // Straightness was validated, so every cell carries a digit.
        let digits = self
            .board
            .target_digits(path)
            .ok_or_else(|| GameError::InvalidSelection("path crosses an obstacle".to_string()))?;
        let target: u32 = digits
            .parse()
            .map_err(|_| GameError::InvalidSelection("path has no digits".to_string()))?;

        self.pending = Some(Pending {
            cells: path.to_vec(),
            target,
            formula: None,
        });
        self.phase = Phase::Equation;
        self.reset_timer();
        self.message = format!(
            "{}, target {}: enter an expression.",
            self.active_name(),
            target
        );
        Ok(target)
    }

    fn validate_selection(&self, path: &[Pos]) -> Result<(), GameError> {
        let owned = &self.claimed[self.active_player.index()];
        let corner = start_corner(self.active_player == self.first_player);
        check_run(&self.board, owned, corner, path)
            .map_err(|v| GameError::InvalidSelection(v.to_string()))
    }

    // --- Submission ---

    /// Submits an expression for the pending target.
    ///
    /// Pool feasibility is checked before evaluation; a shortfall consumes
    /// the challenge like a wrong result. Parse and evaluation errors are
    /// retry-in-place.
    pub fn submit_expression(&mut self, expr: &str) -> Result<ChallengeResult, GameError> {
        match self.phase {
            Phase::Equation => {}
            Phase::Over => return Err(GameError::GameOver),
            Phase::Selecting => return Err(GameError::WrongPhase("equation")),
        }
        let pending = match self.pending.clone() {
            Some(p) => p,
            // Equation phase always has a pending selection.
            None => return Err(GameError::WrongPhase("equation")),
        };
        let target = pending.target;

        if let Err(e) = check_pool(expr) {
            self.message = format!("{} missed: {}.", self.active_name(), e);
            self.advance_challenge();
            return Ok(ChallengeResult::Failed(FailKind::NumbersUnavailable));
        }
        let value = match evaluate(expr) {
            Ok(v) => v,
            Err(e) => {
                self.message = format!("That expression is not valid: {}.", e);
                return Err(e.into());
            }
        };

        if matches_target(value, target) {
            self.pending = None;
            self.board.claim(&pending.cells, self.active_player);
            self.claimed[self.active_player.index()].extend_from_slice(&pending.cells);
            self.message = format!(
                "{} claimed {} cells for target {}.",
                self.active_name(),
                pending.cells.len(),
                target
            );
            self.advance_challenge();
            Ok(ChallengeResult::Claimed {
                cells: pending.cells,
                target,
            })
        } else {
            self.message = format!(
                "{} missed: the expression equals {}, not {}.",
                self.active_name(),
                value,
                target
            );
            self.advance_challenge();
            Ok(ChallengeResult::Failed(FailKind::WrongResult))
        }
    }

    /// Forfeits the current challenge (no legal run, or the player gives
    /// up). Consumes the challenge like a failed submission.
    pub fn pass_challenge(&mut self) -> Result<ChallengeResult, GameError> {
        match self.phase {
            Phase::Selecting | Phase::Equation => {}
            Phase::Over => return Err(GameError::GameOver),
        }
        self.message = format!("{} passed the challenge.", self.active_name());
        self.advance_challenge();
        Ok(ChallengeResult::Failed(FailKind::NoAvailableMove))
    }

    // --- Clock ---

    /// Advances the challenge clock by `delta` seconds.
    ///
    /// Fires the timeout rule when a time limit is configured and the
    /// countdown reaches zero in the selecting or equation phase; the
    /// timeout consumes the challenge exactly like a failed submission.
    /// No-op when the limit is unlimited or the game is over.
    pub fn tick(&mut self, delta: u32) -> Option<ChallengeResult> {
        if self.config.time_limit.is_none() || delta == 0 {
            return None;
        }
        match self.phase {
            Phase::Selecting | Phase::Equation => {}
            Phase::Over => return None,
        }
        self.timer = self.timer.saturating_sub(delta);
        if self.timer > 0 {
            return None;
        }
        self.message = format!("{} ran out of time.", self.active_name());
        self.advance_challenge();
        Some(ChallengeResult::Failed(FailKind::Timeout))
    }

    // --- Bot ---

    /// Runs the bot search for the bot's current challenge.
    ///
    /// On a hit, the bot's run is selected and its formula stored as the
    /// pending submission; the host then submits it (after whatever
    /// thinking pause it wants to show). A missing or unhelpful formula
    /// table is never an error: the bot just forfeits the challenge.
    pub fn request_bot_move(&mut self) -> Result<BotAction, GameError> {
        match self.phase {
            Phase::Selecting => {}
            Phase::Over => return Err(GameError::GameOver),
            Phase::Equation => return Err(GameError::WrongPhase("selecting")),
        }
        if !self.is_bot_turn() {
            return Err(GameError::NotBotTurn);
        }

        let bot_seat = Player::Two;
        let best = match &self.formulas {
            Some(table) => find_best_move(
                &self.board,
                &self.claimed[bot_seat.index()],
                table,
                self.config.difficulty,
                self.first_player == bot_seat,
                &mut self.rng,
            ),
            None => None,
        };

        match best {
            Some(mv) => {
                self.pending = Some(Pending {
                    cells: mv.path.clone(),
                    target: mv.target,
                    formula: Some(mv.formula.clone()),
                });
                self.phase = Phase::Equation;
                self.reset_timer();
                self.message = format!("{} = {}", mv.target, mv.formula);
                Ok(BotAction::Selected(mv))
            }
            None => {
                self.message = format!(
                    "{} has no available move and forfeits the challenge.",
                    self.active_name()
                );
                self.advance_challenge();
                Ok(BotAction::Passed)
            }
        }
    }

    // --- Challenge and turn bookkeeping ---

    fn advance_challenge(&mut self) {
        self.pending = None;
        if self.challenge_index < CHALLENGES_PER_TURN {
            self.challenge_index += 1;
            self.phase = Phase::Selecting;
            self.reset_timer();
            self.prompt_selecting();
        } else {
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        let scores = self.scores();
        let turn_limit_reached = self.turn_count + 1 >= TURN_LIMIT;
        let board_full = self.board.is_full();

        if turn_limit_reached || board_full {
            let reason = if turn_limit_reached {
                EndReason::TurnLimit
            } else {
                EndReason::BoardFull
            };
            let winner = match scores[0].cmp(&scores[1]) {
                std::cmp::Ordering::Greater => Some(Player::One),
                std::cmp::Ordering::Less => Some(Player::Two),
                std::cmp::Ordering::Equal => None,
            };
            self.outcome = Some(GameOutcome {
                winner,
                scores,
                reason,
            });
            self.phase = Phase::Over;
            let verdict = match winner {
                Some(p) => format!("{} wins!", self.name_of(p)),
                None => "It's a draw!".to_string(),
            };
            let why = match reason {
                EndReason::TurnLimit => "turn limit reached",
                EndReason::BoardFull => "board is full",
            };
            self.message = format!(
                "Game over ({}). {}: {} cells, {}: {} cells. {}",
                why, self.config.names[0], scores[0], self.config.names[1], scores[1], verdict
            );
            return;
        }

        self.turn_count += 1;
        self.active_player = self.active_player.opponent();
        self.challenge_index = 1;
        self.phase = Phase::Selecting;
        self.reset_timer();
        self.prompt_selecting();
    }

    fn reset_timer(&mut self) {
        self.timer = self.config.time_limit.unwrap_or(0);
    }

    fn prompt_selecting(&mut self) {
        self.message = format!(
            "{}, challenge {}: select a run.",
            self.active_name(),
            self.challenge_index
        );
    }

    fn is_bot_turn(&self) -> bool {
        self.config.mode == GameMode::Bot && self.active_player == Player::Two
    }

    // --- Read-only snapshot ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn first_player(&self) -> Player {
        self.first_player
    }

    /// Completed turns, 0-based while the game runs.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Which challenge of the turn is in progress (1 or 2).
    pub fn challenge_index(&self) -> u8 {
        self.challenge_index
    }

    /// Claimed-cell counts, player one first.
    pub fn scores(&self) -> [usize; 2] {
        [self.claimed[0].len(), self.claimed[1].len()]
    }

    /// The cells a player has claimed, in claim order.
    pub fn territory(&self, player: Player) -> &[Pos] {
        &self.claimed[player.index()]
    }

    /// The pending target number, when a run is selected.
    pub fn pending_target(&self) -> Option<u32> {
        self.pending.as_ref().map(|p| p.target)
    }

    /// The pending run's cells.
    pub fn pending_cells(&self) -> Option<&[Pos]> {
        self.pending.as_ref().map(|p| p.cells.as_slice())
    }

    /// The bot's queued formula, when the pending selection is the bot's.
    pub fn pending_formula(&self) -> Option<&str> {
        self.pending.as_ref().and_then(|p| p.formula.as_deref())
    }

    /// Seconds left on the challenge clock; `None` when unlimited.
    pub fn time_remaining(&self) -> Option<u32> {
        self.config.time_limit.map(|_| self.timer)
    }

    /// The human-readable line describing the last transition.
    pub fn status_message(&self) -> &str {
        &self.message
    }

    /// The recorded result once the game is over.
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn name_of(&self, player: Player) -> &str {
        &self.config.names[player.index()]
    }

    fn active_name(&self) -> String {
        let name = self.name_of(self.active_player);
        if self.is_bot_turn() {
            format!("{} (bot)", name)
        } else {
            name.to_string()
        }
    }
}
