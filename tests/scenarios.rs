//! Cross-module game scenarios driven through the public library API.
//!
//! These play whole seeded games: run enumeration feeds the state machine,
//! formula tables feed the bot, and submitted expressions go through the
//! real pool check and evaluator.

use std::collections::HashSet;

use numclaim::board::{Player, Pos, BOARD_SIZE};
use numclaim::engine::{
    BotAction, ChallengeResult, Game, GameConfig, GameMode, Phase,
};
use numclaim::expr::{evaluate, matches_target, NUMBER_POOL};
use numclaim::movegen::{find_runs, start_corner};
use numclaim::search::{Difficulty, FormulaTable};

/// A pool-legal formula equal to `target`, covering every 2-digit target.
/// Greedy sums reach 33; above that, `tens * (4+6) + ones` with each digit
/// spelled from the leftover pool numbers.
fn formula_for(target: u32) -> Option<String> {
    let mut pool: Vec<u32> = NUMBER_POOL.iter().map(|&n| u32::from(n)).collect();
    pool.sort_unstable_by(|a, b| b.cmp(a));
    let mut remaining = target;
    let mut parts = Vec::new();
    for n in pool {
        if n <= remaining {
            parts.push(n.to_string());
            remaining -= n;
        }
    }
    if remaining == 0 && !parts.is_empty() {
        return Some(parts.join("+"));
    }

    if !(34..=99).contains(&target) {
        return None;
    }
    let base: Vec<u32> = vec![1, 2, 2, 3, 4, 5, 6];
    let (tens, ones) = (target / 10, target % 10);
    for tens_sum in digit_sums(tens, &base) {
        let mut left = base.clone();
        for n in &tens_sum {
            let at = left.iter().position(|x| x == n).unwrap();
            left.remove(at);
        }
        let tens_expr = tens_sum
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("+");
        if ones == 0 {
            return Some(format!("({})*(4+6)", tens_expr));
        }
        if let Some(ones_sum) = digit_sums(ones, &left).into_iter().next() {
            let ones_expr = ones_sum
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("+");
            return Some(format!("({})*(4+6)+{}", tens_expr, ones_expr));
        }
    }
    None
}

/// Ways to write digit `d` as a sum of one to three numbers drawn from
/// `pool` without replacement.
fn digit_sums(d: u32, pool: &[u32]) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    if pool.contains(&d) {
        out.push(vec![d]);
    }
    for i in 0..pool.len() {
        for j in (i + 1)..pool.len() {
            if pool[i] + pool[j] == d {
                out.push(vec![pool[i], pool[j]]);
            }
            for k in (j + 1)..pool.len() {
                if pool[i] + pool[j] + pool[k] == d {
                    out.push(vec![pool[i], pool[j], pool[k]]);
                }
            }
        }
    }
    out
}

/// A table holding a formula for every 2-digit target the helper can spell.
fn full_table() -> FormulaTable {
    let entries: Vec<(String, String)> = (10..=99)
        .filter_map(|t| Some((t.to_string(), formula_for(t)?)))
        .collect();
    assert!(entries.len() > 80, "the helper should cover most targets");
    FormulaTable::from_entries(entries)
}

/// Takes one human challenge: picks the shortest frontier run whose target
/// has a spellable formula, or passes.
fn play_human_challenge(game: &mut Game) {
    let player = game.active_player();
    let corner = start_corner(player == game.first_player());
    let runs = find_runs(game.board(), game.territory(player), corner);

    let mut pick = None;
    for run in runs.iter().filter(|r| r.len() == 2) {
        if let Some(digits) = game.board().target_digits(run) {
            if let Some(formula) = digits.parse().ok().and_then(formula_for) {
                pick = Some((run.clone(), formula));
                break;
            }
        }
    }

    match pick {
        Some((run, formula)) => {
            game.select_path(&run).unwrap();
            let result = game.submit_expression(&formula).unwrap();
            assert!(matches!(result, ChallengeResult::Claimed { .. }));
        }
        None => {
            game.pass_challenge().unwrap();
        }
    }
}

fn assert_territories_sound(game: &Game) {
    let one: HashSet<Pos> = game.territory(Player::One).iter().copied().collect();
    let two: HashSet<Pos> = game.territory(Player::Two).iter().copied().collect();
    assert_eq!(one.len(), game.scores()[0]);
    assert_eq!(two.len(), game.scores()[1]);
    assert!(one.is_disjoint(&two));
    for &pos in one.iter().chain(&two) {
        let cell = game.board().cell(pos);
        assert!(!cell.is_obstacle);
        assert!(cell.owner.is_some());
    }
}

#[test]
fn seeded_two_player_game_runs_to_completion() {
    let mut game = Game::with_seed(GameConfig::default(), 11);

    let mut challenges = 0;
    while game.phase() != Phase::Over {
        play_human_challenge(&mut game);
        assert_territories_sound(&game);
        challenges += 1;
        assert!(challenges <= 24, "12 turns of 2 challenges is the ceiling");
    }

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.scores, game.scores());
    match outcome.winner {
        Some(Player::One) => assert!(outcome.scores[0] > outcome.scores[1]),
        Some(Player::Two) => assert!(outcome.scores[1] > outcome.scores[0]),
        None => assert_eq!(outcome.scores[0], outcome.scores[1]),
    }
}

#[test]
fn replaying_a_seed_reproduces_the_game() {
    let play = |seed: u64| {
        let mut game = Game::with_seed(GameConfig::default(), seed);
        while game.phase() != Phase::Over {
            play_human_challenge(&mut game);
        }
        (game.scores(), game.outcome().unwrap().winner)
    };
    assert_eq!(play(21), play(21));
}

#[test]
fn bot_game_with_a_full_table_claims_territory() {
    let config = GameConfig {
        mode: GameMode::Bot,
        difficulty: Difficulty::Easy,
        ..GameConfig::default()
    };
    let mut game = Game::with_seed(config, 4);
    game.attach_formulas(full_table());

    let mut bot_claims = 0;
    while game.phase() != Phase::Over {
        if game.active_player() == Player::Two {
            match game.request_bot_move().unwrap() {
                BotAction::Selected(mv) => {
                    // The bot's formula must really hit its target.
                    let value = evaluate(&mv.formula).unwrap();
                    assert!(matches_target(value, mv.target));
                    assert_eq!(game.pending_formula(), Some(mv.formula.as_str()));
                    let result = game.submit_expression(&mv.formula).unwrap();
                    assert!(matches!(result, ChallengeResult::Claimed { .. }));
                    bot_claims += 1;
                }
                BotAction::Passed => {}
            }
        } else {
            game.pass_challenge().unwrap();
        }
        assert_territories_sound(&game);
    }

    // Easy picks 2- and 3-cell runs and the table covers most targets, so
    // a corner opening is always available on the first bot challenge.
    assert!(bot_claims > 0);
    assert_eq!(
        game.scores()[Player::Two.index()],
        game.territory(Player::Two).len()
    );
    let outcome = game.outcome().unwrap();
    if game.scores()[1] > game.scores()[0] {
        assert_eq!(outcome.winner, Some(Player::Two));
    }
}

#[test]
fn bot_runs_stay_inside_the_board_and_off_obstacles() {
    let config = GameConfig {
        mode: GameMode::Bot,
        difficulty: Difficulty::Hard,
        ..GameConfig::default()
    };
    let mut game = Game::with_seed(config, 17);
    game.attach_formulas(full_table());

    while game.phase() != Phase::Over {
        if game.active_player() == Player::Two {
            if let BotAction::Selected(mv) = game.request_bot_move().unwrap() {
                assert!(mv.path.len() >= 2 && mv.path.len() <= 6);
                for &pos in &mv.path {
                    assert!((pos.row as usize) < BOARD_SIZE);
                    assert!((pos.col as usize) < BOARD_SIZE);
                    assert!(!game.board().cell(pos).is_obstacle);
                }
                game.submit_expression(&mv.formula).unwrap();
            }
        } else {
            game.pass_challenge().unwrap();
        }
    }
}

#[test]
fn loaded_formula_table_entries_evaluate_to_their_targets() {
    let json = r#"{
        "results": [
            {"number": "10", "formula": "4+6"},
            {"number": 24, "formula": "factorial(4)"},
            {"number": "26", "formula": "factorial(4)+2"},
            {"number": "66", "formula": "6*(5+6)"}
        ]
    }"#;
    let table = FormulaTable::from_json_str(json).unwrap();
    assert_eq!(table.len(), 4);

    // factorial(x) is stored in evaluator syntax.
    assert_eq!(table.get("24"), Some("(4)!"));

    for target in [10u32, 24, 26, 66] {
        let formula = table.get(&target.to_string()).unwrap();
        let value = evaluate(formula).unwrap();
        assert!(matches_target(value, target), "{} = {}", target, value);
    }
}

#[test]
fn helper_formulas_are_pool_legal_and_correct() {
    for target in 10..=99u32 {
        if let Some(formula) = formula_for(target) {
            numclaim::expr::check_pool(&formula).unwrap();
            let value = evaluate(&formula).unwrap();
            assert!(
                matches_target(value, target),
                "{} gave {} for {}",
                formula,
                value,
                target
            );
        }
    }
}
