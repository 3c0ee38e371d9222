//! Candidate enumeration and difficulty-weighted selection.

use rand::Rng;

use crate::board::{Board, Pos};
use crate::movegen::{find_runs, start_corner, Run};
use crate::search::formulas::FormulaTable;

/// Bot difficulty. Difficulty biases which run length the bot attempts,
/// not its success rate: longer runs claim more cells per success, and
/// the formula is supplied by the table either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Eligible run lengths and their selection weights.
    pub fn length_weights(self) -> &'static [(usize, f64)] {
        match self {
            Difficulty::Easy => &[(2, 0.7), (3, 0.3)],
            Difficulty::Normal => &[(3, 0.6), (4, 0.4)],
            Difficulty::Hard => &[(4, 0.2), (5, 0.5), (6, 0.3)],
        }
    }

    /// Parses a difficulty name, as used by config and the protocol.
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

/// A move the bot could play: a run, its target, and a formula that the
/// evaluator accepts for that target. Produced and consumed within one
/// bot decision.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub path: Run,
    pub target: u32,
    pub formula: String,
}

/// Draws an index from normalized cumulative probabilities.
///
/// `weights` need not sum to one; they are renormalized here. When
/// floating rounding leaves the uniform draw above every cumulative
/// threshold, the last index wins.
pub fn weighted_sample(weights: &[f64], rng: &mut impl Rng) -> usize {
    debug_assert!(!weights.is_empty());
    let total: f64 = weights.iter().sum();
    let draw: f64 = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w / total;
        if draw < cumulative {
            return i;
        }
    }
    weights.len() - 1
}

/// Picks one candidate: bucket by run length, restrict to the lengths the
/// difficulty plays, renormalize the remaining weights, draw a length,
/// then pick uniformly within that length's bucket.
pub fn select_candidate(
    candidates: Vec<CandidateMove>,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Option<CandidateMove> {
    let mut buckets: Vec<(f64, Vec<CandidateMove>)> = difficulty
        .length_weights()
        .iter()
        .map(|&(_, w)| (w, Vec::new()))
        .collect();
    let lengths: Vec<usize> = difficulty.length_weights().iter().map(|&(l, _)| l).collect();

    for candidate in candidates {
        if let Some(i) = lengths.iter().position(|&l| l == candidate.path.len()) {
            buckets[i].1.push(candidate);
        }
    }

    let populated: Vec<(f64, Vec<CandidateMove>)> = buckets
        .into_iter()
        .filter(|(_, bucket)| !bucket.is_empty())
        .collect();
    if populated.is_empty() {
        return None;
    }

    let weights: Vec<f64> = populated.iter().map(|(w, _)| *w).collect();
    let chosen = weighted_sample(&weights, rng);
    let bucket = &populated[chosen].1;
    let pick = rng.gen_range(0..bucket.len());
    Some(bucket[pick].clone())
}

/// Finds a move for the bot, or `None` when no legal run has a known
/// formula. The caller treats `None` as an automatic challenge failure.
pub fn find_best_move(
    board: &Board,
    owned: &[Pos],
    table: &FormulaTable,
    difficulty: Difficulty,
    is_first: bool,
    rng: &mut impl Rng,
) -> Option<CandidateMove> {
    let mut candidates = Vec::new();
    for path in find_runs(board, owned, start_corner(is_first)) {
        let digits = match board.target_digits(&path) {
            Some(d) => d,
            None => continue,
        };
        let formula = match table.get(&digits) {
            Some(f) => f.to_string(),
            None => continue,
        };
        let target = match digits.parse::<u32>() {
            Ok(t) => t,
            Err(_) => continue,
        };
        candidates.push(CandidateMove {
            path,
            target,
            formula,
        });
    }

    select_candidate(candidates, difficulty, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn candidate(len: usize, tag: u32) -> CandidateMove {
        CandidateMove {
            path: (0..len as u8).map(|c| Pos::new(0, c)).collect(),
            target: tag,
            formula: format!("f{}", tag),
        }
    }

    #[test]
    fn weighted_sample_is_deterministic_under_seed() {
        let weights = [0.2, 0.5, 0.3];
        let a: Vec<usize> = (0..20)
            .map(|_| weighted_sample(&weights, &mut SmallRng::seed_from_u64(9)))
            .collect();
        let b: Vec<usize> = (0..20)
            .map(|_| weighted_sample(&weights, &mut SmallRng::seed_from_u64(9)))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn weighted_sample_respects_zero_weight() {
        let weights = [0.0, 1.0];
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(weighted_sample(&weights, &mut rng), 1);
        }
    }

    #[test]
    fn weighted_sample_roughly_matches_weights() {
        let weights = [0.7, 0.3];
        let mut rng = SmallRng::seed_from_u64(11);
        let mut first = 0;
        for _ in 0..1000 {
            if weighted_sample(&weights, &mut rng) == 0 {
                first += 1;
            }
        }
        assert!((600..800).contains(&first), "first bucket drawn {}", first);
    }

    #[test]
    fn select_restricts_to_difficulty_lengths() {
        // Hard never plays length 2 or 3.
        let candidates = vec![candidate(2, 1), candidate(3, 2), candidate(4, 3)];
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..50 {
            let pick = select_candidate(candidates.clone(), Difficulty::Hard, &mut rng).unwrap();
            assert_eq!(pick.path.len(), 4);
        }
    }

    #[test]
    fn select_renormalizes_onto_populated_lengths() {
        // Hard with candidates only at length 4 must always pick length 4,
        // despite the configured 0.5/0.3 weights on lengths 5 and 6.
        let candidates = vec![candidate(4, 1), candidate(4, 2)];
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..50 {
            let pick = select_candidate(candidates.clone(), Difficulty::Hard, &mut rng).unwrap();
            assert_eq!(pick.path.len(), 4);
        }
    }

    #[test]
    fn select_returns_none_without_eligible_lengths() {
        assert_eq!(
            select_candidate(vec![], Difficulty::Easy, &mut SmallRng::seed_from_u64(1)),
            None
        );
        // Easy plays only lengths 2 and 3.
        let candidates = vec![candidate(5, 1), candidate(6, 2)];
        assert_eq!(
            select_candidate(candidates, Difficulty::Easy, &mut SmallRng::seed_from_u64(1)),
            None
        );
    }

    #[test]
    fn find_best_move_returns_a_table_hit_from_the_corner() {
        let mut rng = SmallRng::seed_from_u64(42);
        let board = Board::generate(&mut rng);
        // Key the table off a real corner run so the lookup hits.
        let runs = find_runs(&board, &[], start_corner(false));
        let run = runs.iter().find(|r| r.len() == 3).unwrap().clone();
        let digits = board.target_digits(&run).unwrap();
        let table = FormulaTable::from_entries([(digits.clone(), "1+2")]);

        let best = find_best_move(&board, &[], &table, Difficulty::Normal, false, &mut rng)
            .expect("bot should find the keyed run");
        assert_eq!(best.path.len(), 3);
        assert_eq!(best.target, digits.parse::<u32>().unwrap());
        assert_eq!(best.formula, "1+2");
    }

    #[test]
    fn find_best_move_none_on_empty_table() {
        let mut rng = SmallRng::seed_from_u64(42);
        let board = Board::generate(&mut rng);
        let table = FormulaTable::default();
        assert_eq!(
            find_best_move(&board, &[], &table, Difficulty::Easy, true, &mut rng),
            None
        );
    }
}
