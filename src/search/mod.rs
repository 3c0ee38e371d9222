//! Bot move search.
//!
//! Filters the legal runs down to those with a known formula and picks
//! one with a difficulty-weighted draw over run lengths.

pub mod bot;
pub mod formulas;

pub use bot::{find_best_move, select_candidate, weighted_sample, CandidateMove, Difficulty};
pub use formulas::{FormulaTable, FormulaTableError};
