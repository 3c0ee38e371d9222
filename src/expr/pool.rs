//! Shared number-pool accounting.
//!
//! Every expression draws its literals from the same fixed multiset of
//! nine numbers. Accounting is per attempt: each check starts from the
//! full pool, so numbers never deplete across challenges.

use thiserror::Error;

/// The shared multiset of numbers available to every expression.
pub const NUMBER_POOL: [u8; 9] = [1, 2, 2, 3, 4, 4, 5, 6, 6];

/// Pool-feasibility failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("number {0} is not available in the pool")]
    Unavailable(u64),
}

/// Extracts every integer literal (maximal contiguous digit run) from the
/// expression, in order of appearance.
pub fn numbers_in(expr: &str) -> Vec<u64> {
    let mut numbers = Vec::new();
    let mut current: Option<u64> = None;
    for ch in expr.chars() {
        if let Some(d) = ch.to_digit(10) {
            let acc = current.unwrap_or(0);
            current = Some(acc.saturating_mul(10).saturating_add(d as u64));
        } else if let Some(n) = current.take() {
            numbers.push(n);
        }
    }
    if let Some(n) = current {
        numbers.push(n);
    }
    numbers
}

/// Verifies that every literal in the expression can be drawn from the
/// pool, consuming one instance per occurrence (first-match removal).
///
/// Fails on the first literal with no remaining instance. Feasibility
/// depends only on literal counts, never on their position.
pub fn check_pool(expr: &str) -> Result<(), PoolError> {
    let mut remaining: Vec<u8> = NUMBER_POOL.to_vec();
    for n in numbers_in(expr) {
        match remaining.iter().position(|&p| u64::from(p) == n) {
            Some(idx) => {
                remaining.swap_remove(idx);
            }
            None => return Err(PoolError::Unavailable(n)),
        }
    }
    Ok(())
}

/// Returns the pool numbers still unused by the expression so far.
///
/// Literals with no remaining instance are skipped; this is the lenient
/// display view an expression editor shows while the player types.
pub fn remaining_after(expr: &str) -> Vec<u8> {
    let mut remaining: Vec<u8> = NUMBER_POOL.to_vec();
    for n in numbers_in(expr) {
        if let Some(idx) = remaining.iter().position(|&p| u64::from(p) == n) {
            remaining.remove(idx);
        }
    }
    remaining
}
