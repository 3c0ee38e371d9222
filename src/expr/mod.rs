//! Expression evaluation and number-pool accounting.
//!
//! An expression is accepted for a challenge when its literals all fit in
//! the shared pool and it evaluates to the target within tolerance.

pub mod eval;
pub mod pool;

pub use eval::{evaluate, matches_target, ExprError, RESULT_TOLERANCE};
pub use pool::{check_pool, numbers_in, remaining_after, PoolError, NUMBER_POOL};
