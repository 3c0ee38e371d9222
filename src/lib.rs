//! Numclaim engine library.
//!
//! Exposes the board, run enumeration, bot search, expression evaluation,
//! and the game state machine for use by integration tests and the binary
//! entry point.

pub mod board;
pub mod engine;
pub mod expr;
pub mod movegen;
pub mod protocol;
pub mod search;
