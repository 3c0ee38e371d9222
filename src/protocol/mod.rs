//! Line protocol for driving the engine.
//!
//! Parses incoming commands from raw text into structured `Command`
//! variants that the main loop dispatches on. Coordinates at this
//! boundary are 1-indexed user (x, y) with the origin bottom-left.

pub mod parser;

pub use parser::{parse_command, Command, NewParams};
