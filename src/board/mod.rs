//! Board representation and territory state.
//!
//! Contains the coordinate types, cell/player definitions, and the 13x13
//! grid with its fixed obstacle layout and ownership tracking.

pub mod cell;
pub mod coords;
pub mod grid;

pub use cell::{Cell, Player};
pub use coords::{internal_to_user, is_adjacent, user_to_internal, Dir, Pos, ALL_DIRS};
pub use grid::{Board, BOARD_SIZE, OBSTACLES_USER};
