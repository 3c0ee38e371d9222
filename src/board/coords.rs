//! Grid coordinates and the user/internal transform.
//!
//! Internal positions are 0-indexed (row, col) with row 0 at the top.
//! User-facing coordinates are 1-indexed (x, y) with the origin at the
//! bottom-left, converted via `(row, col) = (13 - y, x - 1)`.

use crate::board::grid::BOARD_SIZE;

/// A cell position on the board, internal 0-indexed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Pos { row, col }
    }

    /// Returns whether this position lies on the 13x13 board.
    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }
}

/// Converts 1-indexed bottom-left user coordinates to an internal position.
///
/// Returns `None` when (x, y) is outside 1..=13 on either axis.
pub fn user_to_internal(x: u8, y: u8) -> Option<Pos> {
    if x < 1 || x > BOARD_SIZE as u8 || y < 1 || y > BOARD_SIZE as u8 {
        return None;
    }
    Some(Pos::new(BOARD_SIZE as u8 - y, x - 1))
}

/// Converts an internal position back to 1-indexed user coordinates (x, y).
pub fn internal_to_user(pos: Pos) -> (u8, u8) {
    (pos.col + 1, BOARD_SIZE as u8 - pos.row)
}

/// Returns whether two positions are orthogonally adjacent
/// (Manhattan distance exactly 1).
pub fn is_adjacent(a: Pos, b: Pos) -> bool {
    let dr = (a.row as i16 - b.row as i16).abs();
    let dc = (a.col as i16 - b.col as i16).abs();
    dr + dc == 1
}

/// An axis direction on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// All four axis directions, in probe order.
pub const ALL_DIRS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

impl Dir {
    /// Steps `steps` cells from `origin` in this direction.
    ///
    /// Returns `None` when the result would leave the board.
    pub fn offset(self, origin: Pos, steps: u8) -> Option<Pos> {
        let (dr, dc): (i16, i16) = match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        };
        let row = origin.row as i16 + dr * steps as i16;
        let col = origin.col as i16 + dc * steps as i16;
        if row < 0 || row >= BOARD_SIZE as i16 || col < 0 || col >= BOARD_SIZE as i16 {
            return None;
        }
        Some(Pos::new(row as u8, col as u8))
    }
}
