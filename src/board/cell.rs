//! Players and board cells.

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the 0-based seat index, for name lookup.
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// A single board cell.
///
/// `value` is `None` exactly when the cell is an obstacle. The owner starts
/// as `None` and transitions at most once to a player; it never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub value: Option<u8>,
    pub is_obstacle: bool,
    pub owner: Option<Player>,
}

impl Cell {
    /// Creates an unowned numbered cell.
    pub const fn numbered(value: u8) -> Self {
        Cell {
            value: Some(value),
            is_obstacle: false,
            owner: None,
        }
    }

    /// Creates an obstacle cell, which carries no digit and is never owned.
    pub const fn obstacle() -> Self {
        Cell {
            value: None,
            is_obstacle: true,
            owner: None,
        }
    }
}
