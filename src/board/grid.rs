//! The 13x13 game board.
//!
//! Holds the fixed obstacle layout, the random digit fill, and territory
//! ownership. Obstacles and digit values are fixed at generation time;
//! only cell ownership changes afterward, and each cell is claimed at
//! most once.

use rand::Rng;

use super::cell::{Cell, Player};
use super::coords::{user_to_internal, Pos};

/// Side length of the square board.
pub const BOARD_SIZE: usize = 13;

/// The fixed obstacle layout, in user (x, y) coordinates.
pub const OBSTACLES_USER: [(u8, u8); 9] = [
    (4, 4),
    (5, 5),
    (6, 6),
    (7, 7),
    (8, 8),
    (9, 9),
    (10, 10),
    (4, 10),
    (10, 4),
];

/// The game board: a fixed grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Generates a fresh board: obstacles at the fixed layout, every other
    /// cell drawn uniformly from 1..=9.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut cells = [[Cell::numbered(1); BOARD_SIZE]; BOARD_SIZE];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Cell::numbered(rng.gen_range(1..=9));
            }
        }
        for &(x, y) in &OBSTACLES_USER {
            // The layout constants are all in range.
            if let Some(pos) = user_to_internal(x, y) {
                cells[pos.row as usize][pos.col as usize] = Cell::obstacle();
            }
        }
        Board { cells }
    }

    /// Returns the cell at `pos`.
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos.row as usize][pos.col as usize]
    }

    /// Returns the digit at `pos`, or `None` for obstacles.
    pub fn value_at(&self, pos: Pos) -> Option<u8> {
        self.cell(pos).value
    }

    /// Returns whether the cell may still be taken: in bounds, not an
    /// obstacle, and unowned.
    pub fn is_selectable(&self, pos: Pos) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        let cell = self.cell(pos);
        !cell.is_obstacle && cell.owner.is_none()
    }

    /// Returns the inclusive cells on the row- or column-aligned line
    /// between `a` and `b`, in ascending coordinate order.
    ///
    /// Returns an empty vec when `a` and `b` share neither row nor column;
    /// non-straight selections are the caller's error to report.
    pub fn cells_in_straight_path(&self, a: Pos, b: Pos) -> Vec<Pos> {
        if a.row == b.row {
            let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
            (lo..=hi).map(|c| Pos::new(a.row, c)).collect()
        } else if a.col == b.col {
            let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
            (lo..=hi).map(|r| Pos::new(r, a.col)).collect()
        } else {
            Vec::new()
        }
    }

    /// Marks every cell in `cells` as owned by `player`.
    ///
    /// Precondition: every cell is currently selectable. Callers validate
    /// before claiming, so a violation is a programming error.
    pub fn claim(&mut self, cells: &[Pos], player: Player) {
        for &pos in cells {
            assert!(
                self.is_selectable(pos),
                "claim of non-selectable cell at {:?}",
                pos
            );
        }
        for &pos in cells {
            self.cells[pos.row as usize][pos.col as usize].owner = Some(player);
        }
    }

    /// Returns whether every cell is either an obstacle or owned.
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|c| c.is_obstacle || c.owner.is_some())
    }

    /// Concatenates the digits along `path` in (row, col)-ascending order.
    ///
    /// This sorted order makes a path and its reverse produce the same
    /// target. Returns `None` if any cell on the path is an obstacle.
    pub fn target_digits(&self, path: &[Pos]) -> Option<String> {
        let mut sorted: Vec<Pos> = path.to_vec();
        sorted.sort();
        let mut digits = String::with_capacity(sorted.len());
        for pos in sorted {
            let value = self.value_at(pos)?;
            digits.push((b'0' + value) as char);
        }
        Some(digits)
    }
}
