//! Legal run enumeration.
//!
//! Enumerates straight-line runs of unclaimed, non-obstacle cells that a
//! player could legally select from their current territory. This is pure
//! geometry: whether a run's target number has a known formula is the bot
//! search's concern, not this module's.

use thiserror::Error;

use crate::board::{is_adjacent, user_to_internal, Board, Pos, ALL_DIRS};

/// Minimum number of cells in a run.
pub const MIN_RUN_LEN: usize = 2;

/// Maximum number of cells in a run.
pub const MAX_RUN_LEN: usize = 6;

/// An ordered path of cells, traversal order from the root cell.
pub type Run = Vec<Pos>;

/// Returns the fixed opening cell for a player.
///
/// The player who moves first opens at user (1,13), the top-left internal
/// corner; the second player opens at user (13,1), the bottom-right.
pub fn start_corner(is_first: bool) -> Pos {
    let (x, y) = if is_first { (1, 13) } else { (13, 1) };
    // The corner constants are always in range.
    user_to_internal(x, y).expect("start corner in range")
}

/// Returns the cells a run may legally start from.
///
/// With territory: every selectable cell orthogonally adjacent to an owned
/// cell, deduplicated. Without territory: the player's start corner alone,
/// if it is still selectable.
pub fn frontier(board: &Board, owned: &[Pos], corner: Pos) -> Vec<Pos> {
    if owned.is_empty() {
        if board.is_selectable(corner) {
            return vec![corner];
        }
        return Vec::new();
    }

    let mut cells = Vec::new();
    for &cell in owned {
        for dir in ALL_DIRS {
            if let Some(n) = dir.offset(cell, 1) {
                if board.is_selectable(n) && !cells.contains(&n) {
                    cells.push(n);
                }
            }
        }
    }
    cells
}

/// Enumerates every valid run rooted at the player's frontier.
///
/// From each frontier cell, probes all four directions at lengths 2..=6.
/// A direction stops contributing as soon as a probe hits a cell that is
/// out of bounds, an obstacle, or already owned; longer lengths in that
/// direction are rejected with it.
pub fn find_runs(board: &Board, owned: &[Pos], corner: Pos) -> Vec<Run> {
    let mut runs = Vec::new();

    for root in frontier(board, owned, corner) {
        for dir in ALL_DIRS {
            let mut path: Run = vec![root];
            for step in 1..MAX_RUN_LEN as u8 {
                let next = match dir.offset(root, step) {
                    Some(pos) if board.is_selectable(pos) => pos,
                    _ => break,
                };
                path.push(next);
                if path.len() >= MIN_RUN_LEN {
                    runs.push(path.clone());
                }
            }
        }
    }

    runs
}

/// Why a proposed run is not a legal selection. The display strings are
/// the player-facing rule statements.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RunViolation {
    #[error("a run covers 2 to 6 cells")]
    BadLength,

    #[error("a run is a contiguous straight line")]
    NotStraight,

    #[error("every cell must be unclaimed and free of obstacles")]
    NotSelectable,

    #[error("the first run must start at your corner cell")]
    RootNotCorner,

    #[error("the run must start next to your territory")]
    RootDetached,
}

/// Checks `path` as a selection for a player whose territory is `owned`:
/// straight, contiguous, length 2..=6, every cell selectable, and rooted
/// at the frontier. The single source of the selection rule, shared by
/// run enumeration tests and the turn engine.
pub fn check_run(
    board: &Board,
    owned: &[Pos],
    corner: Pos,
    path: &[Pos],
) -> Result<(), RunViolation> {
    if path.len() < MIN_RUN_LEN || path.len() > MAX_RUN_LEN {
        return Err(RunViolation::BadLength);
    }
    let straight = board.cells_in_straight_path(path[0], path[path.len() - 1]);
    if straight.len() != path.len() {
        return Err(RunViolation::NotStraight);
    }
    let mut sorted: Vec<Pos> = path.to_vec();
    sorted.sort();
    if sorted != straight {
        return Err(RunViolation::NotStraight);
    }
    if !path.iter().all(|&p| board.is_selectable(p)) {
        return Err(RunViolation::NotSelectable);
    }
    let root = path[0];
    if owned.is_empty() {
        if root != corner {
            return Err(RunViolation::RootNotCorner);
        }
    } else if !owned.iter().any(|&c| is_adjacent(c, root)) {
        return Err(RunViolation::RootDetached);
    }
    Ok(())
}

/// Returns whether `path` passes `check_run`.
pub fn is_legal_run(board: &Board, owned: &[Pos], corner: Pos, path: &[Pos]) -> bool {
    check_run(board, owned, corner, path).is_ok()
}
