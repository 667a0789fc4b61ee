//! Board: a fixed-size grid of stone ownership plus win-line geometry.
//!
//! ## Key Types
//!
//! - `Point`: signed coordinates, so off-board probes are representable
//! - `CellValue`: empty or owned by a player (wire form `0`/`1`/`2`)
//! - `Board`: the grid, backed by a persistent vector for O(1) clones
//! - `WinLine`, `Fragment`: line geometry shared by the engine and the AI
//!
//! Cells change only through `place`, `remove` and `swap_all`. Callers
//! outside the engine go through `DomainOp`s instead of touching the board.

mod grid;
mod lines;

pub use grid::{Board, CellValue, LastMove, Point};
pub use lines::{
    check_win_from_last_move, fragments, run_through, scan_all_wins, Fragment, WinLine,
    DIRECTIONS, WIN_LENGTH,
};
