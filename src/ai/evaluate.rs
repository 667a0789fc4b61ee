//! Board evaluation.
//!
//! Each player's total is a sum over every maximal same-owner fragment
//! (counted once per fragment, not per cell), keyed by length and open
//! ends, plus a small per-stone bonus for central cells. The relative score
//! is own total minus opponent total; it is the only currency the
//! heuristic uses to compare non-tactical moves.

use super::config::{EvalWeights, HeuristicConfig};
use crate::board::{fragments, Board, Point, WIN_LENGTH};
use crate::core::player::{Player, PlayerMap};
use crate::core::state::GameState;

/// Score of one fragment.
#[must_use]
pub fn fragment_score(length: usize, open_ends: u8, weights: &EvalWeights) -> f64 {
    let per_end = match length {
        n if n >= WIN_LENGTH => return weights.five,
        4 => weights.four,
        3 => weights.three,
        2 => weights.two,
        _ => 0.0,
    };
    per_end * f64::from(open_ends)
}

/// Positional bonus for a stone at `point`: `weights.center` at the center,
/// falling off linearly with Chebyshev distance.
#[must_use]
pub fn center_bonus(size: usize, point: Point, weights: &EvalWeights) -> f64 {
    let half = (size as f64 - 1.0) / 2.0;
    let dist = (f64::from(point.x) - half)
        .abs()
        .max((f64::from(point.y) - half).abs());
    weights.center * (half + 1.0 - dist) / (half + 1.0)
}

/// Totals for both players.
#[must_use]
pub fn evaluate_board(board: &Board, weights: &EvalWeights) -> PlayerMap<f64> {
    let mut totals = PlayerMap::with_value(0.0);
    for fragment in fragments(board) {
        totals[fragment.player] += fragment_score(fragment.length, fragment.open_ends, weights);
    }
    for (point, cell) in board.iter() {
        if let Some(owner) = cell.owner() {
            totals[owner] += center_bonus(board.size(), point, weights);
        }
    }
    totals
}

/// Own total minus opponent total.
#[must_use]
pub fn relative_score(board: &Board, player: Player, weights: &EvalWeights) -> f64 {
    let totals = evaluate_board(board, weights);
    totals[player] - totals[player.opponent()]
}

/// Relative board score plus the tempo value of pending skips.
#[must_use]
pub fn evaluate_state(state: &GameState, player: Player, config: &HeuristicConfig) -> f64 {
    let skips = &state.status.skip_next_turns;
    let tempo = f64::from(skips[player.opponent()]) - f64::from(skips[player]);
    relative_score(&state.board, player, &config.weights) + config.tempo * tempo
}
