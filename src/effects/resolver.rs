//! Applying domain operations to game state.
//!
//! `apply_ops` is the single mutation channel for card effects. The turn
//! machine uses it for real turns and the AI uses it for simulation, so a
//! prediction always matches what the engine would do.

use tracing::trace;

use super::op::DomainOp;
use crate::core::error::EngineError;
use crate::core::state::GameState;

/// Apply `ops` in order and return the new state.
///
/// The input is never modified. If any op breaks the board contract the
/// whole batch fails and no partial result escapes. A state that already
/// has a winner is returned unchanged.
pub fn apply_ops(state: &GameState, ops: &[DomainOp]) -> Result<GameState, EngineError> {
    if state.winner.is_some() {
        trace!(ops = ops.len(), "match decided, ignoring ops");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    for op in ops {
        apply_one(&mut next, op)?;
        trace!(%op, "applied op");
    }
    Ok(next)
}

fn apply_one(state: &mut GameState, op: &DomainOp) -> Result<(), EngineError> {
    match *op {
        DomainOp::Place { point, player } => state.board.place(point, player)?,
        DomainOp::Remove { point } => {
            state.board.remove(point)?;
        }
        DomainOp::SwapAll => state.board.swap_all(),
        DomainOp::Freeze { target, amount } => {
            let skips = &mut state.status.skip_next_turns[target];
            *skips = skips.saturating_add(amount);
        }
    }
    Ok(())
}
