//! Domain operations: the only way a card changes the match.

use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::core::player::Player;

/// One atomic state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainOp {
    /// Put `player`'s stone on an empty cell.
    Place { point: Point, player: Player },
    /// Clear an occupied cell.
    Remove { point: Point },
    /// Flip the owner of every stone.
    SwapAll,
    /// Add `amount` pending skips to `target`.
    Freeze { target: Player, amount: u32 },
}

impl std::fmt::Display for DomainOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainOp::Place { point, player } => write!(f, "place {point} for {player}"),
            DomainOp::Remove { point } => write!(f, "remove {point}"),
            DomainOp::SwapAll => f.write_str("swap all"),
            DomainOp::Freeze { target, amount } => write!(f, "freeze {target} x{amount}"),
        }
    }
}
