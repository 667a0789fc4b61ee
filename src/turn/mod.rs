//! Turn orchestration: skip check, draw, choose, target, resolve, win check.
//!
//! - `TurnMachine`: explicit finite-state machine for one player-turn
//! - `TurnEvent`: the two inbound intents (`ChooseCard`, `SelectTarget`)
//! - `LogEntry`: ordered audit trail of a turn
//!
//! Log entries always appear in the order
//! `skip` | `drawTwo`, `choose`, `selectTarget`, `resolve`, `checkWin`.
//! A phase that does not run writes nothing; `selectTarget` appears only for
//! targeted cards.

mod log;
mod machine;

pub use log::{LogEntry, LogTag};
pub use machine::{TurnContext, TurnEvent, TurnMachine, TurnPhase, DRAW_COUNT};
