//! Match session: the driver a presentation layer talks to.
//!
//! - `MatchSession`: owns the match RNG, the registry, the authoritative
//!   `GameState` and the live `TurnMachine`; chains turns and runs the bot
//! - `StateSnapshot`: read-only view for rendering
//! - `TurnRecord`: one completed turn in the session history
//! - `MatchCheckpoint`: serializable turn-boundary save
//!
//! Intents that do not apply are ignored and reported as `false`; callers
//! poll `snapshot()` to see what happened.

mod match_session;
mod snapshot;

pub use match_session::MatchSession;
pub use snapshot::{MatchCheckpoint, StateSnapshot, TurnRecord};
