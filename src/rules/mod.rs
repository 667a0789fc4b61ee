//! Match rules that sit above the board: win resolution and the
//! simultaneous-five policy.

pub mod engine;

pub use engine::{resolve_wins, Winner};
