//! Core engine types: players, RNG, configuration, errors, state, serialization.
//!
//! Everything else in the crate is built on these. Nothing in `core` knows
//! about the turn machine or the AI.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;
pub mod serialize;

pub use player::{Player, PlayerMap};
pub use rng::{hash_seed_text, GameRng, GameRngState, Seed};
pub use config::{
    default_deck_counts, DeckCounts, MatchConfig, OpponentKind, SimultaneousFivePolicy,
};
pub use error::{
    BoardError, CardError, CardErrorCode, ConfigError, EngineError, RegistryError, RngError,
    SerializeError, SessionError,
};
pub use state::{GameState, StatusState};
pub use serialize::{
    deserialize_game_state, serialize_game_state, SerializedBoard, SerializedDeck,
    SerializedGameState, SerializedLastMove, SerializedStatus, SerializedWinner,
};
