//! # card-gomoku
//!
//! A deterministic five-in-a-row engine where every move is a card.
//!
//! Each turn a player draws two cards, plays one and discards the other.
//! Cards place or remove stones, flip every stone's owner, freeze the
//! opponent or spawn random stones. Five in a row wins.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: all randomness flows from one seeded `GameRng`.
//!    Same seed and same intents replay the same match bit for bit.
//!
//! 2. **Effects as data**: cards never touch the board. They return
//!    `DomainOp`s and `apply_ops` is the only code that changes state.
//!
//! 3. **Persistent state**: `GameState` clones in O(1) via `im-rs`, so the
//!    bot simulates moves on copies without touching the real match.
//!
//! ## Architecture
//!
//! - **Turn state machine**: an explicit enum of phases driven by two
//!   events, with an ordered audit log per turn.
//!
//! - **Lexical bot**: win, then block, then break a line, then the best
//!   simulated card. Simulation uses the engine's own primitives.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, errors, state, serialization
//! - `board`: grid, coordinates and win-line geometry
//! - `deck`: draw and discard piles
//! - `cards`: card definitions, target validation, registry, base cards
//! - `effects`: domain operations and their application
//! - `rules`: win resolution
//! - `turn`: the turn state machine
//! - `ai`: strategies and board evaluation
//! - `session`: the match driver

pub mod core;
pub mod board;
pub mod deck;
pub mod cards;
pub mod effects;
pub mod rules;
pub mod turn;
pub mod ai;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Player, PlayerMap,
    GameRng, GameRngState, Seed,
    MatchConfig, OpponentKind, SimultaneousFivePolicy,
    GameState, StatusState, SerializedGameState,
    BoardError, CardError, CardErrorCode, ConfigError, EngineError, RegistryError,
    SerializeError, SessionError,
};

pub use crate::board::{Board, CellValue, Point, WinLine};

pub use crate::deck::DeckState;

pub use crate::cards::{
    CardDefinition, CardId, CardMeta, CardRegistry, MatchContext, TargetSpec, TargetValue,
};

pub use crate::effects::{apply_ops, DomainOp};

pub use crate::rules::{resolve_wins, Winner};

pub use crate::turn::{LogEntry, LogTag, TurnEvent, TurnMachine, TurnPhase};

pub use crate::ai::{Decision, HeuristicStrategy, RandomStrategy, Strategy};

pub use crate::session::{MatchCheckpoint, MatchSession, StateSnapshot, TurnRecord};
