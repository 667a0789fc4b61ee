//! Error taxonomy.
//!
//! Two families live here:
//!
//! - **Contract violations** (`BoardError`, `RegistryError`, `RngError`,
//!   `EngineError`): the caller broke a precondition. Low-level APIs return
//!   these as `Err` and never absorb them.
//! - **Legality failures** (`CardError`): a card or target is not available
//!   right now. These are ordinary results during play, identified by a
//!   stable [`CardErrorCode`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Point;
use crate::cards::CardId;

/// Board contract violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board size: {0}")]
    InvalidSize(usize),
    #[error("point {0} is out of bounds")]
    OutOfBounds(Point),
    #[error("cell {0} is occupied")]
    CellOccupied(Point),
    #[error("cell {0} is empty")]
    CellEmpty(Point),
}

/// Card registry contract violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("card already registered: {0}")]
    DuplicateId(CardId),
    #[error("unknown card id: {0}")]
    UnknownId(CardId),
}

/// PRNG contract violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RngError {
    #[error("pick() from empty input")]
    EmptyInput,
}

/// Failure while applying domain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Stable codes for expected legality failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardErrorCode {
    CardNotPlayable,
    InvalidTarget,
    OutOfBounds,
    CellOccupied,
    CellEmpty,
    TargetIsSelf,
    TargetNotOpponent,
    InsufficientEmpties,
}

impl CardErrorCode {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardErrorCode::CardNotPlayable => "CardNotPlayable",
            CardErrorCode::InvalidTarget => "InvalidTarget",
            CardErrorCode::OutOfBounds => "OutOfBounds",
            CardErrorCode::CellOccupied => "CellOccupied",
            CardErrorCode::CellEmpty => "CellEmpty",
            CardErrorCode::TargetIsSelf => "TargetIsSelf",
            CardErrorCode::TargetNotOpponent => "TargetNotOpponent",
            CardErrorCode::InsufficientEmpties => "InsufficientEmpties",
        }
    }
}

impl std::fmt::Display for CardErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expected legality failure: "this option is unavailable".
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct CardError {
    pub code: CardErrorCode,
    pub message: Option<String>,
}

impl CardError {
    /// Error with a bare code.
    #[must_use]
    pub const fn new(code: CardErrorCode) -> Self {
        Self { code, message: None }
    }

    /// Error with a code and a human-readable message.
    #[must_use]
    pub fn with_message(code: CardErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

impl From<CardErrorCode> for CardError {
    fn from(code: CardErrorCode) -> Self {
        Self::new(code)
    }
}

/// Failure converting between `GameState` and its plain structural form.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("invalid player number: {0}")]
    InvalidPlayer(u8),
    #[error("invalid cell value {value} at ({x},{y})")]
    InvalidCell { x: usize, y: usize, value: u8 },
    #[error("board rows do not form a {size}x{size} grid")]
    RaggedBoard { size: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Binary(#[from] bincode::Error),
}

/// Invalid match configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board size must be a positive integer, got {0}")]
    InvalidBoardSize(usize),
    #[error("deck configuration yields no registered cards")]
    EmptyDeck,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure creating or restoring a match session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}
