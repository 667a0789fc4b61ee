//! Read-only views and saved forms of a match.

use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::cards::{CardId, TargetValue};
use crate::core::config::MatchConfig;
use crate::core::error::SerializeError;
use crate::core::player::Player;
use crate::core::rng::GameRngState;
use crate::core::serialize::{SerializedBoard, SerializedGameState};
use crate::rules::Winner;
use crate::turn::{LogEntry, TurnPhase};

/// What a presentation layer renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// 1-based number of the live (or last) turn.
    pub turn_number: u32,
    pub board: SerializedBoard,
    pub current_player: Player,
    pub draw_pile: usize,
    pub discard_pile: usize,
    /// Player number -> pending skips.
    pub skip_next_turns: std::collections::BTreeMap<u8, u32>,
    pub winner: Option<Winner>,
    /// `None` once the match is over.
    pub phase: Option<TurnPhase>,
    pub drawn: Vec<CardId>,
    pub chosen: Option<CardId>,
    /// Logs of the live turn, or of the final turn once the match is over.
    pub logs: Vec<LogEntry>,
    pub winning_line: Option<Vec<Point>>,
}

/// One completed turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub number: u32,
    pub player: Player,
    pub drawn: Vec<CardId>,
    pub chosen: Option<CardId>,
    pub target: Option<TargetValue>,
    pub logs: Vec<LogEntry>,
}

/// A match frozen at a turn boundary.
///
/// Restoring replays the live turn from its start: same draws, same
/// options. Choices already made inside that turn are not kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCheckpoint {
    pub config: MatchConfig,
    pub state: SerializedGameState,
    pub rng: GameRngState,
    pub history: Vec<TurnRecord>,
}

impl MatchCheckpoint {
    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializeError> {
        Ok(serde_json::from_str(json)?)
    }
}
