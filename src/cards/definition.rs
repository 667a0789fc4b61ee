//! Card definitions: the uniform interface every card implements.
//!
//! ## Design
//!
//! A card is described by its `TargetSpec` discriminant and three pure
//! operations:
//!
//! - `can_play`: coarse check, ignoring any specific target
//! - `validate_target`: legality of one proposed target
//! - `effect`: the card's result as a list of `DomainOp`s
//!
//! `effect` reads only its arguments and may consume draws from the RNG it
//! is given. It never touches the board; the engine applies the ops.
//! The turn machine and the AI talk to cards only through this trait, so
//! neither contains per-card branches.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use super::validate::{can_play_by_target_spec, validate_target_by_spec};
use crate::board::{Board, Point};
use crate::core::error::CardError;
use crate::core::player::{Player, PlayerMap};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::effects::DomainOp;

/// Unique identifier for a card definition.
///
/// Ids are plain strings so deck configurations can name cards the
/// registry does not know yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for CardId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for CardId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display data. Ignored by all game logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CardMeta {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            icon: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Relation of a target to the acting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "self")]
    Own,
    #[serde(rename = "opponent")]
    Opponent,
}

impl Relation {
    /// The player this relation names, seen from `current`.
    #[must_use]
    pub const fn resolve(self, current: Player) -> Player {
        match self {
            Relation::Own => current,
            Relation::Opponent => current.opponent(),
        }
    }
}

/// What a card needs to be pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetSpec {
    None,
    #[serde(rename_all = "camelCase")]
    Cell {
        #[serde(default)]
        must_be_empty: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        must_be_owned_by: Option<Relation>,
    },
    Player { relation: Relation },
}

impl TargetSpec {
    /// Whether the turn machine must wait for a target.
    #[must_use]
    pub const fn needs_target(&self) -> bool {
        !matches!(self, TargetSpec::None)
    }
}

/// A concrete target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetValue {
    None,
    Cell { point: Point },
    Player { player: Player },
}

impl TargetValue {
    #[must_use]
    pub const fn cell(x: i32, y: i32) -> Self {
        TargetValue::Cell {
            point: Point::new(x, y),
        }
    }

    #[must_use]
    pub const fn point(&self) -> Option<Point> {
        match self {
            TargetValue::Cell { point } => Some(*point),
            _ => None,
        }
    }

    #[must_use]
    pub const fn player(&self) -> Option<Player> {
        match self {
            TargetValue::Player { player } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetValue::None => f.write_str("none"),
            TargetValue::Cell { point } => write!(f, "cell {point}"),
            TargetValue::Player { player } => write!(f, "{player}"),
        }
    }
}

/// Read-only view of the match handed to card operations.
#[derive(Clone, Copy, Debug)]
pub struct MatchContext<'a> {
    pub board: &'a Board,
    pub current_player: Player,
    pub skip_next_turns: &'a PlayerMap<u32>,
}

impl<'a> MatchContext<'a> {
    #[must_use]
    pub fn from_state(state: &'a GameState) -> Self {
        Self {
            board: &state.board,
            current_player: state.current_player,
            skip_next_turns: &state.status.skip_next_turns,
        }
    }

    #[must_use]
    pub const fn opponent(&self) -> Player {
        self.current_player.opponent()
    }
}

/// What a card's effect produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectOutput {
    pub ops: Vec<DomainOp>,
    pub log: Option<String>,
}

impl EffectOutput {
    #[must_use]
    pub fn new(ops: Vec<DomainOp>) -> Self {
        Self { ops, log: None }
    }

    #[must_use]
    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }
}

/// Tactical role a card plays, used by deck building and the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardRole {
    /// Puts one of the actor's stones on a chosen empty cell.
    PlaceStone,
    /// Removes a chosen opponent stone.
    TakeStone,
    Special,
}

/// Behavior of one card.
///
/// Only `id`, `meta`, `target` and `effect` are required; legality defaults
/// to the generic checks derived from `target`.
pub trait CardDefinition: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &CardId;

    fn meta(&self) -> &CardMeta;

    fn target(&self) -> TargetSpec;

    fn role(&self) -> CardRole {
        CardRole::Special
    }

    /// Unconditionally useful opening action. At most the deck's first draw
    /// is arranged to contain one.
    fn is_primary_action(&self) -> bool {
        self.role() == CardRole::PlaceStone
    }

    /// Whether `effect` consumes RNG draws (the AI samples these).
    fn is_randomized(&self) -> bool {
        false
    }

    /// Coarse playability check.
    fn can_play(&self, ctx: &MatchContext<'_>) -> Result<(), CardError> {
        can_play_by_target_spec(ctx, &self.target())
    }

    /// Check a proposed target, returning the accepted value.
    fn validate_target(
        &self,
        ctx: &MatchContext<'_>,
        target: &TargetValue,
    ) -> Result<TargetValue, CardError> {
        validate_target_by_spec(ctx, &self.target(), target)
    }

    /// Compute the card's ops. `target` has already passed `validate_target`.
    fn effect(
        &self,
        ctx: &MatchContext<'_>,
        rng: &mut GameRng,
        target: &TargetValue,
    ) -> EffectOutput;
}
