//! Game state.
//!
//! ## GameState
//!
//! The authoritative match value: board, whose turn it is, the deck piles,
//! pending skips, and the winner once decided.
//!
//! Board cells and both piles are `im` persistent structures, so `clone()`
//! is O(1) and the clone shares structure copy-on-write. Every engine step
//! takes `&GameState` and hands back a new value; a clone held by the AI or
//! a discarded turn machine can never leak mutation into the match state.

use serde::{Deserialize, Serialize};

use super::config::MatchConfig;
use super::error::ConfigError;
use super::player::{Player, PlayerMap};
use super::rng::GameRng;
use crate::board::Board;
use crate::cards::{CardRegistry, MatchContext};
use crate::deck::DeckState;
use crate::rules::Winner;

/// Per-player status effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusState {
    /// Pending turns to skip. Cumulative, never clamped.
    pub skip_next_turns: PlayerMap<u32>,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub deck: DeckState,
    pub status: StatusState,
    /// Terminal once set.
    pub winner: Option<Winner>,
}

impl GameState {
    /// Assemble a fresh state with no pending skips and no winner.
    #[must_use]
    pub fn new(board: Board, current_player: Player, deck: DeckState) -> Self {
        Self {
            board,
            current_player,
            deck,
            status: StatusState::default(),
            winner: None,
        }
    }

    /// Build the opening state of a match.
    ///
    /// Consumes draws from `rng` for the deck shuffle, so the session must
    /// pass its match stream here before the first turn.
    pub fn from_config(
        config: &MatchConfig,
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_size)
            .map_err(|_| ConfigError::InvalidBoardSize(config.board_size))?;
        let cards = DeckState::build_shuffled(
            rng,
            &config.deck_counts,
            registry,
            config.ensure_first_playable,
        );
        if cards.is_empty() {
            return Err(ConfigError::EmptyDeck);
        }
        Ok(Self::new(board, config.first_player, DeckState::from_piles(cards, Vec::new())))
    }

    /// Pending skips for a player.
    #[must_use]
    pub fn skips_pending(&self, player: Player) -> u32 {
        self.status.skip_next_turns[player]
    }

    /// Whether the match has been decided.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Read-only view handed to card definitions.
    #[must_use]
    pub fn context(&self) -> MatchContext<'_> {
        MatchContext::from_state(self)
    }
}
