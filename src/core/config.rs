//! Match configuration.
//!
//! A match is configured once at creation by a plain `MatchConfig` value.
//! Every field has a default, so JSON configs only need the keys they change:
//!
//! ```
//! use card_gomoku::core::{MatchConfig, Player, SimultaneousFivePolicy};
//!
//! let json = r#"{ "boardSize": 9, "firstPlayer": 2, "seed": 7 }"#;
//! let config = MatchConfig::from_json(json).unwrap();
//! assert_eq!(config.board_size, 9);
//! assert_eq!(config.first_player, Player::Two);
//! assert_eq!(config.simultaneous_five_policy, SimultaneousFivePolicy::Attacker);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::Player;
use super::rng::Seed;
use crate::cards::{base, CardId};

/// Card id -> copy count. Unknown ids and non-positive counts are dropped
/// when the deck is built.
pub type DeckCounts = BTreeMap<CardId, i64>;

/// Who wins when one resolution step completes five-lines for both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimultaneousFivePolicy {
    /// The player acting this turn wins.
    #[default]
    Attacker,
    /// The match is drawn.
    Draw,
}

/// Who drives the non-interactive seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    /// Both seats are driven by external intents.
    #[default]
    Human,
    /// Tactical cascade plus simulated evaluation.
    Heuristic,
    /// First playable card, random legal target.
    Random,
}

/// The default deck composition.
#[must_use]
pub fn default_deck_counts() -> DeckCounts {
    [
        (base::PLACE, 12),
        (base::TAKE, 6),
        (base::POLARITY_INVERSION, 3),
        (base::SPONTANEOUS_GENERATION, 5),
    ]
    .into_iter()
    .map(|(id, count)| (CardId::new(id), count))
    .collect()
}

/// Match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    /// Side length of the square board.
    pub board_size: usize,

    /// Who takes the first turn.
    pub first_player: Player,

    /// Match seed. Same seed and same intents replay the same match.
    pub seed: Seed,

    /// Tie-break for simultaneous five-lines.
    pub simultaneous_five_policy: SimultaneousFivePolicy,

    /// Initial deck composition.
    pub deck_counts: DeckCounts,

    /// Strategy for the bot seat.
    pub opponent: OpponentKind,

    /// The seat the bot plays (ignored for `OpponentKind::Human`).
    pub bot_player: Player,

    /// Guarantee the first draw contains a primary action card.
    pub ensure_first_playable: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board_size: 15,
            first_player: Player::One,
            seed: Seed::Text("demo".to_string()),
            simultaneous_five_policy: SimultaneousFivePolicy::Attacker,
            deck_counts: default_deck_counts(),
            opponent: OpponentKind::Human,
            bot_player: Player::Two,
            ensure_first_playable: true,
        }
    }
}

impl MatchConfig {
    /// Parse a config from JSON, filling unspecified keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        Ok(())
    }

    /// Set the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Set the first player.
    #[must_use]
    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Set the simultaneous-five policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SimultaneousFivePolicy) -> Self {
        self.simultaneous_five_policy = policy;
        self
    }

    /// Replace the deck composition.
    #[must_use]
    pub fn with_deck_counts(mut self, counts: DeckCounts) -> Self {
        self.deck_counts = counts;
        self
    }

    /// Set the bot strategy and the seat it plays.
    #[must_use]
    pub fn with_opponent(mut self, kind: OpponentKind, seat: Player) -> Self {
        self.opponent = kind;
        self.bot_player = seat;
        self
    }

    /// Toggle the first-draw guarantee.
    #[must_use]
    pub fn with_ensure_first_playable(mut self, enabled: bool) -> Self {
        self.ensure_first_playable = enabled;
        self
    }
}
