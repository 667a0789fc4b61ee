//! Bots for the card-gomoku match.
//!
//! ## Overview
//!
//! Every bot implements `Strategy::decide`, a pure function from a game
//! state and a drawn hand to a `Decision`. Two strategies ship:
//!
//! - **`HeuristicStrategy`**: tactical cascade (win, block, break a line)
//!   followed by simulated evaluation of every playable card
//! - **`RandomStrategy`**: any playable card at any legal target
//!
//! Simulation reuses `apply_ops` and `resolve_wins`, so predictions never
//! drift from real resolution. Randomized cards are sampled on child RNG
//! streams; the match RNG is consumed only by the final fallback.
//!
//! ## Usage
//!
//! ```rust
//! use card_gomoku::ai::{strategy_for, Strategy};
//! use card_gomoku::board::Board;
//! use card_gomoku::cards::{CardId, CardRegistry};
//! use card_gomoku::core::{GameRng, GameState, OpponentKind, Player, SimultaneousFivePolicy};
//! use card_gomoku::deck::DeckState;
//!
//! let bot = strategy_for(OpponentKind::Heuristic, SimultaneousFivePolicy::Attacker).unwrap();
//! let state = GameState::new(Board::new(9).unwrap(), Player::One, DeckState::default());
//! let registry = CardRegistry::with_base_cards();
//! let hand = [CardId::new("Place"), CardId::new("TimeFreeze")];
//!
//! let decision = bot.decide(&state, &hand, &registry, &mut GameRng::new("demo"));
//! assert!(hand.contains(&decision.card_id));
//! ```

pub mod config;
pub mod evaluate;
pub mod heuristic;
pub mod random;
pub mod strategy;

pub use config::{EvalWeights, HeuristicConfig};
pub use evaluate::{evaluate_board, evaluate_state, relative_score};
pub use heuristic::HeuristicStrategy;
pub use random::RandomStrategy;
pub use strategy::{Decision, Strategy};

use crate::core::config::{OpponentKind, SimultaneousFivePolicy};

/// The strategy for a configured opponent kind; `None` for a human seat.
/// `policy` is the match's simultaneous-five rule, which the heuristic
/// assumes when simulating.
#[must_use]
pub fn strategy_for(
    kind: OpponentKind,
    policy: SimultaneousFivePolicy,
) -> Option<Box<dyn Strategy>> {
    match kind {
        OpponentKind::Human => None,
        OpponentKind::Heuristic => Some(Box::new(HeuristicStrategy::new(
            HeuristicConfig::default().with_policy(policy),
        ))),
        OpponentKind::Random => Some(Box::new(RandomStrategy)),
    }
}
