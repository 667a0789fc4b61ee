//! Heuristic strategy configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::config::SimultaneousFivePolicy;

/// Line-fragment and positional weights for board evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Any fragment of five or more.
    pub five: f64,
    /// Length-4 fragment, per open end.
    pub four: f64,
    /// Length-3 fragment, per open end.
    pub three: f64,
    /// Length-2 fragment, per open end.
    pub two: f64,
    /// Maximum per-stone bonus for sitting at the board center.
    pub center: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            five: 10_000.0,
            four: 1_000.0,
            three: 120.0,
            two: 25.0,
            center: 2.0,
        }
    }
}

/// Heuristic strategy configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Board evaluation weights.
    pub weights: EvalWeights,

    /// Samples per candidate for cards with random effects.
    /// Deterministic cards are always simulated once.
    pub rollouts: u32,

    /// Score assigned to a move that wins outright.
    pub win_score: f64,

    /// Base score for a forced block (post-block evaluation is added).
    pub block_score: f64,

    /// Value of one pending skip turn (opponent's minus own).
    pub tempo: f64,

    /// Policy assumed when a simulated move completes lines for both sides.
    pub policy: SimultaneousFivePolicy,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            weights: EvalWeights::default(),
            rollouts: 4,
            win_score: 1_000_000.0,
            block_score: 500_000.0,
            tempo: 150.0,
            policy: SimultaneousFivePolicy::Attacker,
        }
    }
}

impl HeuristicConfig {
    /// Set the rollout count (at least one sample is always taken).
    #[must_use]
    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts = rollouts;
        self
    }

    /// Replace the evaluation weights.
    #[must_use]
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the assumed simultaneous-five policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SimultaneousFivePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the tempo weight.
    #[must_use]
    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = tempo;
        self
    }
}
