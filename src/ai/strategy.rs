//! The strategy interface shared by every bot.

use serde::{Deserialize, Serialize};

use crate::cards::{base, CardId, CardRegistry, TargetValue};
use crate::core::rng::GameRng;
use crate::core::state::GameState;

/// What a bot wants to play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub card_id: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Decision {
    #[must_use]
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            target: None,
            score: None,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetValue) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Attach a target unless it is `TargetValue::None`.
    #[must_use]
    pub fn aimed_at(self, target: TargetValue) -> Self {
        match target {
            TargetValue::None => self,
            target => self.with_target(target),
        }
    }

    /// Uniform pick from `drawn`, or a bare `Place` when nothing was drawn.
    pub(crate) fn fallback(drawn: &[CardId], rng: &mut GameRng) -> Self {
        match rng.pick(drawn) {
            Ok(card) => Decision::new(card.clone()).with_explanation("Fallback random"),
            Err(_) => Decision::new(CardId::new(base::PLACE))
                .with_explanation("Fallback random (empty hand)"),
        }
    }
}

/// A bot policy.
///
/// `decide` must not mutate `state` or `registry`. Any randomness comes
/// from `rng` or child streams derived from it, so identical inputs give
/// identical decisions.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Pick a card (and target) from `drawn` for `state.current_player`.
    /// Never fails; degenerate inputs yield a fallback decision.
    fn decide(
        &self,
        state: &GameState,
        drawn: &[CardId],
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Decision;
}
