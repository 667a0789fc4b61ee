//! Uniform random bot.

use super::strategy::{Decision, Strategy};
use crate::cards::{legal_targets, CardId, CardRegistry};
use crate::core::rng::GameRng;
use crate::core::state::GameState;

/// Plays a random playable card at a random legal target.
///
/// Cards are tried in shuffled order; the first one with any legal target
/// is played. An unplayable hand degrades to the shared fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn id(&self) -> &'static str {
        "random"
    }

    fn decide(
        &self,
        state: &GameState,
        drawn: &[CardId],
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Decision {
        let ctx = state.context();
        for id in rng.shuffle(drawn) {
            let Some(def) = registry.get(&id) else {
                continue;
            };
            let targets = legal_targets(def, &ctx);
            if let Ok(target) = rng.pick(&targets) {
                let target = *target;
                return Decision::new(id)
                    .aimed_at(target)
                    .with_explanation("Random playable card");
            }
        }
        Decision::fallback(drawn, rng)
    }
}
