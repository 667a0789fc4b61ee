//! Tactical cascade plus simulated evaluation.
//!
//! ## Decision order
//!
//! A strict lexical cascade; the first step that yields a move wins:
//!
//! 1. **Immediate win**: a placement card is in hand and some empty cell
//!    completes five for us.
//! 2. **Block**: a placement card is in hand and the opponent has a
//!    winning cell. Among those cells, pick the one whose post-block
//!    evaluation is best.
//! 3. **Break the line**: no placement card, but a removal card is in hand
//!    and the opponent has a winning cell. Remove the opponent stone that
//!    sits in the most threat lines, preferring the middle of a line and
//!    then the board center.
//! 4. **Simulate**: every playable card and legal target is applied with
//!    `apply_ops` and scored with `resolve_wins` plus `evaluate_state`.
//!    Randomized effects are averaged over seeded child-stream rollouts.
//!
//! If nothing is playable, a drawn card is picked at random.
//!
//! Every prediction runs through the same `apply_ops`/`resolve_wins` the
//! turn machine uses; the input state is never modified.

use std::collections::BTreeMap;

use tracing::debug;

use super::config::HeuristicConfig;
use super::evaluate::evaluate_state;
use super::strategy::{Decision, Strategy};
use crate::board::{check_win_from_last_move, Board, Point, DIRECTIONS, WIN_LENGTH};
use crate::cards::{
    base, legal_targets, CardDefinition, CardId, CardRegistry, CardRole, MatchContext, TargetValue,
};
use crate::core::player::Player;
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::effects::{apply_ops, DomainOp};
use crate::rules::{resolve_wins, Winner};

type HandCard<'a> = (&'a CardId, &'a dyn CardDefinition);

/// Heuristic bot.
///
/// ## Example
///
/// ```
/// use card_gomoku::ai::{HeuristicStrategy, Strategy};
/// use card_gomoku::board::{Board, Point};
/// use card_gomoku::cards::{CardId, CardRegistry, TargetValue};
/// use card_gomoku::core::{GameRng, GameState, Player};
/// use card_gomoku::deck::DeckState;
///
/// let mut board = Board::new(9).unwrap();
/// for x in 0..4 {
///     board.place(Point::new(x, 0), Player::Two).unwrap();
/// }
/// let state = GameState::new(board, Player::Two, DeckState::default());
/// let registry = CardRegistry::with_base_cards();
/// let hand = [CardId::new("Place"), CardId::new("Take")];
///
/// let mut rng = GameRng::new("t1");
/// let decision = HeuristicStrategy::default().decide(&state, &hand, &registry, &mut rng);
/// assert_eq!(decision.card_id, CardId::new("Place"));
/// assert_eq!(decision.target, Some(TargetValue::cell(4, 0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeuristicStrategy {
    config: HeuristicConfig,
}

impl HeuristicStrategy {
    #[must_use]
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    fn cascade(
        &self,
        state: &GameState,
        drawn: &[CardId],
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Option<Decision> {
        if state.is_finished() {
            return None;
        }
        let player = state.current_player;
        let ctx = state.context();
        let place = find_role(drawn, registry, &ctx, CardRole::PlaceStone);
        let take = find_role(drawn, registry, &ctx, CardRole::TakeStone);

        if let Some(card) = place {
            if let Some(decision) = self.immediate_win(state, card) {
                return Some(decision);
            }
        }

        if place.is_some() || take.is_some() {
            let threats = winning_cells(state, player.opponent());
            if !threats.is_empty() {
                let forced = match (place, take) {
                    (Some(card), _) => self.block(state, card, &threats),
                    (None, Some(card)) => self.break_line(state, card, &threats),
                    (None, None) => None,
                };
                if forced.is_some() {
                    return forced;
                }
            }
        }

        self.simulate_all(state, drawn, registry, rng)
    }

    fn immediate_win(&self, state: &GameState, (id, def): HandCard<'_>) -> Option<Decision> {
        let ctx = state.context();
        winning_cells(state, state.current_player)
            .into_iter()
            .map(|point| TargetValue::Cell { point })
            .find(|target| def.validate_target(&ctx, target).is_ok())
            .map(|target| {
                Decision::new(id.clone())
                    .with_target(target)
                    .with_score(self.config.win_score)
                    .with_explanation(format!("Immediate win at {}", describe(&target)))
            })
    }

    fn block(
        &self,
        state: &GameState,
        (id, def): HandCard<'_>,
        threats: &[Point],
    ) -> Option<Decision> {
        let player = state.current_player;
        let ctx = state.context();
        let mut best: Option<(Point, f64)> = None;
        for &point in threats {
            if def.validate_target(&ctx, &TargetValue::Cell { point }).is_err() {
                continue;
            }
            let Ok(next) = apply_ops(state, &[DomainOp::Place { point, player }]) else {
                continue;
            };
            let score = evaluate_state(&next, player, &self.config);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((point, score));
            }
        }
        best.map(|(point, score)| {
            Decision::new(id.clone())
                .with_target(TargetValue::Cell { point })
                .with_score(self.config.block_score + score)
                .with_explanation(format!("Block opponent win at {point}"))
        })
    }

    fn break_line(
        &self,
        state: &GameState,
        (id, def): HandCard<'_>,
        threats: &[Point],
    ) -> Option<Decision> {
        let player = state.current_player;
        let ctx = state.context();
        let size = state.board.size() as i64;
        let center_distance = |p: Point| {
            (2 * i64::from(p.x) - (size - 1)).abs() + (2 * i64::from(p.y) - (size - 1)).abs()
        };

        let mut stones: Vec<(Point, ThreatStats)> =
            threat_stones(&state.board, threats, player.opponent())
                .into_iter()
                .filter(|&(point, _)| {
                    def.validate_target(&ctx, &TargetValue::Cell { point }).is_ok()
                })
                .collect();
        stones.sort_by_key(|&(p, stats)| {
            (
                std::cmp::Reverse(stats.frequency),
                std::cmp::Reverse(stats.centrality),
                center_distance(p),
                p.y,
                p.x,
            )
        });

        let (point, _) = *stones.first()?;
        let after = apply_ops(state, &[DomainOp::Remove { point }])
            .map(|next| evaluate_state(&next, player, &self.config))
            .unwrap_or(0.0);
        Some(
            Decision::new(id.clone())
                .with_target(TargetValue::Cell { point })
                .with_score(self.config.block_score + after)
                .with_explanation(format!("Take to break lethal line at {point}")),
        )
    }

    fn simulate_all(
        &self,
        state: &GameState,
        drawn: &[CardId],
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Option<Decision> {
        let player = state.current_player;
        let ctx = state.context();
        let baseline = evaluate_state(state, player, &self.config);

        let mut seen: Vec<&CardId> = Vec::with_capacity(drawn.len());
        let mut best: Option<(&CardId, &dyn CardDefinition, TargetValue, f64)> = None;
        for id in drawn {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let Some(def) = registry.get(id) else {
                continue;
            };
            for target in legal_targets(def, &ctx) {
                let Some(score) = self.simulate(state, def, &target, rng) else {
                    continue;
                };
                if best.as_ref().map_or(true, |&(_, _, _, s)| score > s) {
                    best = Some((id, def, target, score));
                }
            }
        }

        best.map(|(id, def, target, score)| {
            let delta = score - baseline;
            let rationale = if def.id() == base::POLARITY_INVERSION {
                "Invert polarity".to_string()
            } else {
                format!("Simulated {id}")
            };
            Decision::new(id.clone())
                .aimed_at(target)
                .with_score(score)
                .with_explanation(format!(
                    "{rationale} {} ({delta:+.1} vs baseline)",
                    describe(&target)
                ))
        })
    }

    /// Expected score of playing `def` at `target`. `None` if the effect
    /// cannot be applied.
    fn simulate(
        &self,
        state: &GameState,
        def: &dyn CardDefinition,
        target: &TargetValue,
        rng: &GameRng,
    ) -> Option<f64> {
        let ctx = state.context();
        let samples = if def.is_randomized() {
            self.config.rollouts.max(1)
        } else {
            1
        };
        let salt = format!("{}@{}", def.id(), target);
        let mut total = 0.0;
        for i in 0..samples {
            let mut child = rng.child(&salt, u64::from(i));
            let out = def.effect(&ctx, &mut child, target);
            let next = apply_ops(state, &out.ops).ok()?;
            total += self.outcome_score(&next, state.current_player);
        }
        Some(total / f64::from(samples))
    }

    fn outcome_score(&self, next: &GameState, player: Player) -> f64 {
        match resolve_wins(next, player, self.config.policy).winner {
            Some(Winner::Player(p)) if p == player => self.config.win_score,
            Some(Winner::Player(_)) => -self.config.win_score,
            Some(Winner::Draw) => 0.0,
            None => evaluate_state(next, player, &self.config),
        }
    }
}

impl Strategy for HeuristicStrategy {
    fn id(&self) -> &'static str {
        "heuristic"
    }

    fn decide(
        &self,
        state: &GameState,
        drawn: &[CardId],
        registry: &CardRegistry,
        rng: &mut GameRng,
    ) -> Decision {
        let decision = self
            .cascade(state, drawn, registry, rng)
            .unwrap_or_else(|| Decision::fallback(drawn, rng));
        debug!(
            strategy = self.id(),
            player = %state.current_player,
            card = %decision.card_id,
            score = ?decision.score,
            explanation = ?decision.explanation,
            "bot decision"
        );
        decision
    }
}

/// First drawn card with `role` that is playable right now.
fn find_role<'a>(
    drawn: &'a [CardId],
    registry: &'a CardRegistry,
    ctx: &MatchContext<'_>,
    role: CardRole,
) -> Option<HandCard<'a>> {
    drawn.iter().find_map(|id| {
        let def = registry.get(id)?;
        (def.role() == role && def.can_play(ctx).is_ok()).then_some((id, def))
    })
}

/// Empty cells where a `player` stone would complete five, row-major.
fn winning_cells(state: &GameState, player: Player) -> Vec<Point> {
    state
        .board
        .empties()
        .into_iter()
        .filter(|&point| {
            apply_ops(state, &[DomainOp::Place { point, player }])
                .ok()
                .and_then(|next| check_win_from_last_move(&next.board))
                .is_some_and(|line| line.player == player)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ThreatStats {
    /// Threat lines the stone belongs to.
    frequency: usize,
    /// Best distance from either end of a threat line.
    centrality: usize,
}

/// Opponent stones that would be part of a five if the opponent played a
/// threat cell.
fn threat_stones(
    board: &Board,
    threats: &[Point],
    opponent: Player,
) -> BTreeMap<Point, ThreatStats> {
    let mut stats: BTreeMap<Point, ThreatStats> = BTreeMap::new();
    for &threat in threats {
        for &(dx, dy) in &DIRECTIONS {
            let back = walk(board, threat, (-dx, -dy), opponent);
            let fwd = walk(board, threat, (dx, dy), opponent);
            let len = back.len() + 1 + fwd.len();
            if len < WIN_LENGTH {
                continue;
            }
            let indexed = back
                .iter()
                .enumerate()
                .map(|(k, p)| (*p, back.len() - 1 - k))
                .chain(fwd.iter().enumerate().map(|(k, p)| (*p, back.len() + 1 + k)));
            for (point, idx) in indexed {
                let entry = stats.entry(point).or_default();
                entry.frequency += 1;
                entry.centrality = entry.centrality.max(idx.min(len - 1 - idx));
            }
        }
    }
    stats
}

/// Consecutive `player` stones stepping away from `from` (exclusive).
fn walk(board: &Board, from: Point, (dx, dy): (i32, i32), player: Player) -> Vec<Point> {
    (1..)
        .map(|k| from.offset(dx, dy, k))
        .take_while(|p| board.owner_at(*p) == Some(player))
        .collect()
}

fn describe(target: &TargetValue) -> String {
    match target {
        TargetValue::None => String::new(),
        TargetValue::Cell { point } => point.to_string(),
        TargetValue::Player { player } => player.to_string(),
    }
}
