//! The five base cards.
//!
//! | Card | Legal when | Target | Ops |
//! |---|---|---|---|
//! | `Place` | an empty cell exists | empty cell | `Place(point, actor)` |
//! | `Take` | an opponent stone exists | opponent cell | `Remove(point)` |
//! | `PolarityInversion` | always | none | `SwapAll` |
//! | `TimeFreeze` | always | opponent | `Freeze(opponent, 1)` |
//! | `SpontaneousGeneration` | at least 5 empty cells | none | 5 random `Place`s |

use std::sync::Arc;

use super::definition::{
    CardDefinition, CardId, CardMeta, CardRole, EffectOutput, MatchContext, Relation, TargetSpec,
    TargetValue,
};
use super::registry::CardRegistry;
use crate::core::error::{CardError, CardErrorCode, RegistryError};
use crate::core::player::Player;
use crate::core::rng::GameRng;
use crate::effects::DomainOp;

pub const PLACE: &str = "Place";
pub const TAKE: &str = "Take";
pub const POLARITY_INVERSION: &str = "PolarityInversion";
pub const TIME_FREEZE: &str = "TimeFreeze";
pub const SPONTANEOUS_GENERATION: &str = "SpontaneousGeneration";

/// Stones spawned by Spontaneous Generation.
pub const SPAWN_COUNT: usize = 5;

/// Identity shared by every base card.
#[derive(Clone, Debug)]
struct CardHeader {
    id: CardId,
    meta: CardMeta,
}

impl CardHeader {
    fn new(id: &str, name: &str, description: &str, icon: &str) -> Self {
        Self {
            id: CardId::new(id),
            meta: CardMeta::new(name, description).with_icon(icon),
        }
    }
}

/// Place one stone on an empty cell.
#[derive(Clone, Debug)]
pub struct PlaceCard {
    header: CardHeader,
}

impl PlaceCard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: CardHeader::new(
                PLACE,
                "Place Stone",
                "Place one stone on an empty cell.",
                "●",
            ),
        }
    }
}

impl Default for PlaceCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDefinition for PlaceCard {
    fn id(&self) -> &CardId {
        &self.header.id
    }

    fn meta(&self) -> &CardMeta {
        &self.header.meta
    }

    fn target(&self) -> TargetSpec {
        TargetSpec::Cell {
            must_be_empty: true,
            must_be_owned_by: None,
        }
    }

    fn role(&self) -> CardRole {
        CardRole::PlaceStone
    }

    fn effect(
        &self,
        ctx: &MatchContext<'_>,
        _rng: &mut GameRng,
        target: &TargetValue,
    ) -> EffectOutput {
        match target.point() {
            Some(point) => EffectOutput::new(vec![DomainOp::Place {
                point,
                player: ctx.current_player,
            }])
            .with_log(format!("Place at {point}")),
            None => EffectOutput::default(),
        }
    }
}

/// Remove one opponent stone.
#[derive(Clone, Debug)]
pub struct TakeCard {
    header: CardHeader,
}

impl TakeCard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: CardHeader::new(TAKE, "Take Stone", "Remove an opponent's stone.", "×"),
        }
    }
}

impl Default for TakeCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDefinition for TakeCard {
    fn id(&self) -> &CardId {
        &self.header.id
    }

    fn meta(&self) -> &CardMeta {
        &self.header.meta
    }

    fn target(&self) -> TargetSpec {
        TargetSpec::Cell {
            must_be_empty: false,
            must_be_owned_by: Some(Relation::Opponent),
        }
    }

    fn role(&self) -> CardRole {
        CardRole::TakeStone
    }

    fn can_play(&self, ctx: &MatchContext<'_>) -> Result<(), CardError> {
        if ctx.board.has_stones_of(ctx.opponent()) {
            Ok(())
        } else {
            Err(CardError::with_message(
                CardErrorCode::CardNotPlayable,
                "No opponent stones",
            ))
        }
    }

    fn effect(
        &self,
        _ctx: &MatchContext<'_>,
        _rng: &mut GameRng,
        target: &TargetValue,
    ) -> EffectOutput {
        match target.point() {
            Some(point) => EffectOutput::new(vec![DomainOp::Remove { point }])
                .with_log(format!("Remove at {point}")),
            None => EffectOutput::default(),
        }
    }
}

/// Swap the owner of every stone.
#[derive(Clone, Debug)]
pub struct PolarityInversionCard {
    header: CardHeader,
}

impl PolarityInversionCard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: CardHeader::new(
                POLARITY_INVERSION,
                "Polarity Inversion",
                "Swap ownership of all stones (1 ↔ 2).",
                "↔",
            ),
        }
    }
}

impl Default for PolarityInversionCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDefinition for PolarityInversionCard {
    fn id(&self) -> &CardId {
        &self.header.id
    }

    fn meta(&self) -> &CardMeta {
        &self.header.meta
    }

    fn target(&self) -> TargetSpec {
        TargetSpec::None
    }

    fn effect(
        &self,
        _ctx: &MatchContext<'_>,
        _rng: &mut GameRng,
        _target: &TargetValue,
    ) -> EffectOutput {
        EffectOutput::new(vec![DomainOp::SwapAll]).with_log("Swap all stones")
    }
}

/// The opponent skips their next turn.
#[derive(Clone, Debug)]
pub struct TimeFreezeCard {
    header: CardHeader,
}

impl TimeFreezeCard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: CardHeader::new(
                TIME_FREEZE,
                "Time Freeze",
                "Opponent skips their next turn.",
                "🕒",
            ),
        }
    }
}

impl Default for TimeFreezeCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDefinition for TimeFreezeCard {
    fn id(&self) -> &CardId {
        &self.header.id
    }

    fn meta(&self) -> &CardMeta {
        &self.header.meta
    }

    fn target(&self) -> TargetSpec {
        TargetSpec::Player {
            relation: Relation::Opponent,
        }
    }

    fn effect(
        &self,
        ctx: &MatchContext<'_>,
        _rng: &mut GameRng,
        target: &TargetValue,
    ) -> EffectOutput {
        let player = target.player().unwrap_or_else(|| ctx.opponent());
        EffectOutput::new(vec![DomainOp::Freeze {
            target: player,
            amount: 1,
        }])
        .with_log("Freeze 1")
    }
}

/// Five stones of random color on random empty cells.
#[derive(Clone, Debug)]
pub struct SpontaneousGenerationCard {
    header: CardHeader,
}

impl SpontaneousGenerationCard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: CardHeader::new(
                SPONTANEOUS_GENERATION,
                "Spontaneous Generation",
                "Randomly place 5 stones with random colors on empty cells.",
                "✨",
            ),
        }
    }
}

impl Default for SpontaneousGenerationCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDefinition for SpontaneousGenerationCard {
    fn id(&self) -> &CardId {
        &self.header.id
    }

    fn meta(&self) -> &CardMeta {
        &self.header.meta
    }

    fn target(&self) -> TargetSpec {
        TargetSpec::None
    }

    fn is_randomized(&self) -> bool {
        true
    }

    fn can_play(&self, ctx: &MatchContext<'_>) -> Result<(), CardError> {
        if ctx.board.count_empties() < SPAWN_COUNT {
            return Err(CardErrorCode::InsufficientEmpties.into());
        }
        Ok(())
    }

    fn effect(
        &self,
        ctx: &MatchContext<'_>,
        rng: &mut GameRng,
        _target: &TargetValue,
    ) -> EffectOutput {
        let picks = rng.shuffle(&ctx.board.empties());
        let ops = picks
            .into_iter()
            .take(SPAWN_COUNT)
            .map(|point| {
                let player = if rng.int(1, 2) == 1 { Player::One } else { Player::Two };
                DomainOp::Place { point, player }
            })
            .collect();
        EffectOutput::new(ops).with_log("Spawn 5 random stones")
    }
}

/// Fresh instances of the base cards, in registration order.
#[must_use]
pub fn base_cards() -> Vec<Arc<dyn CardDefinition>> {
    vec![
        Arc::new(PlaceCard::new()),
        Arc::new(TakeCard::new()),
        Arc::new(PolarityInversionCard::new()),
        Arc::new(TimeFreezeCard::new()),
        Arc::new(SpontaneousGenerationCard::new()),
    ]
}

/// Register the base cards into an existing registry.
pub fn register_base_cards(registry: &mut CardRegistry) -> Result<(), RegistryError> {
    for def in base_cards() {
        registry.register_arc(def)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Point};
    use crate::core::player::PlayerMap;

    fn ctx<'a>(board: &'a Board, skips: &'a PlayerMap<u32>, current: Player) -> MatchContext<'a> {
        MatchContext {
            board,
            current_player: current,
            skip_next_turns: skips,
        }
    }

    #[test]
    fn test_place_effect() {
        let board = Board::new(5).unwrap();
        let skips = PlayerMap::default();
        let ctx = ctx(&board, &skips, Player::Two);
        let mut rng = GameRng::new(1u64);

        let card = PlaceCard::new();
        assert!(card.can_play(&ctx).is_ok());
        assert!(card.is_primary_action());

        let out = card.effect(&ctx, &mut rng, &TargetValue::cell(1, 2));
        assert_eq!(
            out.ops,
            vec![DomainOp::Place {
                point: Point::new(1, 2),
                player: Player::Two
            }]
        );
        assert_eq!(out.log.as_deref(), Some("Place at (1,2)"));
    }

    #[test]
    fn test_take_requires_opponent_stone() {
        let mut board = Board::new(5).unwrap();
        board.place(Point::new(0, 0), Player::One).unwrap();
        let skips = PlayerMap::default();
        let card = TakeCard::new();

        let err = card.can_play(&ctx(&board, &skips, Player::One)).unwrap_err();
        assert_eq!(err.code, CardErrorCode::CardNotPlayable);
        assert!(card.can_play(&ctx(&board, &skips, Player::Two)).is_ok());

        let ctx = ctx(&board, &skips, Player::Two);
        assert!(card.validate_target(&ctx, &TargetValue::cell(0, 0)).is_ok());
        assert_eq!(
            card.validate_target(&ctx, &TargetValue::cell(1, 1)).unwrap_err().code,
            CardErrorCode::CellEmpty
        );
    }

    #[test]
    fn test_time_freeze_targets_opponent() {
        let board = Board::new(5).unwrap();
        let skips = PlayerMap::default();
        let ctx = ctx(&board, &skips, Player::One);
        let mut rng = GameRng::new(1u64);
        let card = TimeFreezeCard::new();

        let target = TargetValue::Player { player: Player::Two };
        assert!(card.validate_target(&ctx, &target).is_ok());
        assert_eq!(
            card.effect(&ctx, &mut rng, &target).ops,
            vec![DomainOp::Freeze {
                target: Player::Two,
                amount: 1
            }]
        );
    }

    #[test]
    fn test_spontaneous_generation() {
        let board = Board::new(4).unwrap();
        let skips = PlayerMap::default();
        let ctx = ctx(&board, &skips, Player::One);
        let card = SpontaneousGenerationCard::new();

        let out_a = card.effect(&ctx, &mut GameRng::new("spawn"), &TargetValue::None);
        let out_b = card.effect(&ctx, &mut GameRng::new("spawn"), &TargetValue::None);
        assert_eq!(out_a, out_b);
        assert_eq!(out_a.ops.len(), SPAWN_COUNT);

        let mut points: Vec<_> = out_a
            .ops
            .iter()
            .filter_map(|op| match op {
                DomainOp::Place { point, .. } => Some(*point),
                _ => None,
            })
            .collect();
        points.sort();
        points.dedup();
        assert_eq!(points.len(), SPAWN_COUNT);
    }

    #[test]
    fn test_spontaneous_generation_needs_five_empties() {
        let mut board = Board::new(2).unwrap();
        let skips = PlayerMap::default();
        let card = SpontaneousGenerationCard::new();
        assert_eq!(
            card.can_play(&ctx(&board, &skips, Player::One)).unwrap_err().code,
            CardErrorCode::InsufficientEmpties
        );

        board = Board::new(3).unwrap();
        assert!(card.can_play(&ctx(&board, &skips, Player::One)).is_ok());
    }

    #[test]
    fn test_register_base_cards_twice_fails() {
        let mut registry = CardRegistry::new();
        register_base_cards(&mut registry).unwrap();
        assert_eq!(registry.len(), 5);
        assert!(matches!(
            register_base_cards(&mut registry),
            Err(RegistryError::DuplicateId(_))
        ));
    }
}
