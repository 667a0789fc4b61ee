//! Generic legality checks derived from a `TargetSpec`.
//!
//! `can_play_by_target_spec` and `validate_target_by_spec` must agree: any
//! target accepted by the latter is one the former would have found had it
//! enumerated targets. `legal_targets` is that enumeration.

use super::definition::{CardDefinition, MatchContext, Relation, TargetSpec, TargetValue};
use crate::board::CellValue;
use crate::core::error::{CardError, CardErrorCode};
use crate::core::player::Player;

/// Coarse check: a cell card that needs an empty cell is unplayable on a
/// full board. Everything else is playable.
pub fn can_play_by_target_spec(ctx: &MatchContext<'_>, spec: &TargetSpec) -> Result<(), CardError> {
    if let TargetSpec::Cell { must_be_empty: true, .. } = spec {
        if ctx.board.count_empties() == 0 {
            return Err(CardError::with_message(
                CardErrorCode::InsufficientEmpties,
                "No empty cells available",
            ));
        }
    }
    Ok(())
}

/// Check one target against a spec.
pub fn validate_target_by_spec(
    ctx: &MatchContext<'_>,
    spec: &TargetSpec,
    target: &TargetValue,
) -> Result<TargetValue, CardError> {
    match (spec, target) {
        (TargetSpec::None, TargetValue::None) => Ok(*target),
        (TargetSpec::Player { relation }, TargetValue::Player { player }) => {
            if *player == relation.resolve(ctx.current_player) {
                Ok(*target)
            } else {
                Err(match relation {
                    Relation::Own => CardErrorCode::TargetIsSelf,
                    Relation::Opponent => CardErrorCode::TargetNotOpponent,
                }
                .into())
            }
        }
        (
            TargetSpec::Cell {
                must_be_empty,
                must_be_owned_by,
            },
            TargetValue::Cell { point },
        ) => {
            let cell = ctx
                .board
                .cell(*point)
                .ok_or(CardError::new(CardErrorCode::OutOfBounds))?;
            if *must_be_empty && !cell.is_empty() {
                return Err(CardErrorCode::CellOccupied.into());
            }
            let owner = cell.owner();
            match must_be_owned_by {
                Some(Relation::Own) if owner != Some(ctx.current_player) => {
                    Err(CardErrorCode::InvalidTarget.into())
                }
                Some(Relation::Opponent) if owner == Some(ctx.current_player) => {
                    Err(CardErrorCode::InvalidTarget.into())
                }
                Some(_) if cell == CellValue::Empty => Err(CardErrorCode::CellEmpty.into()),
                _ => Ok(*target),
            }
        }
        _ => Err(CardErrorCode::InvalidTarget.into()),
    }
}

/// Every target `def` would accept right now, in a stable order (row-major
/// cells, then seat order for players). Empty when the card is unplayable.
#[must_use]
pub fn legal_targets(def: &dyn CardDefinition, ctx: &MatchContext<'_>) -> Vec<TargetValue> {
    if def.can_play(ctx).is_err() {
        return Vec::new();
    }
    let candidates: Vec<TargetValue> = match def.target() {
        TargetSpec::None => vec![TargetValue::None],
        TargetSpec::Cell { .. } => ctx
            .board
            .points()
            .map(|point| TargetValue::Cell { point })
            .collect(),
        TargetSpec::Player { .. } => Player::BOTH
            .into_iter()
            .map(|player| TargetValue::Player { player })
            .collect(),
    };
    candidates
        .into_iter()
        .filter(|t| def.validate_target(ctx, t).is_ok())
        .collect()
}
