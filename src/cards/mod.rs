//! Card system: definitions, validation, registry, and the base card set.
//!
//! ## Key Types
//!
//! - `CardId`: string identifier for card definitions
//! - `CardDefinition`: trait every card implements
//! - `TargetSpec` / `TargetValue`: what a card needs and what it was given
//! - `CardRegistry`: card definition lookup
//!
//! New cards implement `CardDefinition` and express every state change as
//! `DomainOp`s; they never mutate the board directly.

pub mod base;
pub mod definition;
pub mod registry;
pub mod validate;

pub use base::{
    base_cards, register_base_cards, PlaceCard, PolarityInversionCard, SpontaneousGenerationCard,
    TakeCard, TimeFreezeCard,
};
pub use definition::{
    CardDefinition, CardId, CardMeta, CardRole, EffectOutput, MatchContext, Relation, TargetSpec,
    TargetValue,
};
pub use registry::CardRegistry;
pub use validate::{can_play_by_target_spec, legal_targets, validate_target_by_spec};
