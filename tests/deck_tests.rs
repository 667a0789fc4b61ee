//! Deck tests.
//!
//! Building from counts, first-draw guarantees, draw/discard and the
//! reshuffle of the discard pile.

use std::collections::BTreeMap;

use card_gomoku::cards::{
    CardDefinition, CardId, CardMeta, CardRegistry, EffectOutput, MatchContext, TargetSpec,
    TargetValue,
};
use card_gomoku::core::{default_deck_counts, DeckCounts, GameRng};
use card_gomoku::deck::DeckState;

/// A card with no effect, for deck-only tests.
#[derive(Debug)]
struct Blank {
    id: CardId,
    meta: CardMeta,
}

impl Blank {
    fn new(id: &str) -> Self {
        Self {
            id: CardId::new(id),
            meta: CardMeta::new(id, "does nothing"),
        }
    }
}

impl CardDefinition for Blank {
    fn id(&self) -> &CardId {
        &self.id
    }

    fn meta(&self) -> &CardMeta {
        &self.meta
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
        EffectOutput::default()
    }
}

fn counts(entries: &[(&str, i64)]) -> DeckCounts {
    entries.iter().map(|&(id, n)| (CardId::new(id), n)).collect()
}

/// Test the three-card reshuffle scenario: draw 2, discard 1, draw 3.
#[test]
fn test_reshuffle_mid_draw() {
    let mut registry = CardRegistry::new();
    registry.register(Blank::new("A")).unwrap();
    let mut rng = GameRng::new("x");

    let cards = DeckState::build_shuffled(&mut rng, &counts(&[("A", 3)]), &registry, true);
    assert_eq!(cards.len(), 3);
    let mut deck = DeckState::from_piles(cards, Vec::new());

    let first = deck.draw(2, &mut rng);
    assert_eq!(first.len(), 2);
    assert_eq!(deck.draw_pile().len(), 1);

    deck.discard(&first[..1]);
    let second = deck.draw(3, &mut rng);

    // One card from the draw pile, then the discard pile is reshuffled in.
    assert_eq!(second.len(), 2);
    assert!(deck.draw_pile().is_empty());
    assert!(deck.discard_pile().is_empty());
    assert!(first.len() - 1 + second.len() <= 3);
}

/// Test that unknown ids and non-positive counts are dropped.
#[test]
fn test_build_from_counts_filters() {
    let registry = CardRegistry::with_base_cards();
    let cards = DeckState::build_from_counts(
        &counts(&[("Place", 2), ("Take", 0), ("TimeFreeze", -3), ("Mystery", 4)]),
        &registry,
    );
    assert_eq!(cards, vec![CardId::new("Place"), CardId::new("Place")]);
}

/// Test that the default deck always opens with a Place card.
#[test]
fn test_first_draw_is_playable_for_many_seeds() {
    let registry = CardRegistry::with_base_cards();
    for seed in 0..50u64 {
        let mut rng = GameRng::new(seed);
        let cards = DeckState::build_shuffled(&mut rng, &default_deck_counts(), &registry, true);
        let mut deck = DeckState::from_piles(cards, Vec::new());
        let hand = deck.draw(2, &mut rng);
        assert!(hand.contains(&CardId::new("Place")), "seed {seed}: {hand:?}");
    }
}

/// Test that without the guarantee the deck is a plain shuffle.
#[test]
fn test_plain_shuffle_matches_rng() {
    let registry = CardRegistry::with_base_cards();
    let deck_counts = default_deck_counts();

    let plain = DeckState::build_shuffled(&mut GameRng::new("s"), &deck_counts, &registry, false);
    let flat = DeckState::build_from_counts(&deck_counts, &registry);
    assert_eq!(plain, GameRng::new("s").shuffle(&flat));
}

/// Test that draw and discard conserve the multiset over a long run.
#[test]
fn test_conservation_over_many_turns() {
    let registry = CardRegistry::with_base_cards();
    let mut rng = GameRng::new("conserve");
    let cards = DeckState::build_shuffled(&mut rng, &default_deck_counts(), &registry, true);

    let mut expected: BTreeMap<CardId, usize> = BTreeMap::new();
    for c in &cards {
        *expected.entry(c.clone()).or_default() += 1;
    }

    let mut deck = DeckState::from_piles(cards, Vec::new());
    for _ in 0..100 {
        let hand = deck.draw(2, &mut rng);
        assert_eq!(hand.len(), 2);
        deck.discard(&hand);

        let mut seen: BTreeMap<CardId, usize> = BTreeMap::new();
        for c in deck.draw_pile().iter().chain(deck.discard_pile().iter()) {
            *seen.entry(c.clone()).or_default() += 1;
        }
        assert_eq!(seen, expected);
    }
}

/// Test that an exhausted deck yields a short draw, not an error.
#[test]
fn test_partial_draw() {
    let mut rng = GameRng::new(1u64);
    let mut deck = DeckState::from_piles(vec![CardId::new("Place")], Vec::new());
    assert_eq!(deck.draw(2, &mut rng), vec![CardId::new("Place")]);
    assert!(deck.draw(2, &mut rng).is_empty());
}
