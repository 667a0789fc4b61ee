//! Deck: draw and discard piles with reshuffle-on-exhaustion.
//!
//! ## Ordering
//!
//! The back of the draw pile is the next card drawn. The discard pile keeps
//! append order. When the draw pile runs out mid-draw, the discard pile is
//! shuffled with the match RNG and becomes the new draw pile.
//!
//! ## Conservation
//!
//! `draw` moves cards out of the piles and `discard` moves them back. No
//! operation here creates or destroys a card; callers own whatever they
//! drew until they discard it.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cards::{CardId, CardRegistry};
use crate::core::config::DeckCounts;
use crate::core::rng::GameRng;

/// Draw and discard piles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckState {
    draw_pile: Vector<CardId>,
    discard_pile: Vector<CardId>,
}

impl DeckState {
    /// Shuffle `initial` into a fresh draw pile with an empty discard.
    #[must_use]
    pub fn new(initial: &[CardId], rng: &mut GameRng) -> Self {
        Self::from_piles(rng.shuffle(initial), Vector::new())
    }

    /// Use the piles as given. The last draw-pile element is drawn first.
    #[must_use]
    pub fn from_piles(
        draw_pile: impl IntoIterator<Item = CardId>,
        discard_pile: impl IntoIterator<Item = CardId>,
    ) -> Self {
        Self {
            draw_pile: draw_pile.into_iter().collect(),
            discard_pile: discard_pile.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn draw_pile(&self) -> &Vector<CardId> {
        &self.draw_pile
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Vector<CardId> {
        &self.discard_pile
    }

    /// Cards in both piles.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    /// Draw up to `n` cards, reshuffling the discard pile when the draw pile
    /// runs out. Returns fewer than `n` only when both piles are empty.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> Vec<CardId> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    debug!(requested = n, drawn = out.len(), "deck exhausted");
                    break;
                }
                let pile: Vec<CardId> =
                    std::mem::take(&mut self.discard_pile).into_iter().collect();
                self.draw_pile = rng.shuffle(&pile).into_iter().collect();
                debug!(cards = self.draw_pile.len(), "reshuffled discard pile into draw pile");
            }
            if let Some(card) = self.draw_pile.pop_back() {
                out.push(card);
            }
        }
        trace!(?out, "drew cards");
        out
    }

    /// Append cards to the discard pile in the given order.
    pub fn discard(&mut self, cards: &[CardId]) {
        self.discard_pile.extend(cards.iter().cloned());
    }

    /// Expand a count map into a flat multiset in key order.
    ///
    /// Ids missing from `registry` and non-positive counts are skipped.
    #[must_use]
    pub fn build_from_counts(counts: &DeckCounts, registry: &CardRegistry) -> Vec<CardId> {
        counts
            .iter()
            .filter(|(id, &count)| count > 0 && registry.contains(id))
            .flat_map(|(id, &count)| std::iter::repeat(id.clone()).take(count as usize))
            .collect()
    }

    /// Build and shuffle a deck.
    ///
    /// With `ensure_first_playable`, a primary-action card is swapped into
    /// the back of the pile so the first draw contains one. If several
    /// primary-action ids are present the lexically smallest is used, and
    /// its occurrence nearest the back is the one moved.
    #[must_use]
    pub fn build_shuffled(
        rng: &mut GameRng,
        counts: &DeckCounts,
        registry: &CardRegistry,
        ensure_first_playable: bool,
    ) -> Vec<CardId> {
        let cards = Self::build_from_counts(counts, registry);
        let mut deck = rng.shuffle(&cards);
        if !ensure_first_playable || deck.is_empty() {
            return deck;
        }

        let primary = deck
            .iter()
            .filter(|id| registry.get(id).is_some_and(|def| def.is_primary_action()))
            .min()
            .cloned();
        if let Some(primary) = primary {
            if let Some(pos) = deck.iter().rposition(|id| *id == primary) {
                let last = deck.len() - 1;
                deck.swap(pos, last);
            }
        }
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|n| CardId::new(n)).collect()
    }

    #[test]
    fn test_new_keeps_multiset() {
        let mut rng = GameRng::new("deck");
        let initial = ids(&["A", "B", "C", "C"]);
        let deck = DeckState::new(&initial, &mut rng);

        let mut drawn: Vec<_> = deck.draw_pile().iter().cloned().collect();
        drawn.sort();
        assert_eq!(drawn, initial);
        assert!(deck.discard_pile().is_empty());
    }

    #[test]
    fn test_draw_pops_from_back() {
        let mut rng = GameRng::new(1u64);
        let mut deck = DeckState::from_piles(ids(&["Other", "Place"]), Vec::new());

        assert_eq!(deck.draw(2, &mut rng), ids(&["Place", "Other"]));
        assert_eq!(deck.total_cards(), 0);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut rng = GameRng::new("deck-seed");
        let mut deck = DeckState::new(&ids(&["A", "B", "C"]), &mut rng);

        let hand = deck.draw(2, &mut rng);
        deck.discard(&hand[..1]);

        let second = deck.draw(3, &mut rng);
        assert_eq!(second.len(), 2);
        assert!(deck.discard_pile().is_empty());
        assert_eq!(deck.total_cards(), 0);
    }

    #[test]
    fn test_partial_draw() {
        let mut rng = GameRng::new(1u64);
        let mut deck = DeckState::new(&ids(&["X"]), &mut rng);
        assert_eq!(deck.draw(3, &mut rng).len(), 1);
        assert!(deck.draw(1, &mut rng).is_empty());
    }

    #[test]
    fn test_discard_appends_in_order() {
        let mut deck = DeckState::default();
        deck.discard(&ids(&["B", "A"]));
        deck.discard(&ids(&["C"]));
        let pile: Vec<_> = deck.discard_pile().iter().cloned().collect();
        assert_eq!(pile, ids(&["B", "A", "C"]));
    }

    #[test]
    fn test_build_from_counts_drops_unknown_and_nonpositive() {
        let registry = CardRegistry::with_base_cards();
        let counts: DeckCounts = [
            ("Place", 2),
            ("Take", 1),
            ("UnknownX", 5),
            ("TimeFreeze", 0),
            ("PolarityInversion", -3),
        ]
        .into_iter()
        .map(|(id, n)| (CardId::new(id), n))
        .collect();

        let deck = DeckState::build_from_counts(&counts, &registry);
        assert_eq!(deck.iter().filter(|c| *c == &CardId::new("Place")).count(), 2);
        assert_eq!(deck.iter().filter(|c| *c == &CardId::new("Take")).count(), 1);
        assert_eq!(deck.len(), 3);
    }

    #[test]
    fn test_build_shuffled_puts_primary_on_top() {
        let registry = CardRegistry::with_base_cards();
        let counts: DeckCounts = [(CardId::new("Place"), 1), (CardId::new("Take"), 3)]
            .into_iter()
            .collect();

        for seed in ["seed-deck-place", "a", "b", "c"] {
            let mut rng = GameRng::new(seed);
            let deck = DeckState::build_shuffled(&mut rng, &counts, &registry, true);
            assert_eq!(deck.last(), Some(&CardId::new("Place")));
            assert_eq!(deck.len(), 4);
        }
    }

    #[test]
    fn test_build_shuffled_without_guarantee() {
        let registry = CardRegistry::with_base_cards();
        let counts: DeckCounts = [(CardId::new("Place"), 1), (CardId::new("Take"), 5)]
            .into_iter()
            .collect();

        let mut a = GameRng::new("seed-no-ensure");
        let mut b = GameRng::new("seed-no-ensure");
        let deck = DeckState::build_shuffled(&mut a, &counts, &registry, false);
        let plain = b.shuffle(&DeckState::build_from_counts(&counts, &registry));
        assert_eq!(deck, plain);
        assert!(deck.contains(&CardId::new("Place")));
    }
}
