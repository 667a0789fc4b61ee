//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition for a match. It provides
//! fast lookup by `CardId` and iterates in registration order.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::base::base_cards;
use super::definition::{CardDefinition, CardId, CardMeta};
use crate::core::error::RegistryError;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use card_gomoku::cards::CardRegistry;
///
/// let registry = CardRegistry::with_base_cards();
///
/// let place = registry.require("Place").unwrap();
/// assert_eq!(place.meta().name, "Place Stone");
/// assert!(registry.get("Nope").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    defs: Vec<Arc<dyn CardDefinition>>,
    index: FxHashMap<CardId, usize>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the five base cards.
    #[must_use]
    pub fn with_base_cards() -> Self {
        let mut registry = Self::new();
        for def in base_cards() {
            registry.insert(def);
        }
        registry
    }

    /// Register a card definition.
    pub fn register(&mut self, def: impl CardDefinition + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(def))
    }

    /// Register a shared card definition.
    pub fn register_arc(&mut self, def: Arc<dyn CardDefinition>) -> Result<(), RegistryError> {
        let id = def.id().clone();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.insert(def);
        Ok(())
    }

    fn insert(&mut self, def: Arc<dyn CardDefinition>) {
        self.index.insert(def.id().clone(), self.defs.len());
        self.defs.push(def);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: impl AsRef<str>) -> Option<&dyn CardDefinition> {
        self.index
            .get(id.as_ref())
            .map(|&idx| &*self.defs[idx])
    }

    /// Get a card definition by ID, failing on unknown ids.
    pub fn require(&self, id: impl AsRef<str>) -> Result<&dyn CardDefinition, RegistryError> {
        let id = id.as_ref();
        self.get(id)
            .ok_or_else(|| RegistryError::UnknownId(CardId::new(id)))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.index.contains_key(id.as_ref())
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate over definitions in registration order.
    pub fn list(&self) -> impl Iterator<Item = &dyn CardDefinition> {
        self.defs.iter().map(|def| &**def)
    }

    /// Display data for every card, keyed by id.
    #[must_use]
    pub fn meta_map(&self) -> BTreeMap<CardId, CardMeta> {
        self.list()
            .map(|def| (def.id().clone(), def.meta().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::base::PlaceCard;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CardRegistry::new();
        assert!(registry.is_empty());

        registry.register(PlaceCard::new()).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Place"));
        assert!(registry.contains(&CardId::new("Place")));
        assert_eq!(registry.get("Place").unwrap().id(), &CardId::new("Place"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = CardRegistry::new();
        registry.register(PlaceCard::new()).unwrap();

        let err = registry.register(PlaceCard::new()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId(CardId::new("Place")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_unknown() {
        let registry = CardRegistry::with_base_cards();
        let err = registry.require("Other").unwrap_err();
        assert_eq!(err, RegistryError::UnknownId(CardId::new("Other")));
    }

    #[test]
    fn test_list_in_registration_order() {
        let registry = CardRegistry::with_base_cards();
        let ids: Vec<_> = registry.list().map(|d| d.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["Place", "Take", "PolarityInversion", "TimeFreeze", "SpontaneousGeneration"]
        );
    }

    #[test]
    fn test_meta_map() {
        let registry = CardRegistry::with_base_cards();
        let meta = registry.meta_map();
        assert_eq!(meta.len(), 5);
        assert_eq!(meta["Take"].name, "Take Stone");
    }
}
