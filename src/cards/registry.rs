//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition a battle can reference.
//! Actions and the rule engine resolve damage and weight through it.

use std::path::Path;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::error::ConfigError;

/// Built-in catalog: (name, damage, weight), ids assigned in order from 0.
const STANDARD_CARDS: &[(&str, u32, u32)] = &[
    ("Ember Sprite", 1, 1),
    ("Tin Squire", 1, 1),
    ("Marsh Rat", 2, 1),
    ("Hollow Archer", 2, 2),
    ("Cinder Hound", 3, 2),
    ("Gravel Knight", 2, 3),
    ("Storm Adept", 4, 3),
    ("Bramble Golem", 4, 4),
    ("Ash Wyrmling", 5, 4),
    ("Iron Colossus", 6, 5),
    ("Dusk Reaver", 7, 6),
    ("Elder Drake", 9, 7),
];

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use battle_engine::cards::{CardRegistry, CardDefinition, CardId};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(1), "Marsh Rat").with_damage(2));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.damage, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in twelve-card catalog, ids 0 through 11.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (id, &(name, damage, weight)) in STANDARD_CARDS.iter().enumerate() {
            registry.register(
                CardDefinition::new(CardId::new(id as u32), name)
                    .with_damage(damage)
                    .with_weight(weight),
            );
        }
        registry
    }

    /// Load a catalog from a JSON array of card definitions.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for card in definitions {
            if registry.contains(card.id) {
                return Err(ConfigError::DuplicateCard(card.id));
            }
            registry.register(card);
        }
        Ok(registry)
    }

    /// Load a catalog file. See `from_json_str`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, panicking if not found.
    ///
    /// Board zones only ever hold registered ids, so a miss here means a
    /// deck was dealt with cards the registry does not know.
    #[must_use]
    pub fn get_unchecked(&self, id: CardId) -> &CardDefinition {
        match self.cards.get(&id) {
            Some(card) => card,
            None => panic!("{id} not found in registry"),
        }
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
