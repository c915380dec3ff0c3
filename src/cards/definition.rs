//! Card definitions - static card data.
//!
//! A `CardDefinition` holds the immutable combat properties of a card:
//! the damage it deals when it attacks and the weight it costs to play.
//! Board zones only ever store `CardId`s; everything else is looked up
//! in the `CardRegistry`.

use serde::{Deserialize, Serialize};

/// Identifier of a card definition.
///
/// Serialized as a bare integer, which is how decks appear in battle records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use battle_engine::cards::{CardDefinition, CardId};
///
/// let golem = CardDefinition::new(CardId::new(7), "Bramble Golem")
///     .with_damage(4)
///     .with_weight(3);
///
/// assert_eq!(golem.damage, 4);
/// assert_eq!(golem.weight, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    /// Health removed from the opponent when this card attacks.
    #[serde(default)]
    pub damage: u32,
    /// Weight ammo spent to play this card.
    #[serde(default)]
    pub weight: u32,
}

impl CardDefinition {
    /// Create a card with zero damage and zero weight.
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            damage: 0,
            weight: 0,
        }
    }

    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}
