//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A battle always has exactly two sides: the top player (index 0) and the
//! bottom player (index 1). Record files and action params carry the raw
//! index, so the numbering is part of the persisted format.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of sides in a battle.
pub const PLAYER_COUNT: usize = 2;

/// Player identifier. Only `TOP` (0) and `BOT` (1) are valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The top player. Acts first.
    pub const TOP: PlayerId = PlayerId(0);

    /// The bottom player.
    pub const BOT: PlayerId = PlayerId(1);

    /// Create a player ID from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < PLAYER_COUNT as u8, "player index must be 0 or 1");
        Self(id)
    }

    /// Parse a player index from an action param value.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::TOP),
            "1" => Some(Self::BOT),
            _ => None,
        }
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other side of the battle.
    #[must_use]
    pub const fn opponent(self) -> Self {
        PlayerId(1 - self.0)
    }

    /// Both players, top first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::TOP, Self::BOT].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use battle_engine::core::{PlayerId, PlayerMap};
///
/// let mut health: PlayerMap<u32> = PlayerMap::with_value(30);
/// health[PlayerId::BOT] -= 4;
///
/// assert_eq!(health[PlayerId::TOP], 30);
/// assert_eq!(health[PlayerId::BOT], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::TOP), factory(PlayerId::BOT)],
        }
    }

    /// Create a PlayerMap from the top and bottom entries.
    pub fn from_pair(top: T, bot: T) -> Self {
        Self { data: [top, bot] }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
