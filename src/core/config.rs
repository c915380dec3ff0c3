//! Engine configuration.
//!
//! Hosts configure the engine at startup by providing an `EngineConfig`:
//! - `EngineOperationMode`: whether animation phases run or are skipped
//! - `AnimationTimings`: duration of each timed action animation
//! - `BattleRules`: tunable rule parameters (health, draws, discards)
//! - `DataFileFormat`: encoding used when flushing battle records
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```
//! use battle_engine::core::{EngineConfig, EngineOperationMode};
//!
//! let config = EngineConfig::from_json_str(r#"{ "operationMode": "headless" }"#).unwrap();
//! assert_eq!(config.operation_mode, EngineOperationMode::Headless);
//! assert_eq!(config.rules.starting_health, 30);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::persistence::DataFileFormat;

/// How the engine drives the animation phase of each action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineOperationMode {
    /// Actions are held at the queue head until their animation finishes.
    #[default]
    Animated,
    /// Animation phases are skipped; each update completes the head action.
    Headless,
}

/// Duration of each timed action animation, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationTimings {
    pub draw_card_ms: u32,
    pub play_card_ms: u32,
    pub next_player_ms: u32,
    pub card_attack_ms: u32,
    pub card_destruction_ms: u32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            draw_card_ms: 400,
            play_card_ms: 1000,
            next_player_ms: 1000,
            card_attack_ms: 650,
            card_destruction_ms: 500,
        }
    }
}

/// Tunable battle rules.
///
/// A snapshot of these is written into battle records, so replays run
/// under the rules the battle was played with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleRules {
    /// Health each player starts the battle with.
    pub starting_health: u32,
    /// Cards drawn by the newly active player at the start of a turn.
    pub cards_drawn_per_turn: u32,
    /// Whether the player whose turn ended discards their remaining hand.
    pub discard_held_cards_on_turn_end: bool,
    /// Whether both decks are shuffled with the battle seed at setup.
    pub shuffle_decks: bool,
    /// Whether a card play is checked against the player's weight ammo.
    /// When off, plays are never aborted and weight ammo floors at zero.
    pub enforce_weight_ammo: bool,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            starting_health: 30,
            cards_drawn_per_turn: 1,
            discard_held_cards_on_turn_end: true,
            shuffle_decks: false,
            enforce_weight_ammo: true,
        }
    }
}

impl BattleRules {
    #[must_use]
    pub fn with_starting_health(mut self, health: u32) -> Self {
        self.starting_health = health;
        self
    }

    #[must_use]
    pub fn with_cards_drawn_per_turn(mut self, count: u32) -> Self {
        self.cards_drawn_per_turn = count;
        self
    }

    #[must_use]
    pub fn with_discard_held_cards_on_turn_end(mut self, discard: bool) -> Self {
        self.discard_held_cards_on_turn_end = discard;
        self
    }

    #[must_use]
    pub fn with_shuffle_decks(mut self, shuffle: bool) -> Self {
        self.shuffle_decks = shuffle;
        self
    }

    #[must_use]
    pub fn with_enforce_weight_ammo(mut self, enforce: bool) -> Self {
        self.enforce_weight_ammo = enforce;
        self
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub operation_mode: EngineOperationMode,
    /// Log every action transition at debug level.
    pub log_action_transitions: bool,
    pub animation: AnimationTimings,
    pub rules: BattleRules,
    pub data_file_format: DataFileFormat,
}

impl EngineConfig {
    /// Default configuration with animations skipped.
    #[must_use]
    pub fn headless() -> Self {
        Self::default().with_operation_mode(EngineOperationMode::Headless)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn with_operation_mode(mut self, mode: EngineOperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    #[must_use]
    pub fn with_action_transition_logging(mut self, enabled: bool) -> Self {
        self.log_action_transitions = enabled;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationTimings) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: BattleRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_data_file_format(mut self, format: DataFileFormat) -> Self {
        self.data_file_format = format;
        self
    }
}
