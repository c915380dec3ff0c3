//! The battle record written to disk.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionRequest, ExtraActionParams};
use crate::cards::CardId;
use crate::core::BattleRules;
use crate::engine::SerializableGameActionEvent;

/// One serialized action. The name is kept as a string so records with
/// names this build does not know can still be loaded and reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub name: String,
    #[serde(default)]
    pub params: ExtraActionParams,
}

impl From<SerializableGameActionEvent> for RecordedAction {
    fn from(event: SerializableGameActionEvent) -> Self {
        Self {
            name: event.action_name.as_str().to_string(),
            params: event.extra_action_params,
        }
    }
}

impl From<ActionRequest> for RecordedAction {
    fn from(request: ActionRequest) -> Self {
        Self {
            name: request.name.as_str().to_string(),
            params: request.params,
        }
    }
}

/// Everything needed to rebuild a battle: the seed, both starting decks
/// and the ordered externally pushed actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub seed: u64,
    pub top_player_deck: Vec<CardId>,
    pub bot_player_deck: Vec<CardId>,
    pub actions: Vec<RecordedAction>,
    /// Rules the battle was played under. Absent in plain game records.
    #[serde(default)]
    pub setup: Option<BattleRules>,
}

impl GameRecord {
    #[must_use]
    pub fn new(seed: u64, top_player_deck: Vec<CardId>, bot_player_deck: Vec<CardId>) -> Self {
        Self {
            seed,
            top_player_deck,
            bot_player_deck,
            actions: Vec::new(),
            setup: None,
        }
    }
}
