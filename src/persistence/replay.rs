//! Re-driving a fresh engine from a battle record.

use std::path::Path;

use tracing::{debug, debug_span, info};

use super::data_file::{read_data_file, DataFileFormat};
use super::record::GameRecord;
use crate::actions::{params, ActionName, ActionRequest};
use crate::cards::{CardId, CardRegistry};
use crate::core::{BattleRules, EngineConfig, EngineOperationMode};
use crate::engine::GameActionEngine;
use crate::error::ReplayError;

/// Loads a record and pushes its actions through the same
/// `GameActionEngine::push_action` used for live play.
///
/// Every entry is validated before the first push. Names and params are
/// always checked. When the target engine is idle the record is also played
/// on a headless copy of its board first, so an entry that would draw from
/// an empty pool or play a missing held card is reported as
/// `ReplayError::InconsistentAction` instead of panicking mid-replay.
#[derive(Clone, Debug)]
pub struct GameReplayEngine {
    record: GameRecord,
}

impl GameReplayEngine {
    /// Load a record, picking the format from the file extension. Files
    /// without a known extension are read as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let format = DataFileFormat::from_path(path).unwrap_or_default();
        Self::from_file_with_format(path, format)
    }

    pub fn from_file_with_format(path: &Path, format: DataFileFormat) -> Result<Self, ReplayError> {
        let record: GameRecord = read_data_file(path, format)?;
        info!(
            path = %path.display(),
            seed = record.seed,
            actions = record.actions.len(),
            "game record loaded"
        );
        Ok(Self::from_record(record))
    }

    #[must_use]
    pub fn from_record(record: GameRecord) -> Self {
        Self { record }
    }

    #[must_use]
    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    #[must_use]
    pub fn game_file_seed(&self) -> u64 {
        self.record.seed
    }

    #[must_use]
    pub fn top_player_deck(&self) -> &[CardId] {
        &self.record.top_player_deck
    }

    #[must_use]
    pub fn bot_player_deck(&self) -> &[CardId] {
        &self.record.bot_player_deck
    }

    /// Rules stored with the record, if it was written by `BattleSerializer`.
    #[must_use]
    pub fn battle_rules(&self) -> Option<&BattleRules> {
        self.record.setup.as_ref()
    }

    /// A fresh engine seeded and dealt like the recorded battle. Stored
    /// rules take precedence over `config.rules`.
    #[must_use]
    pub fn build_engine(&self, config: EngineConfig, cards: CardRegistry) -> GameActionEngine {
        let config = match self.battle_rules() {
            Some(rules) => config.with_rules(rules.clone()),
            None => config,
        };
        GameActionEngine::new(
            config,
            cards,
            self.record.seed,
            &self.record.top_player_deck,
            &self.record.bot_player_deck,
        )
    }

    /// Check every recorded entry and turn it into a request.
    pub fn validated_actions(&self) -> Result<Vec<ActionRequest>, ReplayError> {
        self.record
            .actions
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let name: ActionName = entry.name.parse().map_err(|_| ReplayError::UnknownAction {
                    index,
                    name: entry.name.clone(),
                })?;
                if !name.is_serializable() {
                    return Err(ReplayError::NotReplayable {
                        index,
                        action: entry.name.clone(),
                    });
                }

                for &param in name.required_extra_param_names() {
                    let Some(value) = entry.params.get(param) else {
                        return Err(ReplayError::MissingExtraParam {
                            index,
                            action: entry.name.clone(),
                            param: param.to_string(),
                        });
                    };
                    let malformed = param == params::LAST_PLAYED_CARD_INDEX
                        && value.trim().parse::<usize>().is_err();
                    if malformed {
                        return Err(ReplayError::MalformedExtraParam {
                            index,
                            action: entry.name.clone(),
                            param: param.to_string(),
                            value: value.clone(),
                        });
                    }
                }

                Ok(ActionRequest {
                    name,
                    params: entry.params.clone(),
                })
            })
            .collect()
    }

    /// Push every recorded action onto `engine`. Returns the number pushed.
    ///
    /// The caller drives the engine afterwards (`update_until_idle` for a
    /// headless replay).
    pub fn replay_actions(&self, engine: &mut GameActionEngine) -> Result<usize, ReplayError> {
        let actions = self.validated_actions()?;
        if engine.is_idle() {
            check_against_board(engine, &actions)?;
        }
        let count = actions.len();
        for request in actions {
            debug!(action = %request.name, "replaying action");
            engine.push_action(request.name, request.params);
        }
        Ok(count)
    }

    /// Build a headless engine, replay the record into it and drain it.
    pub fn replay_headless(
        &self,
        config: EngineConfig,
        cards: CardRegistry,
    ) -> Result<GameActionEngine, ReplayError> {
        let config = config.with_operation_mode(EngineOperationMode::Headless);
        let mut engine = self.build_engine(config, cards);
        let count = self.replay_actions(&mut engine)?;
        engine.update_until_idle(0.0);
        info!(actions = count, winner = ?engine.winner(), "replay finished");
        Ok(engine)
    }
}

/// Play `actions` on a headless copy of `engine` and report the first one
/// whose board preconditions do not hold.
fn check_against_board(
    engine: &GameActionEngine,
    actions: &[ActionRequest],
) -> Result<(), ReplayError> {
    let _span = debug_span!("replay_check", actions = actions.len()).entered();
    let config = engine
        .config()
        .clone()
        .with_operation_mode(EngineOperationMode::Headless);
    let mut scratch = GameActionEngine::from_board(
        config,
        engine.rule_engine().clone(),
        engine.seed(),
        engine.board_state().clone(),
    );

    for (index, request) in actions.iter().enumerate() {
        let board = scratch.board_state();
        let player = board.active_player();
        let state = board.active_player_state();
        let held = state.held_cards.len();
        let reason = match request.name {
            ActionName::DrawCard if state.deck_cards.is_empty() => {
                Some(format!("draw pool of {player} is empty"))
            }
            ActionName::PlayCard if held == 0 => {
                Some(format!("held card sequence of {player} is empty"))
            }
            ActionName::PlayCard => request
                .params
                .get(params::LAST_PLAYED_CARD_INDEX)
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|&requested| requested >= held)
                .map(|requested| {
                    format!("held index {requested} out of range for {player} ({held} held)")
                }),
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(ReplayError::InconsistentAction {
                index,
                action: request.name.to_string(),
                reason,
            });
        }

        scratch.push_action(request.name, request.params.clone());
        scratch.update_until_idle(0.0);
    }
    Ok(())
}
