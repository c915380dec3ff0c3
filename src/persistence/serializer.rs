//! Collecting engine events into a `GameRecord`.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use tracing::info;

use super::data_file::{write_data_file, DataFileFormat};
use super::record::{GameRecord, RecordedAction};
use crate::cards::CardId;
use crate::engine::{GameActionEngine, SerializableGameActionEvent};
use crate::error::PersistenceError;

/// File stem of the record written by `BattleSerializer`.
pub const BATTLE_RECORD_FILE_STEM: &str = "last_battle";

/// Appends every serializable action event to an in-memory record.
///
/// Events arrive over the channel returned by `GameActionEngine::subscribe`
/// and are pulled in by `sync`, which `record` and `flush_state_to_file`
/// call first.
#[derive(Debug)]
pub struct GameSerializer {
    record: GameRecord,
    events: Receiver<SerializableGameActionEvent>,
}

impl GameSerializer {
    #[must_use]
    pub fn new(
        seed: u64,
        top_deck: &[CardId],
        bot_deck: &[CardId],
        events: Receiver<SerializableGameActionEvent>,
    ) -> Self {
        Self {
            record: GameRecord::new(seed, top_deck.to_vec(), bot_deck.to_vec()),
            events,
        }
    }

    /// Drain pending events into the record. Returns how many were added.
    pub fn sync(&mut self) -> usize {
        let mut added = 0;
        while let Ok(event) = self.events.try_recv() {
            self.on_game_action(event);
            added += 1;
        }
        added
    }

    pub fn on_game_action(&mut self, event: SerializableGameActionEvent) {
        self.record.actions.push(RecordedAction::from(event));
    }

    /// The record so far.
    pub fn record(&mut self) -> &GameRecord {
        self.sync();
        &self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut GameRecord {
        &mut self.record
    }

    /// Write the record so far to `path`.
    pub fn flush_state_to_file(
        &mut self,
        path: &Path,
        format: DataFileFormat,
    ) -> Result<(), PersistenceError> {
        self.sync();
        write_data_file(path, &self.record, format)?;
        info!(
            path = %path.display(),
            actions = self.record.actions.len(),
            seed = self.record.seed,
            "game record flushed"
        );
        Ok(())
    }
}

/// A `GameSerializer` for a whole battle, bound to its engine at creation.
///
/// Also stores the battle rules so a replay can rebuild the same board,
/// and always writes to `<dir>/last_battle.<ext>`.
#[derive(Debug)]
pub struct BattleSerializer {
    inner: GameSerializer,
}

impl BattleSerializer {
    /// Subscribe to `engine` and start recording. Actions applied before
    /// this call are not recorded.
    pub fn new(engine: &mut GameActionEngine, top_deck: &[CardId], bot_deck: &[CardId]) -> Self {
        let seed = engine.seed();
        let rules = engine.rule_engine().battle_rules().clone();
        let mut inner = GameSerializer::new(seed, top_deck, bot_deck, engine.subscribe());
        inner.record_mut().setup = Some(rules);
        Self { inner }
    }

    /// Path the record is written to for `dir` and `format`.
    #[must_use]
    pub fn record_path(dir: &Path, format: DataFileFormat) -> PathBuf {
        dir.join(format!("{BATTLE_RECORD_FILE_STEM}.{}", format.extension()))
    }

    pub fn sync(&mut self) -> usize {
        self.inner.sync()
    }

    pub fn record(&mut self) -> &GameRecord {
        self.inner.record()
    }

    /// Write the record into `dir`. Returns the written path.
    pub fn flush_state_to_file(
        &mut self,
        dir: &Path,
        format: DataFileFormat,
    ) -> Result<PathBuf, PersistenceError> {
        let path = Self::record_path(dir, format);
        self.inner.flush_state_to_file(&path, format)?;
        Ok(path)
    }
}
