//! Battle records: writing the action stream and replaying it.
//!
//! ## Flow
//!
//! ```text
//! GameActionEngine ──SerializableGameActionEvent──▶ GameSerializer ──flush──▶ file
//!                                                                              │
//! fresh GameActionEngine ◀──push_action── GameReplayEngine ◀──load─────────────┘
//! ```
//!
//! ## Files
//!
//! Records are written as JSON or bincode, followed by `&` and a checksum
//! of the payload. Writes go through a temporary sibling file that is
//! renamed into place.

pub mod data_file;
pub mod record;
pub mod replay;
pub mod serializer;

pub use data_file::{read_data_file, read_data_file_unverified, write_data_file, DataFileFormat};
pub use record::{GameRecord, RecordedAction};
pub use replay::GameReplayEngine;
pub use serializer::{BattleSerializer, GameSerializer, BATTLE_RECORD_FILE_STEM};
