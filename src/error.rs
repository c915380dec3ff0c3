//! Error types for the recoverable failure classes.
//!
//! Invariant violations inside actions (playing from an empty hand,
//! drawing from an empty deck, unknown action names pushed by code) are
//! programming errors and panic. Everything a caller can reasonably hit at
//! runtime, such as bad files, corrupt records or unknown names read from
//! input, is reported through the enums below.

use std::path::PathBuf;

use thiserror::Error;

use crate::cards::CardId;

/// An action name string that is not part of the closed action set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game action name: {0}")]
pub struct ParseActionNameError(pub String);

/// Failures reading or writing checksummed data files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary serialization/deserialization failed: {0}")]
    Binary(#[from] bincode::Error),

    #[error("data file {path} has no checksum trailer")]
    MissingChecksum { path: PathBuf },

    #[error("checksum mismatch in {path}: expected {expected}, found {found}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: u64,
        found: String,
    },
}

/// Failures loading or validating a battle record for replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("record entry {index}: unknown action {name:?}")]
    UnknownAction { index: usize, name: String },

    #[error("record entry {index}: {action} is missing required param {param:?}")]
    MissingExtraParam {
        index: usize,
        action: String,
        param: String,
    },

    #[error("record entry {index}: {action} param {param:?} is malformed: {value:?}")]
    MalformedExtraParam {
        index: usize,
        action: String,
        param: String,
        value: String,
    },

    #[error("record entry {index}: {action} cannot be replayed from a record")]
    NotReplayable { index: usize, action: String },

    #[error("record entry {index}: {action} does not fit the board: {reason}")]
    InconsistentAction {
        index: usize,
        action: String,
        reason: String,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures loading engine configuration or card catalogs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card catalog defines {0} more than once")]
    DuplicateCard(CardId),
}
