//! # battle-engine
//!
//! The action engine of a two-player card battle: named actions queued,
//! applied to an authoritative board, sequenced with their animations,
//! and recorded so a battle can be replayed exactly.
//!
//! ## Design Principles
//!
//! 1. **State before animation**: an action mutates the board once, up
//!    front. Animation only delays when the next action is applied.
//!
//! 2. **Closed action set**: every action is named by `ActionName` and
//!    built from string params, so any externally pushed action can be
//!    written to a record and rebuilt from it.
//!
//! 3. **Deterministic replay**: the seed, both decks and the ordered
//!    external actions fully determine the final board.
//!
//! ## Architecture
//!
//! - **Queue**: `GameActionEngine` owns a FIFO whose head has always had
//!   its state applied. Follow-ups are inserted directly behind the head.
//!
//! - **Persistent Data Structures**: board sequences are `im` vectors, so
//!   the remote player can simulate on a cheap copy.
//!
//! - **Events**: serializers observe the engine through a channel rather
//!   than owning it.
//!
//! ## Modules
//!
//! - `core`: players, board state, RNG, configuration
//! - `cards`: card definitions and registry
//! - `actions`: the action trait, its variants and the factory
//! - `rules`: legality queries over a board
//! - `engine`: the action queue
//! - `remote`: AI players
//! - `persistence`: battle records, serializers and replay
//! - `error`: recoverable error types

pub mod actions;
pub mod cards;
pub mod core;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod remote;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    AnimationTimings, BattleRules, BoardState, EngineConfig, EngineOperationMode, GameRng,
    PlayerId, PlayerMap, PlayerState,
};

pub use crate::cards::{CardDefinition, CardId, CardRegistry};

pub use crate::actions::{
    ActionAnimationUpdateResult, ActionName, ActionRequest, ExtraActionParams, GameAction,
    GameActionFactory,
};

pub use crate::rules::GameRuleEngine;

pub use crate::engine::{GameActionEngine, SerializableGameActionEvent};

pub use crate::remote::{
    DecisionPolicy, HeaviestFirst, HighestDamageFirst, RemotePlayerActionEngine, SeededRandom,
};

pub use crate::persistence::{
    BattleSerializer, DataFileFormat, GameRecord, GameReplayEngine, GameSerializer, RecordedAction,
};

pub use crate::error::{ConfigError, ParseActionNameError, PersistenceError, ReplayError};
