//! Core engine types: players, board state, RNG, configuration.
//!
//! Everything here is plain data. Mutation is driven by the actions in
//! `crate::actions`, sequenced by `crate::engine::GameActionEngine`.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{AnimationTimings, BattleRules, EngineConfig, EngineOperationMode};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use state::{BoardState, PlayerState};
