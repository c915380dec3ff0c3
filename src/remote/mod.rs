//! Decision making for non-human players.
//!
//! - `DecisionPolicy`: which affordable card to play next
//! - `RemotePlayerActionEngine`: turns a policy's choices into pushed actions

pub mod engine;
pub mod policy;

pub use engine::RemotePlayerActionEngine;
pub use policy::{DecisionPolicy, HeaviestFirst, HighestDamageFirst, SeededRandom};
