//! Battle rules: the read-only legality oracle.
//!
//! `GameRuleEngine` answers which actions are legal from a board state.
//! It is consulted by input dispatch, by `PlayCardGameAction` to decide
//! whether a play is affordable, and by the remote player engine. It never
//! mutates the board.

pub mod engine;

pub use engine::GameRuleEngine;
