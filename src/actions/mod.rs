//! Game actions: named, queued units of board mutation.
//!
//! ## Lifecycle
//!
//! 1. The `GameActionFactory` builds an action from its `ActionName` and
//!    `ExtraActionParams`.
//! 2. The engine calls `set_new_game_state` exactly once. All board
//!    mutation happens here, before any animation starts.
//! 3. If the action has an animation, the engine calls `init_animation`
//!    and then polls `update_animation` once per tick until it reports
//!    `Finished`.
//! 4. The action is dropped.
//!
//! ## Follow-ups
//!
//! An action can request further actions while applying its state, via
//! `ActionContext::push_follow_up`. Ending a turn, for example, requests
//! one attack per board card followed by the end-of-turn cleanup and the
//! next player's draws. Follow-ups run right after their parent and are
//! regenerated on replay, so they are never serialized themselves.
//!
//! ## Params
//!
//! Actions are parameterized with string key/value pairs so that they can
//! be written to and rebuilt from battle records. Missing or malformed
//! params on construction are programming errors and panic; replay
//! validates records before anything reaches the factory.

pub mod animation;
pub mod battle_initial_animation;
pub mod card_attack;
pub mod card_destruction;
pub mod draw_card;
pub mod factory;
pub mod game_over;
pub mod idle;
pub mod next_player;
pub mod play_card;
pub mod post_next_player;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AnimationTimings, BoardState, PlayerId};
use crate::error::ParseActionNameError;
use crate::rules::GameRuleEngine;

pub use animation::TimedAnimation;
pub use battle_initial_animation::BattleInitialAnimationGameAction;
pub use card_attack::CardAttackGameAction;
pub use card_destruction::CardDestructionGameAction;
pub use draw_card::DrawCardGameAction;
pub use factory::GameActionFactory;
pub use game_over::GameOverGameAction;
pub use idle::IdleGameAction;
pub use next_player::NextPlayerGameAction;
pub use play_card::PlayCardGameAction;
pub use post_next_player::PostNextPlayerGameAction;

/// Named key/value parameters attached to an action.
///
/// Ordered so that serialized records are stable.
pub type ExtraActionParams = BTreeMap<String, String>;

/// Param keys shared between actions, records and callers.
pub mod params {
    /// Held-card index played by `PlayCardGameAction`.
    pub const LAST_PLAYED_CARD_INDEX: &str = "lastPlayedCardIndex";
    /// Raw `PlayerId` index.
    pub const PLAYER_INDEX: &str = "playerIndex";
    /// Board-card index of an attacking card.
    pub const CARD_INDEX: &str = "cardIndex";
    /// Bracketed index list, e.g. `[0,2]`.
    pub const CARD_INDICES: &str = "cardIndices";
    /// `true` for board cards, `false` for held cards.
    pub const IS_BOARD_CARD: &str = "isBoardCard";
    /// Raw `PlayerId` index of the winner.
    pub const VICTORIOUS_PLAYER_INDEX: &str = "victoriousPlayerIndex";
    /// Number of intro animations to wait for.
    pub const PENDING_ANIMATIONS: &str = "pendingAnimations";
}

// =============================================================================
// Action names
// =============================================================================

/// The closed set of action names.
///
/// String forms are what battle records store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionName {
    Idle,
    DrawCard,
    PlayCard,
    NextPlayer,
    PostNextPlayer,
    CardAttack,
    CardDestruction,
    GameOver,
    BattleInitialAnimation,
}

impl ActionName {
    /// Every action name.
    pub const ALL: [ActionName; 9] = [
        ActionName::Idle,
        ActionName::DrawCard,
        ActionName::PlayCard,
        ActionName::NextPlayer,
        ActionName::PostNextPlayer,
        ActionName::CardAttack,
        ActionName::CardDestruction,
        ActionName::GameOver,
        ActionName::BattleInitialAnimation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionName::Idle => "IdleGameAction",
            ActionName::DrawCard => "DrawCardGameAction",
            ActionName::PlayCard => "PlayCardGameAction",
            ActionName::NextPlayer => "NextPlayerGameAction",
            ActionName::PostNextPlayer => "PostNextPlayerGameAction",
            ActionName::CardAttack => "CardAttackGameAction",
            ActionName::CardDestruction => "CardDestructionGameAction",
            ActionName::GameOver => "GameOverGameAction",
            ActionName::BattleInitialAnimation => "BattleInitialAnimationGameAction",
        }
    }

    /// Whether externally pushed actions of this kind go into battle
    /// records. Everything else is regenerated as a follow-up or is purely
    /// presentational.
    #[must_use]
    pub const fn is_serializable(self) -> bool {
        matches!(
            self,
            ActionName::DrawCard | ActionName::PlayCard | ActionName::NextPlayer
        )
    }

    /// Params a record entry for this action must carry to be rebuilt.
    #[must_use]
    pub const fn required_extra_param_names(self) -> &'static [&'static str] {
        match self {
            ActionName::PlayCard => &[params::LAST_PLAYED_CARD_INDEX],
            ActionName::CardAttack => &[params::PLAYER_INDEX, params::CARD_INDEX],
            ActionName::CardDestruction => &[
                params::CARD_INDICES,
                params::PLAYER_INDEX,
                params::IS_BOARD_CARD,
            ],
            ActionName::GameOver => &[params::VICTORIOUS_PLAYER_INDEX],
            _ => &[],
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = ParseActionNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParseActionNameError(s.to_string()))
    }
}

// =============================================================================
// Requests and results
// =============================================================================

/// An action name plus the params to build it with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub name: ActionName,
    pub params: ExtraActionParams,
}

impl ActionRequest {
    #[must_use]
    pub fn new(name: ActionName) -> Self {
        Self {
            name,
            params: ExtraActionParams::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }
}

/// Result of one animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionAnimationUpdateResult {
    Ongoing,
    Finished,
}

// =============================================================================
// Action trait
// =============================================================================

/// Everything an action may touch while applying its state.
pub struct ActionContext<'a> {
    pub board: &'a mut BoardState,
    pub rules: &'a GameRuleEngine,
    follow_ups: SmallVec<[ActionRequest; 4]>,
}

impl<'a> ActionContext<'a> {
    pub fn new(board: &'a mut BoardState, rules: &'a GameRuleEngine) -> Self {
        Self {
            board,
            rules,
            follow_ups: SmallVec::new(),
        }
    }

    /// Request an action to run right after the current one.
    ///
    /// Follow-ups keep the order they were requested in.
    pub fn push_follow_up(&mut self, name: ActionName, params: ExtraActionParams) {
        self.follow_ups.push(ActionRequest { name, params });
    }

    /// Consume the context, returning the requested follow-ups.
    #[must_use]
    pub fn into_follow_ups(self) -> SmallVec<[ActionRequest; 4]> {
        self.follow_ups
    }
}

/// A single game action.
pub trait GameAction: fmt::Debug {
    fn name(&self) -> ActionName;

    /// Apply this action's board mutation. Called exactly once.
    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>);

    /// Whether the engine should run an animation phase for this action.
    ///
    /// Only consulted after `set_new_game_state`.
    fn has_animation(&self) -> bool {
        false
    }

    fn init_animation(&mut self, _timings: &AnimationTimings) {}

    /// Advance the animation by `dt_millis`.
    fn update_animation(&mut self, _dt_millis: f32) -> ActionAnimationUpdateResult {
        ActionAnimationUpdateResult::Finished
    }

    /// Whether this action is published to serializers when pushed externally.
    fn should_be_serialized(&self) -> bool {
        self.name().is_serializable()
    }

    fn required_extra_param_names(&self) -> &'static [&'static str] {
        self.name().required_extra_param_names()
    }

    /// Params written to a record. Includes anything resolved while applying.
    fn serialized_params(&self) -> ExtraActionParams {
        ExtraActionParams::new()
    }

    /// Animations still running, for actions that track several at once.
    fn pending_animations(&self) -> usize {
        0
    }
}

// =============================================================================
// Param helpers
// =============================================================================

pub(crate) fn required_param<'p>(params: &'p ExtraActionParams, key: &str, action: ActionName) -> &'p str {
    match params.get(key) {
        Some(value) => value,
        None => panic!("{action} is missing required param {key:?}"),
    }
}

pub(crate) fn parse_index_param(
    params: &ExtraActionParams,
    key: &str,
    action: ActionName,
) -> usize {
    let value = required_param(params, key, action);
    match value.trim().parse() {
        Ok(index) => index,
        Err(_) => panic!("{action} param {key:?} is not an index: {value:?}"),
    }
}

pub(crate) fn parse_player_param(
    params: &ExtraActionParams,
    key: &str,
    action: ActionName,
) -> PlayerId {
    let value = required_param(params, key, action);
    match PlayerId::from_param(value) {
        Some(player) => player,
        None => panic!("{action} param {key:?} is not a player index: {value:?}"),
    }
}

pub(crate) fn parse_bool_param(params: &ExtraActionParams, key: &str, action: ActionName) -> bool {
    let value = required_param(params, key, action);
    match value.trim() {
        "true" | "1" => true,
        "false" | "0" => false,
        _ => panic!("{action} param {key:?} is not a boolean: {value:?}"),
    }
}

/// Format indices the way records store them: `[0,2]`.
#[must_use]
pub fn format_index_list(indices: &[usize]) -> String {
    let joined: Vec<String> = indices.iter().map(usize::to_string).collect();
    format!("[{}]", joined.join(","))
}

/// Parse a bracketed index list such as `[0,2]` or `[]`.
#[must_use]
pub fn parse_index_list(value: &str) -> Option<Vec<usize>> {
    let inner = value.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner.split(',').map(|part| part.trim().parse().ok()).collect()
}

/// Apply an action outside the engine and return its follow-ups.
#[cfg(test)]
pub(crate) fn apply_standalone(
    action: &mut dyn GameAction,
    board: &mut BoardState,
    rules: &GameRuleEngine,
) -> Vec<ActionRequest> {
    let mut ctx = ActionContext::new(board, rules);
    action.set_new_game_state(&mut ctx);
    ctx.into_follow_ups().into_vec()
}
