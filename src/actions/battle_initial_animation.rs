//! Waiting for the battle intro animations.

use super::{
    params, parse_index_param, ActionAnimationUpdateResult, ActionContext, ActionName,
    ExtraActionParams, GameAction,
};
use crate::core::AnimationTimings;

/// Intro animations run when the battle scene opens.
pub const DEFAULT_PENDING_ANIMATIONS: usize = 3;

/// No board mutation. Holds the queue while the battle intro plays.
///
/// Each `update_animation` call reports one intro animation as complete;
/// the action finishes when none are left. The count comes from the
/// optional `pendingAnimations` param.
#[derive(Clone, Debug)]
pub struct BattleInitialAnimationGameAction {
    initial_animations: usize,
    pending_animations: usize,
}

impl Default for BattleInitialAnimationGameAction {
    fn default() -> Self {
        Self::with_pending_animations(DEFAULT_PENDING_ANIMATIONS)
    }
}

impl BattleInitialAnimationGameAction {
    #[must_use]
    pub fn with_pending_animations(count: usize) -> Self {
        Self {
            initial_animations: count,
            pending_animations: count,
        }
    }

    #[must_use]
    pub fn from_params(extra: &ExtraActionParams) -> Self {
        if extra.contains_key(params::PENDING_ANIMATIONS) {
            Self::with_pending_animations(parse_index_param(
                extra,
                params::PENDING_ANIMATIONS,
                ActionName::BattleInitialAnimation,
            ))
        } else {
            Self::default()
        }
    }
}

impl GameAction for BattleInitialAnimationGameAction {
    fn name(&self) -> ActionName {
        ActionName::BattleInitialAnimation
    }

    fn set_new_game_state(&mut self, _ctx: &mut ActionContext<'_>) {}

    fn has_animation(&self) -> bool {
        true
    }

    fn init_animation(&mut self, _timings: &AnimationTimings) {
        self.pending_animations = self.initial_animations;
    }

    fn update_animation(&mut self, _dt_millis: f32) -> ActionAnimationUpdateResult {
        self.pending_animations = self.pending_animations.saturating_sub(1);
        if self.pending_animations == 0 {
            ActionAnimationUpdateResult::Finished
        } else {
            ActionAnimationUpdateResult::Ongoing
        }
    }

    fn serialized_params(&self) -> ExtraActionParams {
        let mut extra = ExtraActionParams::new();
        extra.insert(
            params::PENDING_ANIMATIONS.to_string(),
            self.initial_animations.to_string(),
        );
        extra
    }

    fn pending_animations(&self) -> usize {
        self.pending_animations
    }
}
