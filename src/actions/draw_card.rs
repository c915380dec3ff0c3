//! Drawing a card.

use tracing::debug;

use super::{ActionAnimationUpdateResult, ActionContext, ActionName, GameAction, TimedAnimation};
use crate::core::AnimationTimings;

/// Moves the front card of the active player's draw pool to the end of
/// their held sequence.
///
/// # Panics
///
/// Panics when the draw pool is empty. Draws are gated by
/// `GameRuleEngine::can_draw` and by the follow-up count of
/// `NextPlayerGameAction`, so an empty pool here is a programming error.
#[derive(Clone, Debug, Default)]
pub struct DrawCardGameAction {
    animation: TimedAnimation,
}

impl GameAction for DrawCardGameAction {
    fn name(&self) -> ActionName {
        ActionName::DrawCard
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let player = ctx.board.active_player();
        let state = ctx.board.active_player_state_mut();

        let card = match state.deck_cards.pop_front() {
            Some(card) => card,
            None => panic!("DrawCardGameAction: draw pool of {player} is empty"),
        };
        state.held_cards.push_back(card);

        debug!(%player, %card, held = state.held_cards.len(), "card drawn");
    }

    fn has_animation(&self) -> bool {
        true
    }

    fn init_animation(&mut self, timings: &AnimationTimings) {
        self.animation.start(timings.draw_card_ms);
    }

    fn update_animation(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        self.animation.update(dt_millis)
    }
}
