//! Ending the active player's turn.

use tracing::debug;

use super::{
    params, ActionAnimationUpdateResult, ActionContext, ActionName, ExtraActionParams, GameAction,
    TimedAnimation,
};
use crate::core::AnimationTimings;

/// Hands the turn to the other player.
///
/// State: toggles the active player, increments the turn counter, and
/// refills the newly active player's weight ammo after growing it by one.
/// Held and board sequences are untouched.
///
/// Follow-ups, in order:
/// 1. one `CardAttackGameAction` per board card of the player whose turn ended
/// 2. `PostNextPlayerGameAction`
/// 3. up to `cards_drawn_per_turn` `DrawCardGameAction`s, bounded by the new
///    active player's draw pool
#[derive(Clone, Debug, Default)]
pub struct NextPlayerGameAction {
    animation: TimedAnimation,
}

impl GameAction for NextPlayerGameAction {
    fn name(&self) -> ActionName {
        ActionName::NextPlayer
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let previous = ctx.board.active_player();
        ctx.board.advance_turn();

        let active = ctx.board.active_player_state_mut();
        active.total_weight_ammo += 1;
        active.current_weight_ammo = active.total_weight_ammo;
        let draws = (ctx.rules.battle_rules().cards_drawn_per_turn as usize)
            .min(active.deck_cards.len());

        debug!(
            previous = %previous,
            active = %ctx.board.active_player(),
            turn = ctx.board.turn_counter(),
            "turn passed"
        );

        let attackers = ctx.board.player(previous).board_cards.len();
        for card_index in 0..attackers {
            let mut extra = ExtraActionParams::new();
            extra.insert(params::PLAYER_INDEX.to_string(), previous.index().to_string());
            extra.insert(params::CARD_INDEX.to_string(), card_index.to_string());
            ctx.push_follow_up(ActionName::CardAttack, extra);
        }

        ctx.push_follow_up(ActionName::PostNextPlayer, ExtraActionParams::new());

        for _ in 0..draws {
            ctx.push_follow_up(ActionName::DrawCard, ExtraActionParams::new());
        }
    }

    fn has_animation(&self) -> bool {
        true
    }

    fn init_animation(&mut self, timings: &AnimationTimings) {
        self.animation.start(timings.next_player_ms);
    }

    fn update_animation(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        self.animation.update(dt_millis)
    }
}
