//! A board card attacking the opposing player.

use tracing::{debug, info};

use super::{
    format_index_list, params, parse_index_param, parse_player_param, ActionAnimationUpdateResult,
    ActionContext, ActionName, ExtraActionParams, GameAction, TimedAnimation,
};
use crate::core::{AnimationTimings, PlayerId};

/// The board card at `cardIndex` of `playerIndex` deals its damage to the
/// other player. Health is clamped at zero.
///
/// The attack is skipped when the card is already marked for destruction
/// or the battle is already decided. Otherwise it requests either a
/// `GameOverGameAction` (opponent reached zero health) or a
/// `CardDestructionGameAction` for the attacking card.
///
/// Only ever requested as a follow-up of `NextPlayerGameAction`, so it is
/// not serialized.
#[derive(Clone, Debug)]
pub struct CardAttackGameAction {
    attacker: PlayerId,
    card_index: usize,
    skipped: bool,
    animation: TimedAnimation,
}

impl CardAttackGameAction {
    #[must_use]
    pub fn new(attacker: PlayerId, card_index: usize) -> Self {
        Self {
            attacker,
            card_index,
            skipped: false,
            animation: TimedAnimation::default(),
        }
    }

    /// # Panics
    ///
    /// Panics if `playerIndex` or `cardIndex` is missing or malformed.
    #[must_use]
    pub fn from_params(extra: &ExtraActionParams) -> Self {
        Self::new(
            parse_player_param(extra, params::PLAYER_INDEX, ActionName::CardAttack),
            parse_index_param(extra, params::CARD_INDEX, ActionName::CardAttack),
        )
    }

    #[must_use]
    pub fn was_skipped(&self) -> bool {
        self.skipped
    }
}

impl GameAction for CardAttackGameAction {
    fn name(&self) -> ActionName {
        ActionName::CardAttack
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let attacker_state = ctx.board.player(self.attacker);
        if ctx.board.is_game_over()
            || attacker_state.board_card_indices_to_destroy.contains(&self.card_index)
        {
            self.skipped = true;
            return;
        }

        assert!(
            self.card_index < attacker_state.board_cards.len(),
            "CardAttackGameAction: board index {} out of range for {}",
            self.card_index,
            self.attacker
        );
        let card = attacker_state.board_cards[self.card_index];
        let damage = ctx.rules.card_damage(card);

        let defender = self.attacker.opponent();
        let defender_state = ctx.board.player_mut(defender);
        defender_state.health = defender_state.health.saturating_sub(damage);
        let remaining = defender_state.health;

        debug!(attacker = %self.attacker, %card, damage, remaining, "card attacked");

        let mut extra = ExtraActionParams::new();
        if remaining == 0 {
            info!(winner = %self.attacker, "opponent health depleted");
            extra.insert(
                params::VICTORIOUS_PLAYER_INDEX.to_string(),
                self.attacker.index().to_string(),
            );
            ctx.push_follow_up(ActionName::GameOver, extra);
        } else {
            extra.insert(params::CARD_INDICES.to_string(), format_index_list(&[self.card_index]));
            extra.insert(params::PLAYER_INDEX.to_string(), self.attacker.index().to_string());
            extra.insert(params::IS_BOARD_CARD.to_string(), "true".to_string());
            ctx.push_follow_up(ActionName::CardDestruction, extra);
        }
    }

    fn has_animation(&self) -> bool {
        !self.skipped
    }

    fn init_animation(&mut self, timings: &AnimationTimings) {
        self.animation.start(timings.card_attack_ms);
    }

    fn update_animation(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        self.animation.update(dt_millis)
    }

    fn serialized_params(&self) -> ExtraActionParams {
        let mut extra = ExtraActionParams::new();
        extra.insert(params::PLAYER_INDEX.to_string(), self.attacker.index().to_string());
        extra.insert(params::CARD_INDEX.to_string(), self.card_index.to_string());
        extra
    }
}
