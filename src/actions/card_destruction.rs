//! Marking cards for destruction.

use super::{
    format_index_list, params, parse_bool_param, parse_index_list, parse_player_param,
    required_param, ActionAnimationUpdateResult, ActionContext, ActionName, ExtraActionParams,
    GameAction, TimedAnimation,
};
use crate::core::{AnimationTimings, PlayerId};

/// Marks board or held cards of a player for destruction. The cards stay in
/// place (and keep their indices) until `PostNextPlayerGameAction` sweeps
/// them into the discard pile.
#[derive(Clone, Debug)]
pub struct CardDestructionGameAction {
    player: PlayerId,
    card_indices: Vec<usize>,
    is_board_card: bool,
    animation: TimedAnimation,
}

impl CardDestructionGameAction {
    #[must_use]
    pub fn new(player: PlayerId, card_indices: Vec<usize>, is_board_card: bool) -> Self {
        Self {
            player,
            card_indices,
            is_board_card,
            animation: TimedAnimation::default(),
        }
    }

    /// # Panics
    ///
    /// Panics if any required param is missing or malformed.
    #[must_use]
    pub fn from_params(extra: &ExtraActionParams) -> Self {
        let name = ActionName::CardDestruction;
        let raw_indices = required_param(extra, params::CARD_INDICES, name);
        let card_indices = match parse_index_list(raw_indices) {
            Some(indices) => indices,
            None => panic!("{name} param \"cardIndices\" is not an index list: {raw_indices:?}"),
        };

        Self::new(
            parse_player_param(extra, params::PLAYER_INDEX, name),
            card_indices,
            parse_bool_param(extra, params::IS_BOARD_CARD, name),
        )
    }
}

impl GameAction for CardDestructionGameAction {
    fn name(&self) -> ActionName {
        ActionName::CardDestruction
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let state = ctx.board.player_mut(self.player);
        let marks = if self.is_board_card {
            &mut state.board_card_indices_to_destroy
        } else {
            &mut state.held_card_indices_to_destroy
        };
        for &index in &self.card_indices {
            marks.insert(index);
        }
    }

    fn has_animation(&self) -> bool {
        true
    }

    fn init_animation(&mut self, timings: &AnimationTimings) {
        self.animation.start(timings.card_destruction_ms);
    }

    fn update_animation(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        self.animation.update(dt_millis)
    }

    fn serialized_params(&self) -> ExtraActionParams {
        let mut extra = ExtraActionParams::new();
        extra.insert(params::CARD_INDICES.to_string(), format_index_list(&self.card_indices));
        extra.insert(params::PLAYER_INDEX.to_string(), self.player.index().to_string());
        extra.insert(params::IS_BOARD_CARD.to_string(), self.is_board_card.to_string());
        extra
    }
}
