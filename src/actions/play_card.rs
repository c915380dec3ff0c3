//! Playing a held card onto the board.

use tracing::{debug, warn};

use super::{
    params, parse_index_param, ActionAnimationUpdateResult, ActionContext, ActionName,
    ExtraActionParams, GameAction, TimedAnimation,
};
use crate::core::AnimationTimings;

/// Moves one held card of the active player to the end of their board and
/// spends its weight from their current weight ammo.
///
/// The card is chosen by the `lastPlayedCardIndex` param. When the param is
/// absent the last held card is played. The index actually used is always
/// written to the record, so replays never depend on the default.
///
/// If the rule engine reports that the active player cannot afford the
/// card, the play is aborted: nothing moves, no animation runs, and a
/// warning is logged. With `BattleRules::enforce_weight_ammo` off the play
/// always goes through and weight ammo floors at zero.
///
/// # Panics
///
/// Panics when the active player's held sequence is empty, or when the
/// requested index is past its end.
#[derive(Clone, Debug, Default)]
pub struct PlayCardGameAction {
    requested_index: Option<usize>,
    played_index: Option<usize>,
    aborted: bool,
    animation: TimedAnimation,
}

impl PlayCardGameAction {
    /// Build from push params. `lastPlayedCardIndex` is optional here.
    #[must_use]
    pub fn from_params(extra: &ExtraActionParams) -> Self {
        let requested_index = extra.contains_key(params::LAST_PLAYED_CARD_INDEX).then(|| {
            parse_index_param(extra, params::LAST_PLAYED_CARD_INDEX, ActionName::PlayCard)
        });
        Self {
            requested_index,
            ..Self::default()
        }
    }

    /// Play the held card at `index`.
    #[must_use]
    pub fn at_index(index: usize) -> Self {
        Self {
            requested_index: Some(index),
            ..Self::default()
        }
    }

    /// Index of the held card that was played, once state has been applied.
    #[must_use]
    pub fn played_index(&self) -> Option<usize> {
        self.played_index
    }

    /// Whether the play was rejected for lack of weight ammo.
    #[must_use]
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl GameAction for PlayCardGameAction {
    fn name(&self) -> ActionName {
        ActionName::PlayCard
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let player = ctx.board.active_player();
        let held_count = ctx.board.active_player_state().held_cards.len();
        assert!(
            held_count > 0,
            "PlayCardGameAction: held card sequence of {player} is empty"
        );

        let index = self.requested_index.unwrap_or(held_count - 1);
        assert!(
            index < held_count,
            "PlayCardGameAction: held index {index} out of range for {player} ({held_count} held)"
        );
        self.played_index = Some(index);

        if !ctx.rules.can_card_be_played(ctx.board, player, index) {
            let card = ctx.board.active_player_state().held_cards[index];
            warn!(
                %player,
                %card,
                weight = ctx.rules.card_weight(card),
                ammo = ctx.board.active_player_state().current_weight_ammo,
                "card play aborted"
            );
            self.aborted = true;
            return;
        }

        let state = ctx.board.active_player_state_mut();
        let card = state.held_cards.remove(index);
        state.board_cards.push_back(card);
        let weight = ctx.rules.card_weight(card);
        state.current_weight_ammo = state.current_weight_ammo.saturating_sub(weight);

        debug!(%player, %card, index, weight, "card played");
    }

    fn has_animation(&self) -> bool {
        !self.aborted
    }

    fn init_animation(&mut self, timings: &AnimationTimings) {
        self.animation.start(timings.play_card_ms);
    }

    fn update_animation(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        self.animation.update(dt_millis)
    }

    fn serialized_params(&self) -> ExtraActionParams {
        let mut extra = ExtraActionParams::new();
        if let Some(index) = self.played_index.or(self.requested_index) {
            extra.insert(params::LAST_PLAYED_CARD_INDEX.to_string(), index.to_string());
        }
        extra
    }
}
