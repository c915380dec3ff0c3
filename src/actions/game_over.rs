//! Deciding the battle.

use tracing::info;

use super::{params, parse_player_param, ActionContext, ActionName, ExtraActionParams, GameAction};
use crate::core::PlayerId;

/// Records the victorious player on the board.
#[derive(Clone, Debug)]
pub struct GameOverGameAction {
    winner: PlayerId,
}

impl GameOverGameAction {
    #[must_use]
    pub fn new(winner: PlayerId) -> Self {
        Self { winner }
    }

    /// # Panics
    ///
    /// Panics if `victoriousPlayerIndex` is missing or malformed.
    #[must_use]
    pub fn from_params(extra: &ExtraActionParams) -> Self {
        Self::new(parse_player_param(
            extra,
            params::VICTORIOUS_PLAYER_INDEX,
            ActionName::GameOver,
        ))
    }
}

impl GameAction for GameOverGameAction {
    fn name(&self) -> ActionName {
        ActionName::GameOver
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        ctx.board.set_winner(self.winner);
        info!(winner = %self.winner, turn = ctx.board.turn_counter(), "game over");
    }

    fn serialized_params(&self) -> ExtraActionParams {
        let mut extra = ExtraActionParams::new();
        extra.insert(
            params::VICTORIOUS_PLAYER_INDEX.to_string(),
            self.winner.index().to_string(),
        );
        extra
    }
}
