//! The idle pseudo-action.

use super::{ActionContext, ActionName, GameAction};

/// Reported as the active action when the queue is empty. Does nothing if
/// pushed explicitly.
#[derive(Clone, Debug, Default)]
pub struct IdleGameAction;

impl GameAction for IdleGameAction {
    fn name(&self) -> ActionName {
        ActionName::Idle
    }

    fn set_new_game_state(&mut self, _ctx: &mut ActionContext<'_>) {}
}
