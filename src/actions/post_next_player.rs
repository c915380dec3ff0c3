//! End-of-turn cleanup for the player whose turn just ended.

use im::{OrdSet, Vector};
use tracing::debug;

use super::{ActionContext, ActionName, GameAction};
use crate::cards::CardId;

/// Sweeps the inactive player's marked cards into their discard pile and
/// clears the marks. When the battle rules say so, every remaining held
/// card is discarded too.
#[derive(Clone, Debug, Default)]
pub struct PostNextPlayerGameAction;

/// Split `cards` into (kept, removed) by index membership, keeping order.
fn partition_marked(
    cards: &Vector<CardId>,
    marked: &OrdSet<usize>,
) -> (Vector<CardId>, Vector<CardId>) {
    let mut kept = Vector::new();
    let mut removed = Vector::new();
    for (index, &card) in cards.iter().enumerate() {
        if marked.contains(&index) {
            removed.push_back(card);
        } else {
            kept.push_back(card);
        }
    }
    (kept, removed)
}

impl GameAction for PostNextPlayerGameAction {
    fn name(&self) -> ActionName {
        ActionName::PostNextPlayer
    }

    fn set_new_game_state(&mut self, ctx: &mut ActionContext<'_>) {
        let player = ctx.board.inactive_player();
        let discard_hand = ctx.rules.battle_rules().discard_held_cards_on_turn_end;
        let state = ctx.board.inactive_player_state_mut();

        let (board_kept, board_removed) =
            partition_marked(&state.board_cards, &state.board_card_indices_to_destroy);
        let (mut held_kept, held_removed) =
            partition_marked(&state.held_cards, &state.held_card_indices_to_destroy);

        state.board_cards = board_kept;
        state.discarded_cards.append(board_removed);
        state.discarded_cards.append(held_removed);
        if discard_hand {
            state.discarded_cards.append(std::mem::take(&mut held_kept));
        }
        state.held_cards = held_kept;

        state.board_card_indices_to_destroy = OrdSet::new();
        state.held_card_indices_to_destroy = OrdSet::new();

        debug!(
            %player,
            board = state.board_cards.len(),
            held = state.held_cards.len(),
            discarded = state.discarded_cards.len(),
            "turn cleanup"
        );
    }
}
