//! Legality checks over `BoardState`.

use crate::actions::{params, ActionName, ActionRequest};
use crate::cards::{CardId, CardRegistry};
use crate::core::{BattleRules, BoardState, PlayerId};

/// Rule engine for a battle.
///
/// Holds the card catalog and the tunable battle rules; all checks are pure
/// functions of the board passed in.
///
/// ## Example
///
/// ```
/// use battle_engine::cards::CardId;
/// use battle_engine::core::{BattleRules, BoardState, PlayerId};
/// use battle_engine::rules::GameRuleEngine;
///
/// let rules = GameRuleEngine::standard();
/// let mut board = BoardState::new(&BattleRules::default(), vec![CardId::new(0)], vec![]);
///
/// assert!(rules.can_draw(&board, PlayerId::TOP));
/// assert!(!rules.can_draw(&board, PlayerId::BOT));
///
/// board.player_mut(PlayerId::TOP).held_cards.push_back(CardId::new(0));
/// // No weight ammo yet on the opening turn.
/// assert!(!rules.can_card_be_played(&board, PlayerId::TOP, 0));
/// ```
#[derive(Clone, Debug)]
pub struct GameRuleEngine {
    cards: CardRegistry,
    rules: BattleRules,
}

impl GameRuleEngine {
    #[must_use]
    pub fn new(cards: CardRegistry, rules: BattleRules) -> Self {
        Self { cards, rules }
    }

    /// Standard card catalog with default rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CardRegistry::standard(), BattleRules::default())
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    #[must_use]
    pub fn battle_rules(&self) -> &BattleRules {
        &self.rules
    }

    // === Card stats ===

    /// # Panics
    ///
    /// Panics if `card` is not in the catalog.
    #[must_use]
    pub fn card_damage(&self, card: CardId) -> u32 {
        self.cards.get_unchecked(card).damage
    }

    /// # Panics
    ///
    /// Panics if `card` is not in the catalog.
    #[must_use]
    pub fn card_weight(&self, card: CardId) -> u32 {
        self.cards.get_unchecked(card).weight
    }

    // === Predicates ===

    #[must_use]
    pub fn winner(&self, board: &BoardState) -> Option<PlayerId> {
        board.winner()
    }

    /// The active player may draw while their pool has cards.
    #[must_use]
    pub fn can_draw(&self, board: &BoardState, player: PlayerId) -> bool {
        !board.is_game_over()
            && board.active_player() == player
            && !board.player(player).deck_cards.is_empty()
    }

    /// The active player may play a held card they can afford. Weight is
    /// ignored when `BattleRules::enforce_weight_ammo` is off.
    #[must_use]
    pub fn can_card_be_played(
        &self,
        board: &BoardState,
        player: PlayerId,
        held_index: usize,
    ) -> bool {
        if board.is_game_over() || board.active_player() != player {
            return false;
        }

        let state = board.player(player);
        match state.held_cards.get(held_index) {
            Some(&card) => {
                !self.rules.enforce_weight_ammo
                    || self.card_weight(card) <= state.current_weight_ammo
            }
            None => false,
        }
    }

    #[must_use]
    pub fn can_end_turn(&self, board: &BoardState) -> bool {
        !board.is_game_over()
    }

    /// Held indices of the active player that can be played right now.
    #[must_use]
    pub fn playable_held_indices(&self, board: &BoardState) -> Vec<usize> {
        let player = board.active_player();
        (0..board.player(player).held_cards.len())
            .filter(|&index| self.can_card_be_played(board, player, index))
            .collect()
    }

    /// Every action the active player may push from this board.
    ///
    /// Draws normally happen as part of the turn change, so an explicit
    /// draw is only offered when the active player's hand is empty.
    #[must_use]
    pub fn legal_actions(&self, board: &BoardState) -> Vec<ActionRequest> {
        if board.is_game_over() {
            return Vec::new();
        }

        let player = board.active_player();
        let mut actions: Vec<ActionRequest> = self
            .playable_held_indices(board)
            .into_iter()
            .map(|index| {
                ActionRequest::new(ActionName::PlayCard)
                    .with_param(params::LAST_PLAYED_CARD_INDEX, index)
            })
            .collect();

        if board.player(player).held_cards.is_empty() && self.can_draw(board, player) {
            actions.push(ActionRequest::new(ActionName::DrawCard));
        }
        if self.can_end_turn(board) {
            actions.push(ActionRequest::new(ActionName::NextPlayer));
        }
        actions
    }

    /// Whether a request may be pushed by a player from this board.
    ///
    /// Actions that only ever run as follow-ups are never legal to push.
    #[must_use]
    pub fn is_legal(&self, board: &BoardState, request: &ActionRequest) -> bool {
        let player = board.active_player();
        match request.name {
            ActionName::PlayCard => {
                let held = board.player(player).held_cards.len();
                let index = match request.params.get(params::LAST_PLAYED_CARD_INDEX) {
                    Some(value) => value.trim().parse().ok(),
                    None => held.checked_sub(1),
                };
                index.is_some_and(|index| self.can_card_be_played(board, player, index))
            }
            ActionName::DrawCard => self.can_draw(board, player),
            ActionName::NextPlayer => self.can_end_turn(board),
            ActionName::BattleInitialAnimation => {
                !board.is_game_over() && board.turn_counter() == 0
            }
            ActionName::Idle
            | ActionName::PostNextPlayer
            | ActionName::CardAttack
            | ActionName::CardDestruction
            | ActionName::GameOver => false,
        }
    }
}
