//! Authoritative board state.
//!
//! ## BoardState
//!
//! Two `PlayerState`s (top and bottom), the active-player marker, the turn
//! counter and the winner once the battle is decided. Board state performs
//! no validation: actions are trusted to keep the invariants, and the rule
//! engine is expected to have gated them.
//!
//! ## Zones
//!
//! Every card id a player owns sits in exactly one of their zones:
//! deck → held → board → discard. Held cards may also go straight to
//! discard at the end of a turn.
//!
//! Zones use `im` persistent vectors so that AI simulation and replay
//! verification can snapshot the board in O(1).

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::config::BattleRules;
use super::player::{PlayerId, PlayerMap};
use crate::cards::CardId;

/// One side of the battle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    // === Zones ===
    /// Draw pool. The front card is drawn first.
    pub deck_cards: Vector<CardId>,
    pub held_cards: Vector<CardId>,
    pub board_cards: Vector<CardId>,
    pub discarded_cards: Vector<CardId>,

    // === Pending destruction ===
    /// Board indices removed at the end of the owner's opponent's turn.
    pub board_card_indices_to_destroy: OrdSet<usize>,
    /// Held indices removed at the end of the owner's opponent's turn.
    pub held_card_indices_to_destroy: OrdSet<usize>,

    // === Resources ===
    pub health: u32,
    /// Weight ammo regained at the start of each turn.
    pub total_weight_ammo: u32,
    /// Weight ammo left to spend this turn.
    pub current_weight_ammo: u32,
}

impl PlayerState {
    /// Create a player with a full deck and nothing else in play.
    pub fn new(deck: impl IntoIterator<Item = CardId>, health: u32) -> Self {
        Self {
            deck_cards: deck.into_iter().collect(),
            health,
            ..Self::default()
        }
    }

    /// Total number of cards across all zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck_cards.len()
            + self.held_cards.len()
            + self.board_cards.len()
            + self.discarded_cards.len()
    }
}

/// Complete board state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    players: PlayerMap<PlayerState>,
    active_player: PlayerId,
    turn_counter: u32,
    winner: Option<PlayerId>,
}

impl BoardState {
    /// Set up a fresh battle. The top player is active on turn 0.
    pub fn new(
        rules: &BattleRules,
        top_deck: impl IntoIterator<Item = CardId>,
        bot_deck: impl IntoIterator<Item = CardId>,
    ) -> Self {
        Self {
            players: PlayerMap::from_pair(
                PlayerState::new(top_deck, rules.starting_health),
                PlayerState::new(bot_deck, rules.starting_health),
            ),
            active_player: PlayerId::TOP,
            turn_counter: 0,
            winner: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    #[must_use]
    pub fn inactive_player(&self) -> PlayerId {
        self.active_player.opponent()
    }

    #[must_use]
    pub fn active_player_state(&self) -> &PlayerState {
        &self.players[self.active_player]
    }

    pub fn active_player_state_mut(&mut self) -> &mut PlayerState {
        &mut self.players[self.active_player]
    }

    #[must_use]
    pub fn inactive_player_state(&self) -> &PlayerState {
        &self.players[self.active_player.opponent()]
    }

    pub fn inactive_player_state_mut(&mut self) -> &mut PlayerState {
        let inactive = self.active_player.opponent();
        &mut self.players[inactive]
    }

    #[must_use]
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    // === Mutation ===

    /// Hand the turn to the other player and bump the turn counter.
    pub fn advance_turn(&mut self) {
        self.active_player = self.active_player.opponent();
        self.turn_counter += 1;
    }

    /// Record the victorious player.
    pub fn set_winner(&mut self, player: PlayerId) {
        self.winner = Some(player);
    }
}
