//! Card-selection policies for the remote player.
//!
//! A policy is asked repeatedly for the next card to play during one turn.
//! Each time it sees the simulated board (with earlier choices already
//! applied) and the held indices the rule engine says are affordable.

use std::cmp::Reverse;

use crate::core::{BoardState, GameRng};
use crate::rules::GameRuleEngine;

/// RNG context for `SeededRandom`.
const REMOTE_PLAYER_CONTEXT: &str = "remote-player";

// =============================================================================
// Decision Policy
// =============================================================================

/// Chooses the next card to play.
pub trait DecisionPolicy {
    /// Pick one of `playable` (held indices of the active player), or
    /// `None` to end the turn. `playable` is never empty.
    fn choose_next_play(
        &mut self,
        board: &BoardState,
        rules: &GameRuleEngine,
        playable: &[usize],
    ) -> Option<usize>;
}

impl<P: DecisionPolicy + ?Sized> DecisionPolicy for Box<P> {
    fn choose_next_play(
        &mut self,
        board: &BoardState,
        rules: &GameRuleEngine,
        playable: &[usize],
    ) -> Option<usize> {
        (**self).choose_next_play(board, rules, playable)
    }
}

/// Index in `playable` maximizing `key`; ties go to the lowest held index.
fn best_by<K: Ord>(playable: &[usize], key: impl Fn(usize) -> K) -> Option<usize> {
    playable
        .iter()
        .copied()
        .min_by_key(|&index| (Reverse(key(index)), index))
}

/// Plays the heaviest affordable card first.
#[derive(Clone, Debug, Default)]
pub struct HeaviestFirst;

impl DecisionPolicy for HeaviestFirst {
    fn choose_next_play(
        &mut self,
        board: &BoardState,
        rules: &GameRuleEngine,
        playable: &[usize],
    ) -> Option<usize> {
        let held = &board.active_player_state().held_cards;
        best_by(playable, |index| rules.card_weight(held[index]))
    }
}

/// Plays the hardest-hitting affordable card first.
#[derive(Clone, Debug, Default)]
pub struct HighestDamageFirst;

impl DecisionPolicy for HighestDamageFirst {
    fn choose_next_play(
        &mut self,
        board: &BoardState,
        rules: &GameRuleEngine,
        playable: &[usize],
    ) -> Option<usize> {
        let held = &board.active_player_state().held_cards;
        best_by(playable, |index| rules.card_damage(held[index]))
    }
}

/// Picks uniformly among affordable cards, sometimes holding back.
///
/// Draws from its own context stream of the battle seed, so it never
/// disturbs the engine's randomness and is reproducible per seed.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: GameRng,
    stop_probability: f64,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context(REMOTE_PLAYER_CONTEXT),
            stop_probability: 0.0,
        }
    }

    /// Chance of ending the turn instead of playing another card.
    #[must_use]
    pub fn with_stop_probability(mut self, probability: f64) -> Self {
        self.stop_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl DecisionPolicy for SeededRandom {
    fn choose_next_play(
        &mut self,
        _board: &BoardState,
        _rules: &GameRuleEngine,
        playable: &[usize],
    ) -> Option<usize> {
        if self.stop_probability > 0.0 && self.rng.gen_bool(self.stop_probability) {
            return None;
        }
        self.rng.choose(playable).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::{BattleRules, PlayerId};

    fn board(held: &[u32]) -> BoardState {
        let mut board = BoardState::new(&BattleRules::default(), Vec::new(), Vec::new());
        board.player_mut(PlayerId::TOP).held_cards = held.iter().copied().map(CardId::new).collect();
        board
    }

    #[test]
    fn test_heaviest_first() {
        let rules = GameRuleEngine::standard();
        // Weights 1, 4, 2, 4.
        let board = board(&[0, 7, 3, 8]);

        let choice = HeaviestFirst.choose_next_play(&board, &rules, &[0, 1, 2, 3]);
        assert_eq!(choice, Some(1));

        let choice = HeaviestFirst.choose_next_play(&board, &rules, &[0, 2]);
        assert_eq!(choice, Some(2));
    }

    #[test]
    fn test_highest_damage_first() {
        let rules = GameRuleEngine::standard();
        // Damage 1, 4, 2, 5.
        let board = board(&[0, 7, 3, 8]);

        let choice = HighestDamageFirst.choose_next_play(&board, &rules, &[0, 1, 2, 3]);
        assert_eq!(choice, Some(3));
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let rules = GameRuleEngine::standard();
        let board = board(&[0, 1, 2, 3, 4]);
        let playable = [0, 1, 2, 3, 4];

        let mut a = SeededRandom::new(9);
        let mut b = SeededRandom::new(9);
        for _ in 0..20 {
            let choice = a.choose_next_play(&board, &rules, &playable);
            assert_eq!(choice, b.choose_next_play(&board, &rules, &playable));
            assert!(choice.is_some_and(|index| index < 5));
        }
    }

    #[test]
    fn test_seeded_random_always_stops() {
        let rules = GameRuleEngine::standard();
        let board = board(&[0]);
        let mut policy = SeededRandom::new(1).with_stop_probability(1.0);

        assert_eq!(policy.choose_next_play(&board, &rules, &[0]), None);
    }
}
