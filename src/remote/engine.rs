//! Pushing a full turn for a non-human player.

use tracing::{debug, debug_span, instrument};

use super::policy::{DecisionPolicy, HeaviestFirst};
use crate::actions::{
    params, ActionContext, ActionName, ActionRequest, GameAction, PlayCardGameAction,
};
use crate::core::{BoardState, PlayerId};
use crate::engine::GameActionEngine;
use crate::rules::GameRuleEngine;

/// Decides and pushes the actions of one player's turn.
///
/// Plays are decided against a copy of the board: each chosen card is
/// played on the copy with the same `PlayCardGameAction` the engine will
/// run, so later indices and the remaining weight ammo account for earlier
/// plays. The turn always ends with `NextPlayerGameAction`.
///
/// ## Example
///
/// ```
/// use battle_engine::cards::{CardId, CardRegistry};
/// use battle_engine::core::{EngineConfig, PlayerId};
/// use battle_engine::engine::GameActionEngine;
/// use battle_engine::remote::RemotePlayerActionEngine;
///
/// let deck: Vec<_> = (0..6).map(CardId::new).collect();
/// let mut engine = GameActionEngine::new(EngineConfig::headless(), CardRegistry::standard(), 1, &deck, &deck);
/// let mut top = RemotePlayerActionEngine::heaviest_first(PlayerId::TOP);
///
/// top.decide_and_push_next_actions(&mut engine);
/// engine.update_until_idle(0.0);
///
/// assert_eq!(engine.board_state().active_player(), PlayerId::BOT);
/// ```
#[derive(Clone, Debug)]
pub struct RemotePlayerActionEngine<P = HeaviestFirst> {
    player: PlayerId,
    policy: P,
}

impl RemotePlayerActionEngine<HeaviestFirst> {
    #[must_use]
    pub fn heaviest_first(player: PlayerId) -> Self {
        Self::new(player, HeaviestFirst)
    }
}

impl<P: DecisionPolicy> RemotePlayerActionEngine<P> {
    #[must_use]
    pub fn new(player: PlayerId, policy: P) -> Self {
        Self { player, policy }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// The actions this player would push from `board`, in order.
    ///
    /// Empty once the battle is decided.
    ///
    /// # Panics
    ///
    /// Panics if it is not this player's turn.
    #[instrument(level = "debug", name = "remote_decide", skip_all, fields(player = %self.player))]
    pub fn decide_next_actions(
        &mut self,
        board: &BoardState,
        rules: &GameRuleEngine,
    ) -> Vec<ActionRequest> {
        assert_eq!(
            board.active_player(),
            self.player,
            "remote player {} asked to act on the opponent's turn",
            self.player
        );
        if rules.winner(board).is_some() {
            return Vec::new();
        }

        let mut simulated = board.clone();
        let mut actions = Vec::new();
        loop {
            let playable = rules.playable_held_indices(&simulated);
            if playable.is_empty() {
                break;
            }
            let Some(index) = self.policy.choose_next_play(&simulated, rules, &playable) else {
                break;
            };

            // Plays on the copy log under this span, never as live plays.
            let _simulated = debug_span!("simulated_play", index).entered();
            let mut play = PlayCardGameAction::at_index(index);
            play.set_new_game_state(&mut ActionContext::new(&mut simulated, rules));
            actions.push(
                ActionRequest::new(ActionName::PlayCard)
                    .with_param(params::LAST_PLAYED_CARD_INDEX, index),
            );
        }

        actions.push(ActionRequest::new(ActionName::NextPlayer));
        actions
    }

    /// Decide this player's turn and push it onto `engine`. Returns the
    /// number of actions pushed.
    ///
    /// # Panics
    ///
    /// Panics if the engine still has queued actions, or if it is not this
    /// player's turn.
    pub fn decide_and_push_next_actions(&mut self, engine: &mut GameActionEngine) -> usize {
        assert!(
            engine.is_idle(),
            "remote player {} must decide on a settled board",
            self.player
        );

        let actions = self.decide_next_actions(engine.board_state(), engine.rule_engine());
        debug!(player = %self.player, actions = actions.len(), "remote player decided");

        let count = actions.len();
        for request in actions {
            engine.push_action(request.name, request.params);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardRegistry};
    use crate::core::EngineConfig;
    use crate::remote::HighestDamageFirst;

    fn engine_with_hand(held: &[u32], ammo: u32) -> GameActionEngine {
        let mut engine = GameActionEngine::new(
            EngineConfig::headless(),
            CardRegistry::standard(),
            5,
            &[CardId::new(0)],
            &[CardId::new(1)],
        );
        let top = engine.board_state_mut().player_mut(PlayerId::TOP);
        top.held_cards = held.iter().copied().map(CardId::new).collect();
        top.total_weight_ammo = ammo;
        top.current_weight_ammo = ammo;
        engine
    }

    fn play(index: usize) -> ActionRequest {
        ActionRequest::new(ActionName::PlayCard).with_param(params::LAST_PLAYED_CARD_INDEX, index)
    }

    #[test]
    fn test_plays_heaviest_within_budget() {
        // Weights: card 0 = 1, card 4 = 2, card 7 = 4.
        let engine = engine_with_hand(&[0, 7, 4], 3);
        let mut remote = RemotePlayerActionEngine::heaviest_first(PlayerId::TOP);

        let actions = remote.decide_next_actions(engine.board_state(), engine.rule_engine());

        // Card 4 (index 2), then card 0 (index 0 of [0, 7]), then out of ammo.
        assert_eq!(
            actions,
            vec![play(2), play(0), ActionRequest::new(ActionName::NextPlayer)]
        );
    }

    #[test]
    fn test_indices_follow_simulated_hand() {
        let engine = engine_with_hand(&[0, 1, 2], 10);
        let mut remote = RemotePlayerActionEngine::new(PlayerId::TOP, HighestDamageFirst);

        let actions = remote.decide_next_actions(engine.board_state(), engine.rule_engine());

        // Damage 1, 1, 2: card 2 first, then the two 1-damage cards from the front.
        assert_eq!(
            actions,
            vec![play(2), play(0), play(0), ActionRequest::new(ActionName::NextPlayer)]
        );
    }

    #[test]
    fn test_push_applies_turn() {
        let mut engine = engine_with_hand(&[0, 7, 4], 3);
        let mut remote = RemotePlayerActionEngine::heaviest_first(PlayerId::TOP);

        let pushed = remote.decide_and_push_next_actions(&mut engine);
        engine.update_until_idle(0.0);

        assert_eq!(pushed, 3);
        let top = engine.board_state().player(PlayerId::TOP);
        assert_eq!(top.current_weight_ammo, 0);
        // Both played cards attacked and were swept; the unplayed card was discarded.
        assert_eq!(top.discarded_cards.len(), 3);
        assert_eq!(engine.board_state().active_player(), PlayerId::BOT);
    }

    /// Records, for every "card played" event, whether it was emitted
    /// inside a `simulated_play` span.
    #[derive(Clone, Default)]
    struct CardPlayedEvents(std::sync::Arc<std::sync::Mutex<Vec<bool>>>);

    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S> tracing_subscriber::Layer<S> for CardPlayedEvents
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut message = MessageVisitor(String::new());
            event.record(&mut message);
            if message.0 != "card played" {
                return;
            }
            let simulated = ctx
                .event_scope(event)
                .is_some_and(|mut scope| scope.any(|span| span.name() == "simulated_play"));
            self.0.lock().unwrap().push(simulated);
        }
    }

    #[test]
    fn test_simulated_plays_log_under_their_own_span() {
        use tracing_subscriber::layer::SubscriberExt;

        let events = CardPlayedEvents::default();
        let subscriber = tracing_subscriber::registry().with(events.clone());

        tracing::subscriber::with_default(subscriber, || {
            let mut engine = engine_with_hand(&[0, 7, 4], 3);
            let mut remote = RemotePlayerActionEngine::heaviest_first(PlayerId::TOP);
            remote.decide_and_push_next_actions(&mut engine);
            engine.update_until_idle(0.0);
        });

        // Two plays decided on the copy, then the same two applied live.
        assert_eq!(*events.0.lock().unwrap(), vec![true, true, false, false]);
    }

    #[test]
    fn test_nothing_after_game_over() {
        let mut engine = engine_with_hand(&[0], 5);
        engine.board_state_mut().set_winner(PlayerId::BOT);
        let mut remote = RemotePlayerActionEngine::heaviest_first(PlayerId::TOP);

        assert_eq!(remote.decide_and_push_next_actions(&mut engine), 0);
        assert!(engine.is_idle());
    }

    #[test]
    #[should_panic(expected = "asked to act on the opponent's turn")]
    fn test_wrong_turn_panics() {
        let mut engine = engine_with_hand(&[0], 5);
        let mut remote = RemotePlayerActionEngine::heaviest_first(PlayerId::BOT);
        remote.decide_and_push_next_actions(&mut engine);
    }
}
