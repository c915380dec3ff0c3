//! The game action engine: a queue of named actions driven by host ticks.
//!
//! ## State machine
//!
//! ```text
//! IDLE ──push──▶ STATE_APPLIED ──(animated, has animation)──▶ ANIMATING
//!                     │                                           │
//!                     └──────────── update: finished ◀────────────┘
//!                                          │
//!                          next queued action applied, or IDLE
//! ```
//!
//! The head of the queue has always had its state applied. Pushing onto an
//! idle engine applies the new action immediately; otherwise it waits until
//! every action ahead of it has finished. Follow-ups requested by an action
//! are inserted directly behind it, ahead of anything pushed earlier, so the
//! board evolves the same way no matter when external actions were pushed.
//!
//! ## Events
//!
//! When an externally pushed action that wants to be serialized has its
//! state applied, a `SerializableGameActionEvent` is sent to every
//! subscriber. Subscribers hold the receiving end of a channel; a dropped
//! receiver is unsubscribed on the next send.
//!
//! ## Operation modes
//!
//! In `Animated` mode the head is held until its animation reports
//! `Finished`. In `Headless` mode animation is skipped and every `update`
//! completes the head action.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info};

use crate::actions::{
    ActionAnimationUpdateResult, ActionContext, ActionName, ExtraActionParams, GameAction,
    GameActionFactory,
};
use crate::cards::{CardId, CardRegistry};
use crate::core::{BoardState, EngineConfig, EngineOperationMode, GameRng, PlayerId};
use crate::rules::GameRuleEngine;

/// RNG context used to shuffle decks at battle setup.
const DECK_SHUFFLE_CONTEXT: &str = "deck-shuffle";

/// Published when a serializable action's state is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializableGameActionEvent {
    pub action_name: ActionName,
    pub extra_action_params: ExtraActionParams,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionOrigin {
    /// Pushed through `push_action`.
    External,
    /// Requested by another action.
    FollowUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionPhase {
    Queued,
    StateApplied,
    Animating,
}

#[derive(Debug)]
struct QueuedAction {
    action: Box<dyn GameAction>,
    origin: ActionOrigin,
    phase: ActionPhase,
}

/// Owns the action queue and the board it mutates.
#[derive(Debug)]
pub struct GameActionEngine {
    config: EngineConfig,
    seed: u64,
    board: BoardState,
    rules: GameRuleEngine,
    factory: GameActionFactory,
    queue: VecDeque<QueuedAction>,
    subscribers: Vec<Sender<SerializableGameActionEvent>>,
    log_transitions: bool,
    applied_actions: u64,
}

impl GameActionEngine {
    /// Set up a battle from two decks.
    ///
    /// Decks are shuffled with the seed when the battle rules ask for it,
    /// so the same seed and decks always produce the same opening board.
    pub fn new(
        config: EngineConfig,
        cards: CardRegistry,
        seed: u64,
        top_deck: &[CardId],
        bot_deck: &[CardId],
    ) -> Self {
        let mut top = top_deck.to_vec();
        let mut bot = bot_deck.to_vec();
        if config.rules.shuffle_decks {
            let mut rng = GameRng::new(seed).for_context(DECK_SHUFFLE_CONTEXT);
            rng.shuffle(&mut top);
            rng.shuffle(&mut bot);
        }

        let board = BoardState::new(&config.rules, top, bot);
        let rules = GameRuleEngine::new(cards, config.rules.clone());
        Self::from_board(config, rules, seed, board)
    }

    /// Drive an existing board.
    ///
    /// The battle rules of `rules` replace `config.rules`, so actions and
    /// serializers always see the same rules.
    pub fn from_board(
        mut config: EngineConfig,
        rules: GameRuleEngine,
        seed: u64,
        board: BoardState,
    ) -> Self {
        config.rules = rules.battle_rules().clone();
        let log_transitions = config.log_action_transitions;
        Self {
            config,
            seed,
            board,
            rules,
            factory: GameActionFactory::new(),
            queue: VecDeque::new(),
            subscribers: Vec::new(),
            log_transitions,
            applied_actions: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn board_state(&self) -> &BoardState {
        &self.board
    }

    /// Mutable board access for host-side setup. Must not be used while an
    /// action is animating.
    pub fn board_state_mut(&mut self) -> &mut BoardState {
        &mut self.board
    }

    #[must_use]
    pub fn rule_engine(&self) -> &GameRuleEngine {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn operation_mode(&self) -> EngineOperationMode {
        self.config.operation_mode
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.rules.winner(&self.board)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Name of the head action, or `Idle` when nothing is queued.
    #[must_use]
    pub fn active_action_name(&self) -> ActionName {
        self.queue
            .front()
            .map_or(ActionName::Idle, |queued| queued.action.name())
    }

    /// The head action, whose state has already been applied.
    #[must_use]
    pub fn active_action(&self) -> Option<&dyn GameAction> {
        self.queue.front().map(|queued| queued.action.as_ref())
    }

    /// Queued actions, including the head.
    #[must_use]
    pub fn pending_action_count(&self) -> usize {
        self.queue.len()
    }

    /// Actions whose state has been applied since construction.
    #[must_use]
    pub fn applied_action_count(&self) -> u64 {
        self.applied_actions
    }

    pub fn set_logging_action_transitions(&mut self, enabled: bool) {
        self.log_transitions = enabled;
    }

    pub fn set_operation_mode(&mut self, mode: EngineOperationMode) {
        self.config.operation_mode = mode;
    }

    // === Events ===

    /// Receive every `SerializableGameActionEvent` from now on.
    pub fn subscribe(&mut self) -> Receiver<SerializableGameActionEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    fn publish(&mut self, event: SerializableGameActionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    // === Driving ===

    /// Queue an action. If the engine was idle its state is applied before
    /// this returns.
    ///
    /// # Panics
    ///
    /// Panics if the action rejects `extra` (missing or malformed params),
    /// or if applying it breaks one of its preconditions.
    pub fn push_action(&mut self, name: ActionName, extra: ExtraActionParams) {
        let action = self.factory.create_game_action(name, &extra);
        if self.log_transitions {
            debug!(action = %name, queued = self.queue.len(), "action pushed");
        }

        self.queue.push_back(QueuedAction {
            action,
            origin: ActionOrigin::External,
            phase: ActionPhase::Queued,
        });
        if self.queue.len() == 1 {
            self.apply_head();
        }
    }

    /// Advance by one host tick.
    pub fn update(&mut self, dt_millis: f32) {
        let Some(head) = self.queue.front_mut() else {
            return;
        };

        let finished = match (self.config.operation_mode, head.phase) {
            (EngineOperationMode::Animated, ActionPhase::Animating) => {
                head.action.update_animation(dt_millis) == ActionAnimationUpdateResult::Finished
            }
            _ => true,
        };
        if !finished {
            return;
        }

        if let Some(done) = self.queue.pop_front() {
            if self.log_transitions {
                debug!(
                    action = %done.action.name(),
                    remaining = self.queue.len(),
                    "action finished"
                );
            }
        }
        if !self.queue.is_empty() {
            self.apply_head();
        }
    }

    /// Tick until the queue drains. Returns the number of ticks taken.
    pub fn update_until_idle(&mut self, dt_millis: f32) -> usize {
        let mut ticks = 0;
        while !self.is_idle() {
            self.update(dt_millis);
            ticks += 1;
        }
        ticks
    }

    fn apply_head(&mut self) {
        let Some(head) = self.queue.front_mut() else {
            return;
        };
        debug_assert_eq!(head.phase, ActionPhase::Queued);

        let mut ctx = ActionContext::new(&mut self.board, &self.rules);
        head.action.set_new_game_state(&mut ctx);
        let follow_ups = ctx.into_follow_ups();
        head.phase = ActionPhase::StateApplied;
        self.applied_actions += 1;

        let name = head.action.name();
        if self.log_transitions {
            debug!(action = %name, follow_ups = follow_ups.len(), "action state applied");
        }

        let animated = self.config.operation_mode == EngineOperationMode::Animated;
        if animated && head.action.has_animation() {
            head.action.init_animation(&self.config.animation);
            head.phase = ActionPhase::Animating;
        }

        let event = (head.origin == ActionOrigin::External && head.action.should_be_serialized())
            .then(|| SerializableGameActionEvent {
                action_name: name,
                extra_action_params: head.action.serialized_params(),
            });

        for (offset, request) in follow_ups.into_iter().enumerate() {
            let action = self.factory.create_game_action(request.name, &request.params);
            self.queue.insert(
                offset + 1,
                QueuedAction {
                    action,
                    origin: ActionOrigin::FollowUp,
                    phase: ActionPhase::Queued,
                },
            );
        }

        if name == ActionName::GameOver {
            if let Some(winner) = self.board.winner() {
                info!(%winner, applied = self.applied_actions, "battle decided");
            }
        }

        if let Some(event) = event {
            self.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{params, ActionRequest};

    fn ids(raw: &[u32]) -> Vec<CardId> {
        raw.iter().copied().map(CardId::new).collect()
    }

    fn engine(mode: EngineOperationMode) -> GameActionEngine {
        GameActionEngine::new(
            EngineConfig::default().with_operation_mode(mode),
            CardRegistry::standard(),
            42,
            &ids(&[1, 2, 3]),
            &ids(&[4, 5, 6]),
        )
    }

    fn push(engine: &mut GameActionEngine, request: ActionRequest) {
        engine.push_action(request.name, request.params);
    }

    #[test]
    fn test_starts_idle() {
        let engine = engine(EngineOperationMode::Animated);

        assert!(engine.is_idle());
        assert_eq!(engine.active_action_name(), ActionName::Idle);
        assert_eq!(engine.pending_action_count(), 0);
        assert_eq!(engine.seed(), 42);
    }

    #[test]
    fn test_push_applies_immediately_when_idle() {
        let mut engine = engine(EngineOperationMode::Animated);

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));

        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 1);
        assert_eq!(engine.active_action_name(), ActionName::DrawCard);
        assert!(!engine.is_idle());
    }

    #[test]
    fn test_second_push_waits_for_animation() {
        let mut engine = engine(EngineOperationMode::Animated);

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 1);

        engine.update(100.0);
        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 1);

        engine.update(300.0);
        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 2);
        assert_eq!(engine.pending_action_count(), 1);

        engine.update(400.0);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_headless_completes_one_action_per_update() {
        let mut engine = engine(EngineOperationMode::Headless);

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        push(&mut engine, ActionRequest::new(ActionName::DrawCard));

        engine.update(0.0);
        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 2);
        engine.update(0.0);
        assert_eq!(engine.board_state().player(PlayerId::TOP).held_cards.len(), 3);
        engine.update(0.0);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_follow_ups_run_before_later_pushes() {
        let mut engine = engine(EngineOperationMode::Headless);

        push(&mut engine, ActionRequest::new(ActionName::NextPlayer));
        push(&mut engine, ActionRequest::new(ActionName::PlayCard));

        // NextPlayer → PostNextPlayer → DrawCard → PlayCard
        let mut order = vec![engine.active_action_name()];
        while !engine.is_idle() {
            engine.update(0.0);
            order.push(engine.active_action_name());
        }

        assert_eq!(
            order,
            vec![
                ActionName::NextPlayer,
                ActionName::PostNextPlayer,
                ActionName::DrawCard,
                ActionName::PlayCard,
                ActionName::Idle,
            ]
        );
        // Bottom drew card 4 (weight 2) with 1 ammo, so the play aborted.
        let bot = engine.board_state().player(PlayerId::BOT);
        assert_eq!(bot.held_cards.len(), 1);
        assert!(bot.board_cards.is_empty());
    }

    #[test]
    fn test_only_external_serializable_actions_publish() {
        let mut engine = engine(EngineOperationMode::Headless);
        let events = engine.subscribe();

        push(&mut engine, ActionRequest::new(ActionName::BattleInitialAnimation));
        push(&mut engine, ActionRequest::new(ActionName::NextPlayer));
        engine.update_until_idle(16.0);

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![SerializableGameActionEvent {
                action_name: ActionName::NextPlayer,
                extra_action_params: ExtraActionParams::new(),
            }]
        );
    }

    #[test]
    fn test_event_emitted_at_state_application() {
        let mut engine = engine(EngineOperationMode::Animated);
        let events = engine.subscribe();

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        assert_eq!(events.try_iter().count(), 1);

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        assert_eq!(events.try_iter().count(), 0);

        engine.update(1000.0);
        assert_eq!(events.try_iter().count(), 1);
    }

    #[test]
    fn test_play_card_event_carries_resolved_index() {
        let mut engine = engine(EngineOperationMode::Headless);
        engine.board_state_mut().player_mut(PlayerId::TOP).current_weight_ammo = 10;
        let events = engine.subscribe();

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        push(&mut engine, ActionRequest::new(ActionName::DrawCard));
        push(&mut engine, ActionRequest::new(ActionName::PlayCard));
        engine.update_until_idle(0.0);

        let last = events.try_iter().last().unwrap();
        assert_eq!(last.action_name, ActionName::PlayCard);
        assert_eq!(
            last.extra_action_params.get(params::LAST_PLAYED_CARD_INDEX).map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_dropped_subscriber_is_removed() {
        let mut engine = engine(EngineOperationMode::Headless);
        let events = engine.subscribe();
        drop(events);

        push(&mut engine, ActionRequest::new(ActionName::DrawCard));

        assert!(engine.subscribers.is_empty());
    }

    #[test]
    fn test_update_when_idle_is_noop() {
        let mut engine = engine(EngineOperationMode::Animated);
        let before = engine.board_state().clone();

        engine.update(16.0);

        assert_eq!(engine.board_state(), &before);
        assert_eq!(engine.applied_action_count(), 0);
    }

    #[test]
    fn test_from_board_takes_rules_from_rule_engine() {
        let rules = GameRuleEngine::new(
            CardRegistry::standard(),
            crate::core::BattleRules::default().with_cards_drawn_per_turn(2),
        );
        let board = BoardState::new(rules.battle_rules(), ids(&[1]), ids(&[2]));

        let engine = GameActionEngine::from_board(EngineConfig::headless(), rules, 3, board);

        assert_eq!(engine.config().rules.cards_drawn_per_turn, 2);
        assert_eq!(&engine.config().rules, engine.rule_engine().battle_rules());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let config = EngineConfig::headless()
            .with_rules(crate::core::BattleRules::default().with_shuffle_decks(true));
        let deck: Vec<_> = ids(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);

        let a = GameActionEngine::new(config.clone(), CardRegistry::standard(), 7, &deck, &deck);
        let b = GameActionEngine::new(config, CardRegistry::standard(), 7, &deck, &deck);

        assert_eq!(a.board_state(), b.board_state());
        let mut dealt: Vec<_> = a.board_state().player(PlayerId::TOP).deck_cards.iter().copied().collect();
        dealt.sort();
        assert_eq!(dealt, deck);
    }
}
