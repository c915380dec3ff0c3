//! Property tests over random sequences of legal actions.

use proptest::prelude::*;

use battle_engine::{
    ActionName, BattleRules, CardId, CardRegistry, EngineConfig, EngineOperationMode, GameActionEngine,
    GameRecord, GameReplayEngine, PlayerId, RecordedAction,
};

fn deck(raw: &[u8]) -> Vec<CardId> {
    raw.iter().map(|&id| CardId::new(u32::from(id))).collect()
}

/// Play `choices` as indices into the legal action list, one per step.
fn play_legal_actions(engine: &mut GameActionEngine, choices: &[u8]) {
    for &choice in choices {
        let legal = engine.rule_engine().legal_actions(engine.board_state());
        if legal.is_empty() {
            break;
        }
        let request = legal[usize::from(choice) % legal.len()].clone();
        engine.push_action(request.name, request.params);
        engine.update_until_idle(250.0);
    }
}

fn total_cards(engine: &GameActionEngine, player: PlayerId) -> usize {
    let state = engine.board_state().player(player);
    state.deck_cards.len() + state.held_cards.len() + state.board_cards.len() + state.discarded_cards.len()
}

proptest! {
    /// Replaying the recorded log reproduces the live board exactly.
    #[test]
    fn replay_reproduces_live_board(
        seed in any::<u64>(),
        top in prop::collection::vec(0u8..12, 0..16),
        bot in prop::collection::vec(0u8..12, 0..16),
        choices in prop::collection::vec(any::<u8>(), 1..60),
        animated in any::<bool>(),
        shuffle in any::<bool>(),
    ) {
        let mode = if animated { EngineOperationMode::Animated } else { EngineOperationMode::Headless };
        let config = EngineConfig::default()
            .with_operation_mode(mode)
            .with_rules(BattleRules::default().with_starting_health(12).with_shuffle_decks(shuffle));
        let (top, bot) = (deck(&top), deck(&bot));

        let mut live = GameActionEngine::new(config.clone(), CardRegistry::standard(), seed, &top, &bot);
        let events = live.subscribe();
        play_legal_actions(&mut live, &choices);

        let mut record = GameRecord::new(seed, top, bot);
        record.actions = events.try_iter().map(RecordedAction::from).collect();
        let replayed = GameReplayEngine::from_record(record)
            .replay_headless(config, CardRegistry::standard())
            .unwrap();

        prop_assert_eq!(replayed.board_state(), live.board_state());
    }

    /// Cards are never created or lost, and marks never outlive a turn.
    #[test]
    fn cards_are_conserved(
        seed in any::<u64>(),
        top in prop::collection::vec(0u8..12, 0..16),
        bot in prop::collection::vec(0u8..12, 0..16),
        choices in prop::collection::vec(any::<u8>(), 1..60),
    ) {
        let mut engine = GameActionEngine::new(
            EngineConfig::headless(),
            CardRegistry::standard(),
            seed,
            &deck(&top),
            &deck(&bot),
        );
        play_legal_actions(&mut engine, &choices);

        prop_assert_eq!(total_cards(&engine, PlayerId::TOP), top.len());
        prop_assert_eq!(total_cards(&engine, PlayerId::BOT), bot.len());
        let inactive = engine.board_state().inactive_player_state();
        prop_assert!(inactive.board_card_indices_to_destroy.is_empty() || engine.winner().is_some());
    }

    /// Weight ammo never exceeds its total, and a player at zero health has
    /// always lost.
    #[test]
    fn ammo_and_health_bounds(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<u8>(), 1..80),
    ) {
        let full: Vec<u8> = (0..12).collect();
        let mut engine = GameActionEngine::new(
            EngineConfig::headless().with_rules(BattleRules::default().with_starting_health(8)),
            CardRegistry::standard(),
            seed,
            &deck(&full),
            &deck(&full),
        );
        play_legal_actions(&mut engine, &choices);

        for player in PlayerId::both() {
            let state = engine.board_state().player(player);
            prop_assert!(state.current_weight_ammo <= state.total_weight_ammo);
            if state.health == 0 {
                prop_assert_eq!(engine.winner(), Some(player.opponent()));
            }
        }
    }

    /// Every turn change hands the turn to the other player.
    #[test]
    fn next_player_alternates(turns in 0usize..40, seed in any::<u64>()) {
        let full: Vec<u8> = (0..12).collect();
        let mut engine = GameActionEngine::new(
            EngineConfig::headless(),
            CardRegistry::standard(),
            seed,
            &deck(&full),
            &deck(&full),
        );
        for _ in 0..turns {
            engine.push_action(ActionName::NextPlayer, Default::default());
        }
        engine.update_until_idle(0.0);

        let expected = if turns % 2 == 0 { PlayerId::TOP } else { PlayerId::BOT };
        prop_assert_eq!(engine.board_state().active_player(), expected);
        prop_assert_eq!(engine.board_state().turn_counter() as usize, turns);
    }
}
