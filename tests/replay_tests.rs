//! Battle record and replay integration tests.
//!
//! Each test plays a battle live, writes its record to disk, and replays
//! the record into a fresh engine.

use std::fs;
use std::path::PathBuf;

use battle_engine::actions::params;
use battle_engine::{
    ActionName, ActionRequest, BattleRules, BattleSerializer, BoardState, CardId, CardRegistry,
    DataFileFormat, EngineConfig, EngineOperationMode, GameActionEngine, GameReplayEngine,
    GameRuleEngine, GameSerializer, PersistenceError, PlayerId, ReplayError,
};

fn ids(raw: &[u32]) -> Vec<CardId> {
    raw.iter().copied().map(CardId::new).collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("battle-engine-replay-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn push(engine: &mut GameActionEngine, request: ActionRequest) {
    engine.push_action(request.name, request.params);
}

/// Five external actions: two empty turns, a play, a turn change with an
/// attack, and a draw.
fn five_action_game(engine: &mut GameActionEngine) {
    push(engine, ActionRequest::new(ActionName::NextPlayer));
    push(engine, ActionRequest::new(ActionName::NextPlayer));
    push(
        engine,
        ActionRequest::new(ActionName::PlayCard).with_param(params::LAST_PLAYED_CARD_INDEX, 0),
    );
    push(engine, ActionRequest::new(ActionName::NextPlayer));
    push(engine, ActionRequest::new(ActionName::DrawCard));
    engine.update_until_idle(1000.0);
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// Test that a flushed 5-action game replays to the same board.
#[test]
fn test_five_action_game_replays_exactly() {
    let (top, bot) = (ids(&[1, 2, 3]), ids(&[4, 5, 6]));
    let mut live = GameActionEngine::new(EngineConfig::default(), CardRegistry::standard(), 42, &top, &bot);
    let mut serializer = GameSerializer::new(42, &top, &bot, live.subscribe());

    five_action_game(&mut live);

    // The attack landed and the board moved on as expected.
    assert_eq!(live.board_state().player(PlayerId::BOT).health, 29);
    assert_eq!(live.board_state().player(PlayerId::BOT).held_cards.len(), 2);

    let dir = scratch_dir("five-actions");
    let path = dir.join("game.json");
    serializer.flush_state_to_file(&path, DataFileFormat::Json).unwrap();

    let replay = GameReplayEngine::from_file(&path).unwrap();
    assert_eq!(replay.game_file_seed(), 42);
    assert_eq!(replay.top_player_deck(), top.as_slice());
    assert_eq!(replay.bot_player_deck(), bot.as_slice());
    assert_eq!(replay.record().actions.len(), 5);

    let mut fresh = replay.build_engine(EngineConfig::default(), CardRegistry::standard());
    assert_eq!(replay.replay_actions(&mut fresh).unwrap(), 5);
    fresh.update_until_idle(1000.0);

    assert_eq!(fresh.board_state(), live.board_state());
    let _ = fs::remove_dir_all(&dir);
}

/// Test a binary battle record with non-default rules and shuffled decks.
#[test]
fn test_battle_record_binary_with_setup() {
    let rules = BattleRules::default()
        .with_starting_health(10)
        .with_shuffle_decks(true)
        .with_discard_held_cards_on_turn_end(false);
    let config = EngineConfig::headless().with_rules(rules.clone());
    let deck = ids(&[0, 1, 2, 3, 4, 5, 6, 7]);

    let mut live = GameActionEngine::new(config, CardRegistry::standard(), 1234, &deck, &deck);
    let mut serializer = BattleSerializer::new(&mut live, &deck, &deck);
    for _ in 0..6 {
        push(&mut live, ActionRequest::new(ActionName::NextPlayer));
    }
    live.update_until_idle(0.0);

    let dir = scratch_dir("binary");
    let path = serializer.flush_state_to_file(&dir, DataFileFormat::Binary).unwrap();
    assert!(path.ends_with("last_battle.bin"));

    let replay = GameReplayEngine::from_file(&path).unwrap();
    assert_eq!(replay.battle_rules(), Some(&rules));

    // Default config: the stored rules must win for the replay to match.
    let replayed = replay
        .replay_headless(EngineConfig::default(), CardRegistry::standard())
        .unwrap();

    assert_eq!(replayed.board_state(), live.board_state());
    assert_eq!(replayed.board_state().player(PlayerId::TOP).health, 10);
    let _ = fs::remove_dir_all(&dir);
}

/// Test that a battle driven from a prepared board records the rules its
/// actions ran with, even when the config passed alongside disagrees.
#[test]
fn test_battle_from_board_replays_with_rule_engine_rules() {
    let (top, bot) = (ids(&[1, 2, 3]), ids(&[4, 5, 6]));
    let rules = BattleRules::default().with_cards_drawn_per_turn(2);
    let board = BoardState::new(&rules, top.clone(), bot.clone());
    let rule_engine = GameRuleEngine::new(CardRegistry::standard(), rules.clone());

    let mut live = GameActionEngine::from_board(EngineConfig::headless(), rule_engine, 9, board);
    let mut serializer = BattleSerializer::new(&mut live, &top, &bot);
    push(&mut live, ActionRequest::new(ActionName::NextPlayer));
    live.update_until_idle(0.0);
    assert_eq!(live.board_state().player(PlayerId::BOT).held_cards.len(), 2);

    assert_eq!(serializer.record().setup.as_ref(), Some(&rules));
    let replay = GameReplayEngine::from_record(serializer.record().clone());
    let replayed = replay
        .replay_headless(EngineConfig::default(), CardRegistry::standard())
        .unwrap();

    assert_eq!(replayed.board_state(), live.board_state());
}

/// Test that live and replayed runs match regardless of when actions were
/// pushed relative to ticks.
#[test]
fn test_push_timing_does_not_matter() {
    let (top, bot) = (ids(&[1, 2, 3]), ids(&[4, 5, 6]));
    let mut live = GameActionEngine::new(
        EngineConfig::default().with_operation_mode(EngineOperationMode::Animated),
        CardRegistry::standard(),
        42,
        &top,
        &bot,
    );
    let mut serializer = GameSerializer::new(42, &top, &bot, live.subscribe());

    // Interleave pushes with partial ticks.
    push(&mut live, ActionRequest::new(ActionName::NextPlayer));
    live.update(10.0);
    push(&mut live, ActionRequest::new(ActionName::NextPlayer));
    live.update(5000.0);
    live.update(5000.0);
    push(&mut live, ActionRequest::new(ActionName::PlayCard));
    live.update_until_idle(50.0);

    let replay = GameReplayEngine::from_record(serializer.record().clone());
    let replayed = replay
        .replay_headless(EngineConfig::default(), CardRegistry::standard())
        .unwrap();

    assert_eq!(replayed.board_state(), live.board_state());
    assert_eq!(replayed.board_state().player(PlayerId::TOP).board_cards.len(), 1);
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Test that a corrupted file is reported, not replayed.
#[test]
fn test_corrupted_record_rejected() {
    let (top, bot) = (ids(&[1, 2, 3]), ids(&[4, 5, 6]));
    let mut live = GameActionEngine::new(EngineConfig::headless(), CardRegistry::standard(), 42, &top, &bot);
    let mut serializer = GameSerializer::new(42, &top, &bot, live.subscribe());
    five_action_game(&mut live);

    let dir = scratch_dir("corrupted");
    let path = dir.join("game.json");
    serializer.flush_state_to_file(&path, DataFileFormat::Json).unwrap();
    let text = fs::read_to_string(&path).unwrap().replace("\"seed\": 42", "\"seed\": 43");
    fs::write(&path, text).unwrap();

    let err = GameReplayEngine::from_file(&path).unwrap_err();

    assert!(matches!(
        err,
        ReplayError::Persistence(PersistenceError::ChecksumMismatch { .. })
    ));
    let _ = fs::remove_dir_all(&dir);
}

/// Test that a failed write leaves the previous record intact.
#[test]
fn test_failed_flush_keeps_previous_record() {
    let (top, bot) = (ids(&[1]), ids(&[4]));
    let mut live = GameActionEngine::new(EngineConfig::headless(), CardRegistry::standard(), 5, &top, &bot);
    let mut serializer = GameSerializer::new(5, &top, &bot, live.subscribe());
    push(&mut live, ActionRequest::new(ActionName::DrawCard));

    let dir = scratch_dir("failed-flush");
    let path = dir.join("game.json");
    serializer.flush_state_to_file(&path, DataFileFormat::Json).unwrap();
    let original = fs::read(&path).unwrap();

    // A directory where the temp file would go makes the next write fail.
    fs::create_dir_all(dir.join("game.json.tmp")).unwrap();
    push(&mut live, ActionRequest::new(ActionName::NextPlayer));
    assert!(serializer.flush_state_to_file(&path, DataFileFormat::Json).is_err());

    assert_eq!(fs::read(&path).unwrap(), original);
    let _ = fs::remove_dir_all(&dir);
}

/// Test that loading a missing file is an I/O error.
#[test]
fn test_missing_record_file() {
    let err = GameReplayEngine::from_file(&scratch_dir("missing").join("none.json")).unwrap_err();

    assert!(matches!(err, ReplayError::Persistence(PersistenceError::Io { .. })));
}
