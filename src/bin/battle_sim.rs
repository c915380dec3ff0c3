//! Headless battle simulator.
//!
//! `simulate` plays two remote players against each other, writes the
//! battle record and checks that replaying it reproduces the final board.
//! `replay` loads a record and replays it.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use battle_engine::{
    ActionName, BattleSerializer, BoardState, CardId, CardRegistry, DataFileFormat,
    DecisionPolicy, EngineConfig, EngineOperationMode, ExtraActionParams, GameActionEngine,
    GameReplayEngine, HeaviestFirst, HighestDamageFirst, PlayerId, PlayerMap,
    RemotePlayerActionEngine, SeededRandom,
};

#[derive(Parser)]
#[command(
    name = "battle-sim",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an AI-vs-AI battle, record it and verify the replay.
    Simulate(SimulateArgs),
    /// Replay a battle record headlessly.
    Replay {
        /// Record file; `.bin` is read as binary, anything else as JSON.
        file: PathBuf,

        /// Card catalog JSON the battle was played with.
        #[arg(long)]
        cards: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SimulateArgs {
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many turns if nobody has won.
    #[arg(long, default_value_t = 60)]
    max_turns: u32,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Directory the battle record is written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = PolicyArg::Heaviest)]
    policy: PolicyArg,

    /// Comma-separated card ids. Defaults to the standard catalog, twice.
    #[arg(long, value_delimiter = ',')]
    top_deck: Vec<u32>,

    #[arg(long, value_delimiter = ',')]
    bot_deck: Vec<u32>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card catalog JSON. Defaults to the built-in catalog.
    #[arg(long)]
    cards: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Binary,
}

impl From<FormatArg> for DataFileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => DataFileFormat::Json,
            FormatArg::Binary => DataFileFormat::Binary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Heaviest,
    Damage,
    Random,
}

type Player = RemotePlayerActionEngine<Box<dyn DecisionPolicy>>;

fn make_player(policy: PolicyArg, player: PlayerId, seed: u64) -> Player {
    let policy: Box<dyn DecisionPolicy> = match policy {
        PolicyArg::Heaviest => Box::new(HeaviestFirst),
        PolicyArg::Damage => Box::new(HighestDamageFirst),
        PolicyArg::Random => Box::new(SeededRandom::new(seed.wrapping_add(player.index() as u64))),
    };
    RemotePlayerActionEngine::new(player, policy)
}

fn load_cards(path: Option<&PathBuf>) -> Result<CardRegistry, Box<dyn Error>> {
    Ok(match path {
        Some(path) => CardRegistry::from_json_file(path)?,
        None => CardRegistry::standard(),
    })
}

fn check_decks(top: &[CardId], bot: &[CardId], cards: &CardRegistry) -> Result<(), String> {
    match top.iter().chain(bot).find(|&&id| !cards.contains(id)) {
        Some(id) => Err(format!("{id} is not in the card catalog")),
        None => Ok(()),
    }
}

fn deck_or_default(raw: &[u32], cards: &CardRegistry) -> Vec<CardId> {
    if raw.is_empty() {
        let mut ids: Vec<_> = cards.iter().map(|card| card.id).collect();
        ids.sort();
        return ids.iter().chain(ids.iter()).copied().collect();
    }
    raw.iter().copied().map(CardId::new).collect()
}

fn summarize(board: &BoardState) {
    println!("turn {}, active {}", board.turn_counter(), board.active_player());
    for player in PlayerId::both() {
        let state = board.player(player);
        println!(
            "  {player}: health {}, deck {}, held {}, board {}, discarded {}",
            state.health,
            state.deck_cards.len(),
            state.held_cards.len(),
            state.board_cards.len(),
            state.discarded_cards.len(),
        );
    }
    match board.winner() {
        Some(winner) => println!("  winner: {winner}"),
        None => println!("  no winner"),
    }
}

fn simulate(args: SimulateArgs) -> Result<bool, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    }
    .with_operation_mode(EngineOperationMode::Headless);
    let format = args.format.map_or(config.data_file_format, DataFileFormat::from);

    let cards = load_cards(args.cards.as_ref())?;
    let top_deck = deck_or_default(&args.top_deck, &cards);
    let bot_deck = deck_or_default(&args.bot_deck, &cards);
    check_decks(&top_deck, &bot_deck, &cards)?;

    let mut engine =
        GameActionEngine::new(config.clone(), cards.clone(), args.seed, &top_deck, &bot_deck);
    let mut serializer = BattleSerializer::new(&mut engine, &top_deck, &bot_deck);
    let mut players = PlayerMap::new(|player| make_player(args.policy, player, args.seed));

    engine.push_action(ActionName::BattleInitialAnimation, ExtraActionParams::new());
    engine.update_until_idle(0.0);

    while engine.winner().is_none() && engine.board_state().turn_counter() < args.max_turns {
        let active = engine.board_state().active_player();
        players[active].decide_and_push_next_actions(&mut engine);
        engine.update_until_idle(0.0);
    }

    match engine.winner() {
        Some(winner) => info!(%winner, turns = engine.board_state().turn_counter(), "battle over"),
        None => warn!(max_turns = args.max_turns, "turn cap reached without a winner"),
    }
    summarize(engine.board_state());

    let path = serializer.flush_state_to_file(&args.out, format)?;
    println!("record written to {}", path.display());

    let replayed =
        GameReplayEngine::from_file_with_format(&path, format)?.replay_headless(config, cards)?;
    let matches = replayed.board_state() == engine.board_state();
    if matches {
        println!("replay matches");
    } else {
        error!(path = %path.display(), "replayed board differs from the live board");
    }
    Ok(matches)
}

fn replay(file: PathBuf, cards: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let replay = GameReplayEngine::from_file(&file)?;
    let cards = load_cards(cards.as_ref())?;
    check_decks(replay.top_player_deck(), replay.bot_player_deck(), &cards)?;
    let engine = replay.replay_headless(EngineConfig::headless(), cards)?;
    println!(
        "seed {}, {} recorded actions",
        replay.game_file_seed(),
        replay.record().actions.len()
    );
    summarize(engine.board_state());
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match Cli::parse().command {
        Command::Simulate(args) => simulate(args),
        Command::Replay { file, cards } => replay(file, cards).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
