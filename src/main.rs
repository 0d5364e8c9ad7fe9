//! Queens Farming demo runner.
//!
//! Plays a full game with the greedy reference driver, prints the result,
//! then replays the same configuration and checks that both runs end in the
//! same state hash.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use queens_farming::{
    VERSION, MOVES_PER_TURN,
    game::{GameConfig, GameMaster, GreedyFarmer},
};

/// Queens Farming: deterministic farming economy
#[derive(Parser, Debug)]
#[command(name = "queens-farming")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON game configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the acreage shuffle
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Gold each player starts with
    #[arg(long)]
    start_gold: Option<u32>,

    /// Gold needed to win
    #[arg(short, long)]
    win_gold: Option<u32>,

    /// Stop after this many rounds
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Player names in seating order
    #[arg(num_args = 1..)]
    players: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

/// How the result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// End-of-game message
    Text,
    /// Outcome and final players as JSON
    Json,
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(gold) = args.start_gold {
        config.start_gold = gold;
    }
    if let Some(gold) = args.win_gold {
        config.win_gold = gold;
    }
    if args.rounds.is_some() {
        config.round_limit = args.rounds;
    }
    if !args.players.is_empty() {
        config.players = args.players.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    info!("Queens Farming v{}", VERSION);
    info!(
        "Seed {}, {} players, {} moves per turn, {} gold to win",
        config.seed,
        config.players.len(),
        MOVES_PER_TURN,
        config.win_gold
    );

    let mut master = GameMaster::new(config.clone())?;
    let outcome = master.play(&mut GreedyFarmer::new());
    let hash = master.compute_hash();

    match args.format {
        OutputFormat::Text => println!("{}", outcome.describe()),
        OutputFormat::Json => {
            let players: Vec<_> = master.players().iter().map(|p| p.snapshot()).collect();
            let report = serde_json::json!({
                "outcome": outcome,
                "players": players,
                "events": master.events().len(),
                "hash": hex::encode(hash),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    info!("Final state hash: {}", hex::encode(hash));

    let mut replay = GameMaster::new(config)?;
    replay.play(&mut GreedyFarmer::new());
    let replay_hash = replay.compute_hash();
    anyhow::ensure!(
        hash == replay_hash,
        "replay diverged: {} != {}",
        hex::encode(hash),
        hex::encode(replay_hash)
    );
    info!("Replay matches");

    Ok(())
}
