//! Trainer - self-play MCTS training loop
//!
//! Subcommands:
//! 1. `train`: self-play, learn from the games, gate the new network in the arena
//! 2. `self-play`: play games with the saved network and print the examples
//! 3. `arena`: pit the saved network against the random or rollout baseline

use std::fmt::Display;

use anyhow::{Context, Result};
use clap::Parser;
use engine_config::CentralConfig;
use engine_core::GameState;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{Agent, EvaluationCache, RandomAgent, SearchTree};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{info, warn};
use trainer::{search_config, Arena, Coach, CoachConfig, LinearNetwork, SelfPlayDriver};

mod config;

use crate::config::{Command, Config, Opponent};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let central = config.central();
    central.validate().context("invalid configuration")?;

    info!(
        env_id = %config.env_id,
        seed = config.seed,
        num_simulations = config.num_simulations,
        "Starting trainer"
    );

    match config.env_id.as_str() {
        "connect4" => run::<Connect4>(&config, &central),
        _ => run::<TicTacToe>(&config, &central),
    }
}

fn run<S: GameState + Display>(config: &Config, central: &CentralConfig) -> Result<()> {
    match &config.command {
        Command::Train { .. } => train::<S>(config, central),
        Command::SelfPlay { games } => self_play::<S>(config, central, *games),
        Command::Arena { opponent, games } => arena::<S>(config, central, *opponent, *games),
    }
}

fn train<S: GameState>(config: &Config, central: &CentralConfig) -> Result<()> {
    let mut coach_config = CoachConfig::from_central(central, config.model_path());
    coach_config.show_progress = true;

    let mut coach = Coach::<S>::new(coach_config).context("failed to create coach")?;
    let reports = coach.run().context("training failed")?;

    let promoted = reports
        .iter()
        .filter(|r| matches!(r.vs_previous, Some((_, trainer::GateDecision::Promote))))
        .count();
    info!(
        iterations = reports.len(),
        promoted,
        model = %config.model_path().display(),
        "Training complete"
    );
    Ok(())
}

fn load_network<S: GameState>(config: &Config) -> Result<LinearNetwork> {
    let path = config.model_path();
    if path.exists() {
        let network = LinearNetwork::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        info!(path = %path.display(), "Loaded saved network");
        Ok(network)
    } else {
        warn!(path = %path.display(), "No saved network, using a fresh one");
        Ok(LinearNetwork::for_game::<S>())
    }
}

fn self_play<S: GameState + Display>(config: &Config, central: &CentralConfig, games: usize) -> Result<()> {
    let coach_config = CoachConfig::from_central(central, config.model_path());
    let mut driver = SelfPlayDriver::<S, _>::new(
        coach_config.search,
        load_network::<S>(config)?,
        coach_config.cache_capacity,
        coach_config.selfplay,
        config.seed,
    );

    let added = driver
        .generate_training_samples(games, coach_config.temperature)
        .context("self-play failed")?;
    info!(games, examples = added, "Self-play complete");

    for example in driver.examples() {
        println!("{}\n", example);
    }
    Ok(())
}

fn arena<S: GameState>(config: &Config, central: &CentralConfig, opponent: Opponent, games: usize) -> Result<()> {
    let coach_config = CoachConfig::from_central(central, config.model_path());
    let mut search = SearchTree::new(
        search_config(central).with_train(false),
        EvaluationCache::new(load_network::<S>(config)?, central.mcts.cache_capacity),
    )
    .with_name("network");

    let mut other: Box<dyn Agent<S>> = match opponent {
        Opponent::Random => Box::new(RandomAgent::new()),
        Opponent::Rollout => Box::new(coach_config.baseline.agent::<S>(config.seed)),
    };

    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    let result = Arena::test::<S, _, _>(
        &mut search,
        other.as_mut(),
        coach_config.temp_exploitation,
        games,
        &mut rng,
    )
    .context("arena failed")?;

    println!("{} vs {}: {}", search.name(), other.name(), result);
    Ok(())
}
