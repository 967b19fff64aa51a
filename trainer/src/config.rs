//! Command-line configuration for the trainer binary
//!
//! Defaults come from the central config.toml (with `SELFPLAY_*` env
//! overrides). CLI arguments take highest priority.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

/// Games the trainer knows how to play.
pub const SUPPORTED_GAMES: &[&str] = &["tictactoe", "connect4"];

fn default_env_id() -> String {
    CENTRAL_CONFIG.common.env_id.clone()
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.training.seed
}

fn default_num_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.training.iterations
}

fn default_games_per_iteration() -> usize {
    CENTRAL_CONFIG.training.games_per_iteration
}

fn default_eval_games() -> usize {
    CENTRAL_CONFIG.evaluation.games
}

#[derive(Parser, Debug, Clone)]
#[command(name = "trainer")]
#[command(about = "Self-play MCTS trainer")]
#[command(
    long_about = "Trains a policy/value evaluator through self-play guided by Monte Carlo
Tree Search, and pits saved networks against baseline agents.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Game to play (tictactoe, connect4)
    #[arg(long, global = true, default_value_t = default_env_id())]
    pub env_id: String,

    /// Seed for every random choice the trainer makes
    #[arg(long, global = true, default_value_t = default_seed())]
    pub seed: u64,

    /// Data directory for saved networks
    #[arg(long, global = true, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Number of MCTS simulations per move
    #[arg(long, global = true, default_value_t = default_num_simulations())]
    pub num_simulations: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the self-play / learn / evaluate loop
    Train {
        #[arg(long, default_value_t = default_iterations())]
        iterations: u32,

        /// Self-play games per iteration
        #[arg(long, default_value_t = default_games_per_iteration())]
        games: usize,
    },

    /// Play games with the saved network and print every training example
    SelfPlay {
        #[arg(long, default_value_t = 1)]
        games: usize,
    },

    /// Pit the saved network against a baseline agent
    Arena {
        #[arg(long, value_enum, default_value_t = Opponent::Random)]
        opponent: Opponent,

        #[arg(long, default_value_t = default_eval_games())]
        games: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Uniform random legal moves
    Random,
    /// Shallow search with random playouts
    Rollout,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_GAMES.contains(&self.env_id.as_str()) {
            return Err(anyhow!(
                "unknown env_id '{}', expected one of {}",
                self.env_id,
                SUPPORTED_GAMES.join(", ")
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.num_simulations == 0 {
            return Err(anyhow!("num_simulations must be greater than 0"));
        }

        let games = match &self.command {
            Command::Train { games, .. } => *games,
            Command::SelfPlay { games } => *games,
            Command::Arena { games, .. } => *games,
        };
        if games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        Ok(())
    }

    /// Central config with this command line applied on top.
    pub fn central(&self) -> CentralConfig {
        let mut central = CENTRAL_CONFIG.clone();
        central.common.env_id = self.env_id.clone();
        central.common.data_dir = self.data_dir.clone();
        central.common.log_level = self.log_level.clone();
        central.training.seed = self.seed;
        central.mcts.num_simulations = self.num_simulations;
        match &self.command {
            Command::Train { iterations, games } => {
                central.training.iterations = *iterations;
                central.training.games_per_iteration = *games;
            }
            Command::Arena { games, .. } => central.evaluation.games = *games,
            Command::SelfPlay { .. } => {}
        }
        central
    }

    /// Path of the saved network for the selected game
    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
            .join("models")
            .join(format!("{}.json", self.env_id))
    }
}
