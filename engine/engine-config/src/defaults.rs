//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the binary and a hand-written config.toml start from identical values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    training: TrainingDefaults,
    evaluation: EvaluationDefaults,
    baseline: BaselineDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    env_id: String,
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    c_puct: f64,
    dirichlet_alpha: f64,
    dirichlet_weight: f64,
    temperature: f64,
    temp_exploitation: f64,
    cache_capacity: usize,
}

#[derive(Debug, Deserialize)]
struct TrainingDefaults {
    iterations: u32,
    games_per_iteration: usize,
    batch_size: usize,
    learning_rate: f64,
    seed: u64,
    max_plies: usize,
    record_terminal: bool,
}

#[derive(Debug, Deserialize)]
struct EvaluationDefaults {
    games: usize,
    win_threshold: f64,
    vs_random: bool,
    vs_baseline: bool,
    vs_previous: bool,
}

#[derive(Debug, Deserialize)]
struct BaselineDefaults {
    num_simulations: u32,
    c_puct: f64,
    max_depth: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn env_id() -> &'static str {
    &DEFAULTS.common.env_id
}
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_weight() -> f64 {
    DEFAULTS.mcts.dirichlet_weight
}
pub fn temperature() -> f64 {
    DEFAULTS.mcts.temperature
}
pub fn temp_exploitation() -> f64 {
    DEFAULTS.mcts.temp_exploitation
}
pub fn cache_capacity() -> usize {
    DEFAULTS.mcts.cache_capacity
}

// Training
pub fn iterations() -> u32 {
    DEFAULTS.training.iterations
}
pub fn games_per_iteration() -> usize {
    DEFAULTS.training.games_per_iteration
}
pub fn batch_size() -> usize {
    DEFAULTS.training.batch_size
}
pub fn learning_rate() -> f64 {
    DEFAULTS.training.learning_rate
}
pub fn seed() -> u64 {
    DEFAULTS.training.seed
}
pub fn max_plies() -> usize {
    DEFAULTS.training.max_plies
}
pub fn record_terminal() -> bool {
    DEFAULTS.training.record_terminal
}

// Evaluation
pub fn eval_games() -> usize {
    DEFAULTS.evaluation.games
}
pub fn win_threshold() -> f64 {
    DEFAULTS.evaluation.win_threshold
}
pub fn vs_random() -> bool {
    DEFAULTS.evaluation.vs_random
}
pub fn vs_baseline() -> bool {
    DEFAULTS.evaluation.vs_baseline
}
pub fn vs_previous() -> bool {
    DEFAULTS.evaluation.vs_previous
}

// Baseline
pub fn baseline_simulations() -> u32 {
    DEFAULTS.baseline.num_simulations
}
pub fn baseline_c_puct() -> f64 {
    DEFAULTS.baseline.c_puct
}
pub fn baseline_max_depth() -> u32 {
    DEFAULTS.baseline.max_depth
}
