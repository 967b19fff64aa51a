//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_env_id() -> String {
    defaults::env_id().into()
}
fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_weight() -> f64 {
    defaults::dirichlet_weight()
}
fn d_temperature() -> f64 {
    defaults::temperature()
}
fn d_temp_exploitation() -> f64 {
    defaults::temp_exploitation()
}
fn d_cache_capacity() -> usize {
    defaults::cache_capacity()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_games() -> usize {
    defaults::games_per_iteration()
}
fn d_batch_size() -> usize {
    defaults::batch_size()
}
fn d_lr() -> f64 {
    defaults::learning_rate()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_max_plies() -> usize {
    defaults::max_plies()
}
fn d_record_terminal() -> bool {
    defaults::record_terminal()
}
fn d_eval_games() -> usize {
    defaults::eval_games()
}
fn d_win_threshold() -> f64 {
    defaults::win_threshold()
}
fn d_vs_random() -> bool {
    defaults::vs_random()
}
fn d_vs_baseline() -> bool {
    defaults::vs_baseline()
}
fn d_vs_previous() -> bool {
    defaults::vs_previous()
}
fn d_baseline_sims() -> u32 {
    defaults::baseline_simulations()
}
fn d_baseline_c_puct() -> f64 {
    defaults::baseline_c_puct()
}
fn d_baseline_depth() -> u32 {
    defaults::baseline_max_depth()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// A setting that cannot be used as loaded.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{section}.{key} must be positive")]
    NotPositive {
        section: &'static str,
        key: &'static str,
    },

    #[error("{section}.{key} = {value} is out of range")]
    OutOfRange {
        section: &'static str,
        key: &'static str,
        value: f64,
    },
}

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub baseline: BaselineConfig,
}

impl CentralConfig {
    /// Reject counts that must be positive and fractions outside their range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("mcts", "num_simulations", self.mcts.num_simulations as usize),
            ("mcts", "cache_capacity", self.mcts.cache_capacity),
            ("training", "games_per_iteration", self.training.games_per_iteration),
            ("training", "batch_size", self.training.batch_size),
            ("training", "max_plies", self.training.max_plies),
            ("evaluation", "games", self.evaluation.games),
            ("baseline", "num_simulations", self.baseline.num_simulations as usize),
        ];
        for (section, key, value) in positive {
            if value == 0 {
                return Err(ConfigError::NotPositive { section, key });
            }
        }

        let ranged = [
            ("mcts", "dirichlet_weight", self.mcts.dirichlet_weight, 0.0, 1.0),
            ("evaluation", "win_threshold", self.evaluation.win_threshold, 0.0, 1.0),
            ("mcts", "temperature", self.mcts.temperature, 0.0, f64::MAX),
            ("mcts", "temp_exploitation", self.mcts.temp_exploitation, 0.0, f64::MAX),
        ];
        for (section, key, value, lo, hi) in ranged {
            if !(lo..=hi).contains(&value) {
                return Err(ConfigError::OutOfRange { section, key, value });
            }
        }

        let lr = self.training.learning_rate;
        if lr.is_nan() || lr <= 0.0 {
            return Err(ConfigError::NotPositive {
                section: "training",
                key: "learning_rate",
            });
        }
        Ok(())
    }
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_env_id")]
    pub env_id: String,
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            env_id: defaults::env_id().into(),
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    #[serde(default = "d_dirichlet_weight")]
    pub dirichlet_weight: f64,
    /// Self-play move temperature
    #[serde(default = "d_temperature")]
    pub temperature: f64,
    /// Arena move temperature
    #[serde(default = "d_temp_exploitation")]
    pub temp_exploitation: f64,
    #[serde(default = "d_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            c_puct: defaults::c_puct(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_weight: defaults::dirichlet_weight(),
            temperature: defaults::temperature(),
            temp_exploitation: defaults::temp_exploitation(),
            cache_capacity: defaults::cache_capacity(),
        }
    }
}

/// Self-play and learning configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrainingConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_games")]
    pub games_per_iteration: usize,
    #[serde(default = "d_batch_size")]
    pub batch_size: usize,
    #[serde(default = "d_lr")]
    pub learning_rate: f64,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_max_plies")]
    pub max_plies: usize,
    #[serde(default = "d_record_terminal")]
    pub record_terminal: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            games_per_iteration: defaults::games_per_iteration(),
            batch_size: defaults::batch_size(),
            learning_rate: defaults::learning_rate(),
            seed: defaults::seed(),
            max_plies: defaults::max_plies(),
            record_terminal: defaults::record_terminal(),
        }
    }
}

/// Arena evaluation configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluationConfig {
    #[serde(default = "d_eval_games")]
    pub games: usize,
    #[serde(default = "d_win_threshold")]
    pub win_threshold: f64,
    #[serde(default = "d_vs_random")]
    pub vs_random: bool,
    #[serde(default = "d_vs_baseline")]
    pub vs_baseline: bool,
    #[serde(default = "d_vs_previous")]
    pub vs_previous: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: defaults::eval_games(),
            win_threshold: defaults::win_threshold(),
            vs_random: defaults::vs_random(),
            vs_baseline: defaults::vs_baseline(),
            vs_previous: defaults::vs_previous(),
        }
    }
}

/// Shallow rollout search baseline
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BaselineConfig {
    #[serde(default = "d_baseline_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_baseline_c_puct")]
    pub c_puct: f64,
    /// Playout plies before a rollout is scored as a draw
    #[serde(default = "d_baseline_depth")]
    pub max_depth: u32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::baseline_simulations(),
            c_puct: defaults::baseline_c_puct(),
            max_depth: defaults::baseline_max_depth(),
        }
    }
}
