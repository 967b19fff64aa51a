//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by SELFPLAY_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("SELFPLAY_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from SELFPLAY_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "SELFPLAY_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: SELFPLAY_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.env_id, "SELFPLAY_COMMON_ENV_ID");
    env_override!(config, common.data_dir, "SELFPLAY_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "SELFPLAY_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.num_simulations,
        "SELFPLAY_MCTS_NUM_SIMULATIONS",
        parse
    );
    env_override!(config, mcts.c_puct, "SELFPLAY_MCTS_C_PUCT", parse);
    env_override!(
        config,
        mcts.dirichlet_alpha,
        "SELFPLAY_MCTS_DIRICHLET_ALPHA",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_weight,
        "SELFPLAY_MCTS_DIRICHLET_WEIGHT",
        parse
    );
    env_override!(
        config,
        mcts.temperature,
        "SELFPLAY_MCTS_TEMPERATURE",
        parse
    );
    env_override!(
        config,
        mcts.temp_exploitation,
        "SELFPLAY_MCTS_TEMP_EXPLOITATION",
        parse
    );
    env_override!(
        config,
        mcts.cache_capacity,
        "SELFPLAY_MCTS_CACHE_CAPACITY",
        parse
    );

    // Training
    env_override!(
        config,
        training.iterations,
        "SELFPLAY_TRAINING_ITERATIONS",
        parse
    );
    env_override!(
        config,
        training.games_per_iteration,
        "SELFPLAY_TRAINING_GAMES_PER_ITERATION",
        parse
    );
    env_override!(
        config,
        training.batch_size,
        "SELFPLAY_TRAINING_BATCH_SIZE",
        parse
    );
    env_override!(
        config,
        training.learning_rate,
        "SELFPLAY_TRAINING_LEARNING_RATE",
        parse
    );
    env_override!(config, training.seed, "SELFPLAY_TRAINING_SEED", parse);
    env_override!(
        config,
        training.max_plies,
        "SELFPLAY_TRAINING_MAX_PLIES",
        parse
    );
    env_override!(
        config,
        training.record_terminal,
        "SELFPLAY_TRAINING_RECORD_TERMINAL",
        parse
    );

    // Evaluation
    env_override!(
        config,
        evaluation.games,
        "SELFPLAY_EVALUATION_GAMES",
        parse
    );
    env_override!(
        config,
        evaluation.win_threshold,
        "SELFPLAY_EVALUATION_WIN_THRESHOLD",
        parse
    );
    env_override!(
        config,
        evaluation.vs_random,
        "SELFPLAY_EVALUATION_VS_RANDOM",
        parse
    );
    env_override!(
        config,
        evaluation.vs_baseline,
        "SELFPLAY_EVALUATION_VS_BASELINE",
        parse
    );
    env_override!(
        config,
        evaluation.vs_previous,
        "SELFPLAY_EVALUATION_VS_PREVIOUS",
        parse
    );

    // Baseline
    env_override!(
        config,
        baseline.num_simulations,
        "SELFPLAY_BASELINE_NUM_SIMULATIONS",
        parse
    );
    env_override!(config, baseline.c_puct, "SELFPLAY_BASELINE_C_PUCT", parse);
    env_override!(
        config,
        baseline.max_depth,
        "SELFPLAY_BASELINE_MAX_DEPTH",
        parse
    );

    config
}
