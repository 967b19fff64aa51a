//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared by
//! the trainer binary and its library.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Command-line flags (applied by the trainer)
//! 2. Environment variables (`SELFPLAY_<SECTION>_<KEY>`)
//! 3. config.toml file
//! 4. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! SELFPLAY_<SECTION>_<KEY>=value
//!
//! Examples:
//!     SELFPLAY_COMMON_ENV_ID=connect4
//!     SELFPLAY_MCTS_NUM_SIMULATIONS=400
//!     SELFPLAY_TRAINING_ITERATIONS=50
//!     SELFPLAY_EVALUATION_VS_BASELINE=false
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
