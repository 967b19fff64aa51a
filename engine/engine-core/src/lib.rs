//! Core traits and types shared by the search engine and the games
//!
//! This crate provides the fundamental abstractions the tree search consumes:
//! - `GameState`: immutable-per-ply position contract (legal actions, outcome,
//!   encoded tensor, mover to act)
//! - `Player` / `Outcome`: two-player identities and the terminal result
//! - `TwoPlayerObs`: shared one-hot board encoding for board games
//! - `game_utils`: reward assignment and grid rendering helpers

pub mod board_game;
pub mod game_utils;
pub mod state;

// Re-export main types for convenience
pub use board_game::TwoPlayerObs;
pub use game_utils::{format_grid, reward_for};
pub use state::{GameState, Outcome, Player};
