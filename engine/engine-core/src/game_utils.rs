//! Shared utilities for two-player game implementations
//!
//! This module provides common functionality used across the games and the
//! self-play bookkeeping so reward and rendering rules live in one place.

use crate::state::{Outcome, Player};

/// Reward of a finished game from `player`'s perspective.
///
/// # Returns
/// * `1.0` if `player` won
/// * `-1.0` if `player` lost
/// * `0.0` for draws
///
/// # Example
/// ```
/// use engine_core::{reward_for, Outcome, Player};
///
/// assert_eq!(reward_for(Outcome::Win(Player::One), Player::One), 1.0);
/// assert_eq!(reward_for(Outcome::Win(Player::One), Player::Two), -1.0);
/// assert_eq!(reward_for(Outcome::Draw, Player::One), 0.0);
/// ```
#[inline]
pub fn reward_for(outcome: Outcome, player: Player) -> f32 {
    match outcome {
        Outcome::Draw => 0.0,
        Outcome::Win(winner) if winner == player => 1.0,
        Outcome::Win(_) => -1.0,
    }
}

/// Render a flat vector as a `rows x cols` grid, one bracketed row per line.
///
/// Values beyond `rows * cols` are ignored; missing values render as blanks.
///
/// # Example
/// ```
/// use engine_core::format_grid;
///
/// let s = format_grid(&[1.0, 0.0, 0.5, 0.25], 2, 2);
/// assert_eq!(s.lines().count(), 2);
/// ```
pub fn format_grid(values: &[f32], rows: usize, cols: usize) -> String {
    let mut out = String::new();
    for r in 0..rows {
        out.push('[');
        for c in 0..cols {
            match values.get(r * cols + c) {
                Some(v) => out.push_str(&format!("{:<6.2}", v)),
                None => out.push_str("      "),
            }
        }
        out.push_str("]\n");
    }
    out
}
