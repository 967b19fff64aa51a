//! Game state contract consumed by the tree search.
//!
//! Positions are immutable per ply: `apply` returns the successor instead of
//! mutating in place, so the search tree can keep one state per node and the
//! evaluation cache can key on states directly.

use std::fmt::Debug;
use std::hash::Hash;

use crate::game_utils::format_grid;

/// One of the two seats in a two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other seat.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Board cell value for this player (1 or 2, 0 is reserved for empty).
    #[inline]
    pub fn cell(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Inverse of [`Player::cell`].
    #[inline]
    pub fn from_cell(cell: u8) -> Option<Self> {
        match cell {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Nobody won (the draw sentinel).
    Draw,
    /// The given player won.
    Win(Player),
}

impl Outcome {
    /// Win probability of `player` under this outcome: 1 for a win, 0 for a
    /// loss, 0.5 for a draw.
    #[inline]
    pub fn value_for(self, player: Player) -> f32 {
        match self {
            Outcome::Draw => 0.5,
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => 0.0,
        }
    }
}

/// Position contract for games searched by MCTS.
///
/// `Default` yields the initial position. Equality and hashing must be
/// canonical: two states that compare equal are the same position with the
/// same mover, which is what the evaluation cache and tree reuse rely on.
pub trait GameState: Clone + Eq + Hash + Debug + Default + Send + Sync + 'static {
    /// Size of the full action space (legal or not).
    const ACTION_COUNT: usize;

    /// Length of the encoded input tensor.
    const INPUT_SIZE: usize;

    /// Shape used to render per-action vectors (rows, cols).
    const ACTION_SHAPE: (usize, usize);

    /// Legal actions in ascending order. Empty once the game is over.
    fn legal_actions(&self) -> Vec<usize>;

    /// Successor position after playing `action`.
    ///
    /// Callers only pass actions returned by [`GameState::legal_actions`].
    fn apply(&self, action: usize) -> Self;

    /// `None` while the game continues.
    fn winner(&self) -> Option<Outcome>;

    /// Mover to act. A won position keeps the winner here, since the
    /// winning move does not pass the turn.
    fn player(&self) -> Player;

    /// Fixed-size numeric encoding fed to the evaluator.
    fn encode(&self) -> Vec<f32>;

    /// 1.0 for legal actions, 0.0 otherwise, over the full action space.
    fn legal_mask(&self) -> Vec<f32> {
        let mut mask = vec![0.0; Self::ACTION_COUNT];
        for action in self.legal_actions() {
            mask[action] = 1.0;
        }
        mask
    }

    /// Whether the game is over.
    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Render a per-action vector in board shape (diagnostics only).
    fn eval_to_string(&self, values: &[f32]) -> String {
        let (rows, cols) = Self::ACTION_SHAPE;
        format_grid(values, rows, cols)
    }
}
