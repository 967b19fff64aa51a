//! TicTacToe position for the self-play search
//!
//! This crate provides a complete reference implementation of TicTacToe
//! demonstrating how to implement the `GameState` contract.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_tictactoe::TicTacToe;
//!
//! let state = TicTacToe::default();
//! assert_eq!(state.legal_actions().len(), 9);
//! let next = state.apply(4);
//! assert_eq!(next.legal_actions().len(), 8);
//! ```

use engine_core::{GameState, Outcome, Player, TwoPlayerObs};

/// Observation layout: 18 one-hot cells + 9 legal moves + 2 player bits.
pub type Observation = TwoPlayerObs<18, 9>;

/// Winning lines (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicTacToe {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; 9],
    /// Mover to act (X moves first)
    current_player: Player,
    /// Set once the game is over
    winner: Option<Outcome>,
}

impl TicTacToe {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; 9],
            current_player: Player::One,
            winner: None,
        }
    }

    /// Build a position from a sequence of moves played from the empty board.
    ///
    /// Illegal moves in the sequence are ignored.
    pub fn from_moves(moves: &[usize]) -> Self {
        moves
            .iter()
            .fold(Self::new(), |state, &pos| state.make_move(pos))
    }

    /// Board cells (0=empty, 1=X, 2=O)
    pub fn board(&self) -> &[u8; 9] {
        &self.board
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner.is_some()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, position: usize) -> TicTacToe {
        if self.is_done() || position >= 9 || self.board[position] != 0 {
            return *self; // Invalid move, return unchanged state
        }

        let mut new_state = *self;
        new_state.board[position] = self.current_player.cell();
        new_state.winner = Self::check_winner(&new_state.board);

        // Switch player if game not over
        if new_state.winner.is_none() {
            new_state.current_player = self.current_player.opponent();
        }

        new_state
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; 9]) -> Option<Outcome> {
        for &[a, b, c] in &LINES {
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                return Player::from_cell(board[a]).map(Outcome::Win);
            }
        }

        // Board full but no winner
        if board.iter().all(|&cell| cell != 0) {
            return Some(Outcome::Draw);
        }

        None
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    const ACTION_COUNT: usize = 9;
    const INPUT_SIZE: usize = Observation::obs_size();
    const ACTION_SHAPE: (usize, usize) = (3, 3);

    fn legal_actions(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..9).filter(|&pos| self.board[pos] == 0).collect()
    }

    fn apply(&self, action: usize) -> Self {
        self.make_move(action)
    }

    fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    fn player(&self) -> Player {
        self.current_player
    }

    fn encode(&self) -> Vec<f32> {
        Observation::from_board(&self.board, &self.legal_actions(), self.current_player).to_vec()
    }
}

impl std::fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.board.chunks(3) {
            let line: String = row
                .iter()
                .map(|&cell| match cell {
                    1 => 'X',
                    2 => 'O',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
