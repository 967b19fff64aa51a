//! Shared types for two-player board games.
//!
//! This module provides reusable observation types that eliminate code
//! duplication between similar board games like TicTacToe and Connect4.

use crate::state::Player;

/// Neural network observation for two-player board games.
///
/// Generic over board view size and number of actions to support different board sizes.
/// - `BOARD_VIEW_SIZE`: Total size of one-hot board encoding (board_size * 2 for two players)
/// - `NUM_ACTIONS`: Number of possible actions (board positions or columns)
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPlayerObs<const BOARD_VIEW_SIZE: usize, const NUM_ACTIONS: usize> {
    /// One-hot encoding of board: [player1_positions, player2_positions]
    pub board_view: [f32; BOARD_VIEW_SIZE],
    /// Legal moves mask (1.0 = legal, 0.0 = illegal)
    pub legal_moves: [f32; NUM_ACTIONS],
    /// Current player indicator: [is_player1, is_player2]
    pub current_player: [f32; 2],
}

impl<const BOARD_VIEW_SIZE: usize, const NUM_ACTIONS: usize>
    TwoPlayerObs<BOARD_VIEW_SIZE, NUM_ACTIONS>
{
    /// Create a new empty observation.
    pub fn new() -> Self {
        Self {
            board_view: [0.0; BOARD_VIEW_SIZE],
            legal_moves: [0.0; NUM_ACTIONS],
            current_player: [0.0; 2],
        }
    }

    /// Create observation from board state.
    ///
    /// - `board`: Slice of cell values (0=empty, 1=player1, 2=player2)
    /// - `legal_actions`: Legal action indices
    /// - `current_player`: Mover to act
    pub fn from_board(board: &[u8], legal_actions: &[usize], current_player: Player) -> Self {
        let mut obs = Self::new();
        let board_size = BOARD_VIEW_SIZE / 2;

        // Encode board state (one-hot for each player)
        for (i, &cell) in board.iter().enumerate().take(board_size) {
            match Player::from_cell(cell) {
                Some(Player::One) => obs.board_view[i] = 1.0,
                Some(Player::Two) => obs.board_view[i + board_size] = 1.0,
                None => {}
            }
        }

        for &action in legal_actions {
            if let Some(slot) = obs.legal_moves.get_mut(action) {
                *slot = 1.0;
            }
        }

        match current_player {
            Player::One => obs.current_player[0] = 1.0,
            Player::Two => obs.current_player[1] = 1.0,
        }

        obs
    }

    /// Flatten into the evaluator input layout: board view, legal moves, player.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(Self::obs_size());
        out.extend_from_slice(&self.board_view);
        out.extend_from_slice(&self.legal_moves);
        out.extend_from_slice(&self.current_player);
        out
    }

    /// Total observation size in floats.
    pub const fn obs_size() -> usize {
        BOARD_VIEW_SIZE + NUM_ACTIONS + 2
    }
}

impl<const BOARD_VIEW_SIZE: usize, const NUM_ACTIONS: usize> Default
    for TwoPlayerObs<BOARD_VIEW_SIZE, NUM_ACTIONS>
{
    fn default() -> Self {
        Self::new()
    }
}
