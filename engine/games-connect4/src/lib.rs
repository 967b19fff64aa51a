//! Connect 4 position for the self-play search
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_connect4::Connect4;
//!
//! let state = Connect4::default().apply(3);
//! assert_eq!(state.legal_actions().len(), 7);
//! ```

use engine_core::{GameState, Outcome, Player, TwoPlayerObs};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Observation layout: 84 one-hot cells + 7 legal columns + 2 player bits.
pub type Observation = TwoPlayerObs<84, 7>;

/// Connect4 game state
///
/// Represents the complete state of a Connect4 game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connect4 {
    /// Board representation: 0=empty, 1=Red (player 1), 2=Yellow (player 2)
    /// Stored in row-major order with row 0 at the bottom
    board: [u8; BOARD_SIZE],
    /// Mover to act (Red goes first)
    current_player: Player,
    /// Set once the game is over
    winner: Option<Outcome>,
    /// Height of each column (0-6 means number of pieces in column)
    column_heights: [u8; COLS],
}

impl Connect4 {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            current_player: Player::One,
            winner: None,
            column_heights: [0; COLS],
        }
    }

    /// Build a position by dropping pieces into the given columns in order.
    pub fn from_moves(columns: &[usize]) -> Self {
        columns
            .iter()
            .fold(Self::new(), |state, &col| state.drop_piece(col))
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner.is_some()
    }

    /// Cell value at (col, row): 0=empty, 1=Red, 2=Yellow
    pub fn cell(&self, col: usize, row: usize) -> u8 {
        self.board[Self::pos(col, row)]
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Drop a piece in the given column and return the new state
    pub fn drop_piece(&self, col: usize) -> Connect4 {
        // Check if move is valid
        if self.is_done() || col >= COLS || self.column_heights[col] >= ROWS as u8 {
            return self.clone(); // Invalid move, return unchanged state
        }

        let mut new_state = self.clone();
        let row = self.column_heights[col] as usize;

        // Place the piece
        new_state.board[Self::pos(col, row)] = self.current_player.cell();
        new_state.column_heights[col] += 1;

        new_state.winner = new_state.check_winner_at(col, row);

        // Switch player if game not over
        if new_state.winner.is_none() {
            new_state.current_player = self.current_player.opponent();
        }

        new_state
    }

    /// Check if the piece at (col, row) creates a winning line
    fn check_winner_at(&self, col: usize, row: usize) -> Option<Outcome> {
        let cell = self.board[Self::pos(col, row)];
        let player = Player::from_cell(cell)?;

        // Direction vectors: horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dc, dr) in directions {
            let count = 1
                + self.run_length(col, row, dc, dr, cell)
                + self.run_length(col, row, -dc, -dr, cell);
            if count >= 4 {
                return Some(Outcome::Win(player));
            }
        }

        // Board full but no winner
        if self.column_heights.iter().all(|&h| h >= ROWS as u8) {
            return Some(Outcome::Draw);
        }

        None
    }

    /// Number of consecutive `cell` pieces starting next to (col, row) along (dc, dr).
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, cell: u8) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        while c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32 {
            if self.board[Self::pos(c as usize, r as usize)] != cell {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }
}

impl Default for Connect4 {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Connect4 {
    const ACTION_COUNT: usize = COLS;
    const INPUT_SIZE: usize = Observation::obs_size();
    const ACTION_SHAPE: (usize, usize) = (1, COLS);

    fn legal_actions(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| self.column_heights[col] < ROWS as u8)
            .collect()
    }

    fn apply(&self, action: usize) -> Self {
        self.drop_piece(action)
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

impl std::fmt::Display for Connect4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..ROWS).rev() {
            let line: String = (0..COLS)
                .map(|col| match self.cell(col, row) {
                    1 => 'R',
                    2 => 'Y',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
