//! Head-to-head evaluation between two agents, and the gating rule applied
//! to its tally.

use std::fmt;

use engine_core::{GameState, Outcome, Player};
use mcts::{Agent, SearchError};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Number of trials must be positive")]
    InvalidTrialCount,

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

/// Tally from the first agent's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaResult {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl ArenaResult {
    pub fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    /// Wins minus losses.
    pub fn score(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    /// Count one finished game for the agent sitting at `seat`.
    pub fn record(&mut self, outcome: Outcome, seat: Player) {
        match outcome {
            Outcome::Draw => self.draws += 1,
            Outcome::Win(winner) if winner == seat => self.wins += 1,
            Outcome::Win(_) => self.losses += 1,
        }
    }
}

impl fmt::Display for ArenaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}W/{}D/{}L", self.wins, self.draws, self.losses)
    }
}

/// What to do with freshly trained parameters after an arena run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Clear improvement: save the parameters.
    Promote,
    /// Keep training without saving.
    Retain,
    /// Unanimous result: reload the previously saved parameters.
    Revert,
}

/// Gate on `wins - losses` against `win_threshold * trials`.
pub fn gate(result: &ArenaResult, win_threshold: f64) -> GateDecision {
    let total = result.total();
    let score = result.score();
    if total > 0 && score.unsigned_abs() as usize == total {
        GateDecision::Revert
    } else if score as f64 > win_threshold * total as f64 {
        GateDecision::Promote
    } else {
        GateDecision::Retain
    }
}

/// Plays full games between two agents.
pub struct Arena;

impl Arena {
    /// Play `num_tests` games between `agent` and `other`, choosing the first
    /// mover at random for each game. Both agents follow every ply through
    /// `move_root`.
    pub fn test<S, A, B>(
        agent: &mut A,
        other: &mut B,
        temperature: f32,
        num_tests: usize,
        rng: &mut ChaCha20Rng,
    ) -> Result<ArenaResult, ArenaError>
    where
        S: GameState,
        A: Agent<S> + ?Sized,
        B: Agent<S> + ?Sized,
    {
        if num_tests == 0 {
            return Err(ArenaError::InvalidTrialCount);
        }

        let mut tally = ArenaResult::default();
        for trial in 0..num_tests {
            let seat = if rng.gen_bool(0.5) {
                Player::One
            } else {
                Player::Two
            };
            agent.drop_root();
            other.drop_root();

            let mut state = S::default();
            let mut plies = 0usize;
            let outcome = loop {
                if let Some(outcome) = state.winner() {
                    break outcome;
                }
                let result = if state.player() == seat {
                    agent.find_move(&state, temperature, rng)?
                } else {
                    other.find_move(&state, temperature, rng)?
                };
                state = result.state;
                agent.move_root(&state);
                other.move_root(&state);
                plies += 1;
            };

            tally.record(outcome, seat);
            debug!(trial, ?seat, ?outcome, plies, "Arena game finished");
        }

        info!(
            agent = agent.name(),
            other = other.name(),
            wins = tally.wins,
            draws = tally.draws,
            losses = tally.losses,
            "Arena finished"
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_connect4::Connect4;
    use games_tictactoe::TicTacToe;
    use mcts::{EvaluationCache, MctsConfig, RandomAgent, SearchTree, UniformEvaluator};
    use rand::SeedableRng;

    fn result(wins: usize, draws: usize, losses: usize) -> ArenaResult {
        ArenaResult { wins, draws, losses }
    }

    #[test]
    fn test_record_by_seat() {
        let mut tally = ArenaResult::default();
        tally.record(Outcome::Win(Player::Two), Player::Two);
        tally.record(Outcome::Win(Player::One), Player::Two);
        tally.record(Outcome::Draw, Player::One);
        assert_eq!(tally, result(1, 1, 1));
        assert_eq!(tally.to_string(), "1W/1D/1L");
    }

    #[test]
    fn test_gate_decisions() {
        assert_eq!(gate(&result(10, 0, 0), 0.05), GateDecision::Revert);
        assert_eq!(gate(&result(0, 0, 10), 0.05), GateDecision::Revert);
        assert_eq!(gate(&result(6, 2, 2), 0.05), GateDecision::Promote);
        assert_eq!(gate(&result(3, 4, 3), 0.05), GateDecision::Retain);
        assert_eq!(gate(&result(2, 6, 2), 0.05), GateDecision::Retain);
        // score 1 of 20 trials is not above 0.05 * 20
        assert_eq!(gate(&result(5, 11, 4), 0.05), GateDecision::Retain);
        assert_eq!(gate(&result(0, 0, 0), 0.05), GateDecision::Retain);
    }

    #[test]
    fn test_tally_conservation_random_vs_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut a = RandomAgent::new();
        let mut b = RandomAgent::new();
        let tally = Arena::test::<TicTacToe, _, _>(&mut a, &mut b, 1.0, 25, &mut rng).unwrap();
        assert_eq!(tally.total(), 25);
    }

    #[test]
    fn test_search_beats_random_connect4() {
        let cache = EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<Connect4>());
        let mut search = SearchTree::new(MctsConfig::for_evaluation().with_simulations(200), cache);
        let mut random = RandomAgent::new();
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        let tally = Arena::test::<Connect4, _, _>(&mut search, &mut random, 0.0, 6, &mut rng).unwrap();
        assert_eq!(tally.total(), 6);
        assert!(tally.wins > tally.losses, "tally {}", tally);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut a = RandomAgent::new();
        let mut b = RandomAgent::new();
        let err = Arena::test::<TicTacToe, _, _>(&mut a, &mut b, 1.0, 0, &mut rng).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidTrialCount));
    }
}
