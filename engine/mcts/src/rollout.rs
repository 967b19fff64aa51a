//! Random-playout leaf evaluation.
//!
//! Backs the shallow search baseline: uniform priors, and a value taken from
//! one random game continued for at most `max_depth` plies.

use engine_core::{GameState, Player};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::evaluator::{uniform_priors, Evaluation, EvaluatorError, LeafEvaluator};

/// Value reported when a playout hits the depth cap before the game ends.
pub const CUTOFF_VALUE: f32 = 0.5;

/// Random rollout evaluator that plays random moves toward a terminal state.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    /// Maximum rollout depth to prevent long games
    pub max_depth: u32,
    rng: ChaCha20Rng,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

impl RolloutEvaluator {
    pub fn new(max_depth: u32, seed: u64) -> Self {
        Self {
            max_depth,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Play random moves from `state`; win probability for `perspective`.
    pub fn playout<S: GameState>(&mut self, state: &S, perspective: Player) -> f32 {
        let mut current = state.clone();
        for _ in 0..self.max_depth {
            if let Some(outcome) = current.winner() {
                return outcome.value_for(perspective);
            }
            let legal = current.legal_actions();
            match legal.choose(&mut self.rng) {
                Some(&action) => current = current.apply(action),
                None => break,
            }
        }
        current
            .winner()
            .map_or(CUTOFF_VALUE, |outcome| outcome.value_for(perspective))
    }
}

impl<S: GameState> LeafEvaluator<S> for RolloutEvaluator {
    fn evaluate(&mut self, state: &S, perspective: Player) -> Result<Evaluation, EvaluatorError> {
        let priors = uniform_priors(&state.legal_actions(), S::ACTION_COUNT);
        let value = self.playout(state, perspective);
        Ok(Evaluation { value, priors })
    }
}
