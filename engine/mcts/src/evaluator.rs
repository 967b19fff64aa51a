//! Evaluator traits for position evaluation.
//!
//! Two seams live here. [`Evaluator`] is the network contract: encoded
//! input in, raw policy and value out. [`LeafEvaluator`] is what the search
//! consumes: a state and a perspective in, a win probability and normalized
//! priors out. The evaluation cache adapts the first to the second.

use std::path::Path;

use engine_core::{GameState, Player};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    InvalidShape { expected: usize, actual: usize },

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw network output for one encoded state.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Policy over the full action space, illegal actions included.
    /// Index i corresponds to action i.
    pub policy: Vec<f32>,

    /// Value estimate for the mover of the encoded state.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// Trait for policy/value networks.
///
/// Implementations could be:
/// - UniformEvaluator: Returns uniform policy (for testing)
/// - A trained model (see the trainer crate's linear network)
pub trait Evaluator: Send + Sync {
    /// Evaluate a single encoded state.
    ///
    /// # Arguments
    /// * `input` - Encoded state, `GameState::INPUT_SIZE` floats
    ///
    /// # Returns
    /// Policy distribution and value estimate
    fn evaluate(&self, input: &[f32]) -> Result<EvalResult, EvaluatorError>;
}

/// Stacked training rows, one per example.
#[derive(Debug, Clone, Default)]
pub struct TrainingBatch {
    /// Encoded states
    pub states: Vec<Vec<f32>>,
    /// Final game reward for the mover of each state, in {-1, 0, 1}
    pub rewards: Vec<f32>,
    /// Policy targets over the full action space
    pub policies: Vec<Vec<f32>>,
}

impl TrainingBatch {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A network whose parameters can be updated and persisted.
pub trait Trainable {
    /// One optimization step over the batch. Returns the mean loss.
    fn train(&mut self, batch: &TrainingBatch, learning_rate: f32) -> Result<f32, EvaluatorError>;

    fn save_model(&self, path: &Path) -> Result<(), EvaluatorError>;

    fn load_model(&mut self, path: &Path) -> Result<(), EvaluatorError>;
}

/// Evaluation consumed by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Win probability of the requested perspective, in [0, 1].
    pub value: f32,

    /// Priors over the full action space, zero on illegal actions and
    /// summing to 1 over the legal ones.
    pub priors: Vec<f32>,
}

/// Leaf evaluation seam used by the tree search.
pub trait LeafEvaluator<S: GameState> {
    fn evaluate(&mut self, state: &S, perspective: Player) -> Result<Evaluation, EvaluatorError>;
}

/// Uniform priors over the legal actions, zero-padded to `action_count`.
pub fn uniform_priors(legal: &[usize], action_count: usize) -> Vec<f32> {
    let mut priors = vec![0.0; action_count];
    if legal.is_empty() {
        return priors;
    }
    let prob = 1.0 / legal.len() as f32;
    for &action in legal {
        priors[action] = prob;
    }
    priors
}

/// Uniform evaluator that assigns equal probability to every action.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone)]
pub struct UniformEvaluator {
    num_actions: usize,
}

impl UniformEvaluator {
    pub fn new(num_actions: usize) -> Self {
        Self { num_actions }
    }

    /// Sized for the action space of `S`.
    pub fn for_game<S: GameState>() -> Self {
        Self::new(S::ACTION_COUNT)
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _input: &[f32]) -> Result<EvalResult, EvaluatorError> {
        if self.num_actions == 0 {
            return Ok(EvalResult {
                policy: Vec::new(),
                value: 0.0,
            });
        }
        let prob = 1.0 / self.num_actions as f32;
        Ok(EvalResult {
            policy: vec![prob; self.num_actions],
            value: 0.0,
        })
    }
}
