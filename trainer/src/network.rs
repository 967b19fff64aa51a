//! Linear policy/value network.
//!
//! A softmax policy head and a tanh value head over the encoded state,
//! trained by plain mini-batch SGD. Parameters start at zero, so a fresh
//! network predicts a uniform policy and a neutral value.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use engine_core::GameState;
use mcts::{EvalResult, Evaluator, EvaluatorError, Trainable, TrainingBatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearNetwork {
    input_size: usize,
    num_actions: usize,
    /// Row-major `num_actions x input_size`
    policy_weights: Vec<f32>,
    policy_bias: Vec<f32>,
    value_weights: Vec<f32>,
    value_bias: f32,
}

impl LinearNetwork {
    pub fn new(input_size: usize, num_actions: usize) -> Self {
        Self {
            input_size,
            num_actions,
            policy_weights: vec![0.0; num_actions * input_size],
            policy_bias: vec![0.0; num_actions],
            value_weights: vec![0.0; input_size],
            value_bias: 0.0,
        }
    }

    /// Network sized for `S`'s encoding and action space.
    pub fn for_game<S: GameState>() -> Self {
        Self::new(S::INPUT_SIZE, S::ACTION_COUNT)
    }

    /// Read a network saved with [`Trainable::save_model`].
    pub fn load(path: &Path) -> Result<Self, EvaluatorError> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| EvaluatorError::ModelError(e.to_string()))
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn check_input(&self, input: &[f32]) -> Result<(), EvaluatorError> {
        if input.len() != self.input_size {
            return Err(EvaluatorError::InvalidShape {
                expected: self.input_size,
                actual: input.len(),
            });
        }
        Ok(())
    }

    fn policy_logits(&self, input: &[f32]) -> Vec<f32> {
        self.policy_weights
            .chunks(self.input_size)
            .zip(&self.policy_bias)
            .map(|(row, bias)| dot(row, input) + bias)
            .collect()
    }

    fn value_pre_activation(&self, input: &[f32]) -> f32 {
        dot(&self.value_weights, input) + self.value_bias
    }
}

impl Evaluator for LinearNetwork {
    fn evaluate(&self, input: &[f32]) -> Result<EvalResult, EvaluatorError> {
        self.check_input(input)?;
        Ok(EvalResult {
            policy: softmax(&self.policy_logits(input)),
            value: self.value_pre_activation(input).tanh(),
        })
    }
}

impl Trainable for LinearNetwork {
    /// One SGD step on the batch mean of policy cross-entropy plus squared
    /// value error. Returns the loss before the step.
    fn train(&mut self, batch: &TrainingBatch, learning_rate: f32) -> Result<f32, EvaluatorError> {
        if batch.is_empty() {
            return Err(EvaluatorError::EvaluationFailed("empty training batch".into()));
        }
        if batch.rewards.len() != batch.len() {
            return Err(EvaluatorError::InvalidShape {
                expected: batch.len(),
                actual: batch.rewards.len(),
            });
        }
        if batch.policies.len() != batch.len() {
            return Err(EvaluatorError::InvalidShape {
                expected: batch.len(),
                actual: batch.policies.len(),
            });
        }

        let n = self.input_size;
        let mut grad_pw = vec![0.0f32; self.policy_weights.len()];
        let mut grad_pb = vec![0.0f32; self.num_actions];
        let mut grad_vw = vec![0.0f32; n];
        let mut grad_vb = 0.0f32;
        let mut loss = 0.0f32;

        for ((input, &reward), target) in batch.states.iter().zip(&batch.rewards).zip(&batch.policies) {
            self.check_input(input)?;
            if target.len() != self.num_actions {
                return Err(EvaluatorError::InvalidShape {
                    expected: self.num_actions,
                    actual: target.len(),
                });
            }

            let probs = softmax(&self.policy_logits(input));
            let target_mass: f32 = target.iter().sum();
            for (a, (&p, &t)) in probs.iter().zip(target).enumerate() {
                loss -= t * p.max(f32::MIN_POSITIVE).ln();
                let g = p * target_mass - t;
                grad_pb[a] += g;
                for (gw, &x) in grad_pw[a * n..(a + 1) * n].iter_mut().zip(input) {
                    *gw += g * x;
                }
            }

            let value = self.value_pre_activation(input).tanh();
            let err = value - reward;
            loss += err * err;
            let g = 2.0 * err * (1.0 - value * value);
            grad_vb += g;
            for (gw, &x) in grad_vw.iter_mut().zip(input) {
                *gw += g * x;
            }
        }

        let scale = learning_rate / batch.len() as f32;
        for (w, g) in self.policy_weights.iter_mut().zip(&grad_pw) {
            *w -= scale * g;
        }
        for (b, g) in self.policy_bias.iter_mut().zip(&grad_pb) {
            *b -= scale * g;
        }
        for (w, g) in self.value_weights.iter_mut().zip(&grad_vw) {
            *w -= scale * g;
        }
        self.value_bias -= scale * grad_vb;

        let loss = loss / batch.len() as f32;
        debug!(loss, rows = batch.len(), "Linear network step");
        Ok(loss)
    }

    fn save_model(&self, path: &Path) -> Result<(), EvaluatorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self).map_err(|e| EvaluatorError::ModelError(e.to_string()))?;
        writer.flush()?;
        debug!(path = %path.display(), "Linear network saved");
        Ok(())
    }

    fn load_model(&mut self, path: &Path) -> Result<(), EvaluatorError> {
        let loaded = Self::load(path)?;
        if loaded.input_size != self.input_size || loaded.num_actions != self.num_actions {
            return Err(EvaluatorError::ModelError(format!(
                "{} holds a {}x{} network, expected {}x{}",
                path.display(),
                loaded.input_size,
                loaded.num_actions,
                self.input_size,
                self.num_actions
            )));
        }
        *self = loaded;
        Ok(())
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::TicTacToe;

    fn single_row_batch(state: &TicTacToe, reward: f32, best: usize) -> TrainingBatch {
        let mut policy = vec![0.0; 9];
        policy[best] = 1.0;
        TrainingBatch {
            states: vec![state.encode()],
            rewards: vec![reward],
            policies: vec![policy],
        }
    }

    #[test]
    fn test_fresh_network_is_uniform() {
        let net = LinearNetwork::for_game::<TicTacToe>();
        let out = net.evaluate(&TicTacToe::new().encode()).unwrap();
        assert_eq!(out.value, 0.0);
        for p in out.policy {
            assert!((p - 1.0 / 9.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wrong_input_length() {
        let net = LinearNetwork::for_game::<TicTacToe>();
        let err = net.evaluate(&[0.0; 5]).unwrap_err();
        assert!(matches!(err, EvaluatorError::InvalidShape { actual: 5, .. }));
    }

    #[test]
    fn test_training_moves_towards_targets() {
        let state = TicTacToe::new();
        let mut net = LinearNetwork::for_game::<TicTacToe>();
        let batch = single_row_batch(&state, 1.0, 4);

        let first = net.train(&batch, 0.1).unwrap();
        let mut last = first;
        for _ in 0..50 {
            last = net.train(&batch, 0.1).unwrap();
        }
        assert!(last < first, "loss {} -> {}", first, last);

        let out = net.evaluate(&state.encode()).unwrap();
        assert!(out.value > 0.0);
        let best = out
            .policy
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(best, 4);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut net = LinearNetwork::for_game::<TicTacToe>();
        assert!(net.train(&TrainingBatch::default(), 0.1).is_err());
    }

    #[test]
    fn test_bad_policy_row_rejected() {
        let mut net = LinearNetwork::for_game::<TicTacToe>();
        let mut batch = single_row_batch(&TicTacToe::new(), 0.0, 0);
        batch.policies[0].pop();
        let err = net.train(&batch, 0.1).unwrap_err();
        assert!(matches!(err, EvaluatorError::InvalidShape { expected: 9, actual: 8 }));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("tictactoe.json");

        let mut net = LinearNetwork::for_game::<TicTacToe>();
        net.train(&single_row_batch(&TicTacToe::new(), -1.0, 2), 0.5).unwrap();
        net.save_model(&path).unwrap();

        let mut restored = LinearNetwork::for_game::<TicTacToe>();
        restored.load_model(&path).unwrap();
        assert_eq!(restored, net);
        assert_eq!(LinearNetwork::load(&path).unwrap(), net);
    }

    #[test]
    fn test_load_rejects_other_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        LinearNetwork::new(10, 3).save_model(&path).unwrap();

        let mut net = LinearNetwork::for_game::<TicTacToe>();
        assert!(matches!(net.load_model(&path), Err(EvaluatorError::ModelError(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinearNetwork::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, EvaluatorError::Io(_)));
    }
}
