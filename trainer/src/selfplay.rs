//! Self-play driver: plays games with its own search tree, labels every
//! position with the final result and trains the network on the buffer.

use engine_core::{reward_for, GameState, Outcome};
use mcts::{
    mask_and_normalize, uniform_priors, Agent, EvaluationCache, Evaluator, EvaluatorError,
    MctsConfig, SearchError, SearchTree, Trainable, TrainingBatch,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::arena::{Arena, ArenaError, ArenaResult};
use crate::example::TrainingExample;

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("Number of games must be positive")]
    InvalidGameCount,

    #[error("Batch size must be positive")]
    InvalidBatchSize,

    #[error("Game did not finish within {0} plies")]
    GameTooLong(usize),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// Knobs for example generation and learning.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfPlayConfig {
    pub batch_size: usize,
    pub learning_rate: f32,
    /// Hard bound on the length of one game
    pub max_plies: usize,
    /// Append a zero-target anchor for the final position of every game
    pub record_terminal: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            learning_rate: 0.01,
            max_plies: 100,
            record_terminal: false,
        }
    }
}

/// Outcome of one `learn_from_examples` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainSummary {
    pub batches: usize,
    pub examples_used: usize,
    /// Anchors, unrewarded examples and the remainder that did not fill a batch
    pub examples_dropped: usize,
    /// `None` when no full batch was available
    pub mean_loss: Option<f32>,
}

type Search<S, E> = SearchTree<S, EvaluationCache<S, E>>;

pub struct SelfPlayDriver<S: GameState, E> {
    search: Search<S, E>,
    rng: ChaCha20Rng,
    config: SelfPlayConfig,
    examples: Vec<TrainingExample<S>>,
}

impl<S: GameState, E: Evaluator + Trainable> SelfPlayDriver<S, E> {
    pub fn new(search_config: MctsConfig, network: E, cache_capacity: usize, config: SelfPlayConfig, seed: u64) -> Self {
        let cache = EvaluationCache::new(network, cache_capacity);
        Self::from_search(
            SearchTree::new(search_config, cache).with_name("selfplay"),
            config,
            ChaCha20Rng::seed_from_u64(seed),
        )
    }

    pub fn from_search(search: Search<S, E>, config: SelfPlayConfig, rng: ChaCha20Rng) -> Self {
        Self {
            search,
            rng,
            config,
            examples: Vec::new(),
        }
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    pub fn search(&self) -> &Search<S, E> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut Search<S, E> {
        &mut self.search
    }

    pub fn network(&self) -> &E {
        self.search.evaluator().network()
    }

    /// Mutate the network; cached evaluations are dropped afterwards.
    pub fn update_network<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> R {
        self.search.evaluator_mut().update_network(f)
    }

    /// Examples accumulated since the last [`Self::take_examples`].
    pub fn examples(&self) -> &[TrainingExample<S>] {
        &self.examples
    }

    pub fn take_examples(&mut self) -> Vec<TrainingExample<S>> {
        std::mem::take(&mut self.examples)
    }

    /// Play `n_games` games and append their labeled positions to the buffer.
    ///
    /// Returns the number of examples added; the examples themselves are read
    /// with [`Self::examples`] or drained with [`Self::take_examples`]. If a
    /// game fails, the games completed before it stay in the buffer.
    pub fn generate_training_samples(&mut self, n_games: usize, temperature: f32) -> Result<usize, SelfPlayError> {
        if n_games == 0 {
            return Err(SelfPlayError::InvalidGameCount);
        }

        let before = self.examples.len();
        for game in 0..n_games {
            let (history, outcome) = self.play_game(temperature)?;
            info!(game, plies = history.len(), ?outcome, "Self-play game finished");
            self.examples.extend(history);
        }
        Ok(self.examples.len() - before)
    }

    /// Play one game from the initial position, reusing the tree between
    /// moves, and return its rewarded history.
    pub fn play_game(&mut self, temperature: f32) -> Result<(Vec<TrainingExample<S>>, Outcome), SelfPlayError> {
        self.search.drop_root();
        let mut state = S::default();
        let mut history = Vec::new();

        let outcome = loop {
            if let Some(outcome) = state.winner() {
                break outcome;
            }
            if history.len() >= self.config.max_plies {
                return Err(SelfPlayError::GameTooLong(self.config.max_plies));
            }

            let result = self.search.find_move(&state, temperature, &mut self.rng)?;
            let example = TrainingExample::from_search(
                state,
                &result,
                self.search.root_priors().to_vec(),
                self.search.child_win_rates(),
            );
            history.push(example);

            self.search.move_root(&result.state);
            state = result.state;
        };

        if self.config.record_terminal {
            history.push(TrainingExample::terminal_anchor(state));
        }
        assign_rewards(&mut history, outcome);
        Ok((history, outcome))
    }

    /// Train on `examples` in shuffled mini-batches.
    ///
    /// Anchors and unrewarded examples are skipped, and the remainder that
    /// does not fill a batch is dropped. With a `teacher`, its masked policy
    /// replaces the visit distribution as the policy target.
    pub fn learn_from_examples(
        &mut self,
        examples: &[TrainingExample<S>],
        teacher: Option<&dyn Evaluator>,
    ) -> Result<TrainSummary, SelfPlayError> {
        let batch_size = self.config.batch_size;
        if batch_size == 0 {
            return Err(SelfPlayError::InvalidBatchSize);
        }

        let mut usable: Vec<&TrainingExample<S>> = examples
            .iter()
            .filter(|e| !e.is_anchor() && e.reward.is_some())
            .collect();
        usable.shuffle(&mut self.rng);
        let batches = usable.len() / batch_size;
        let used = batches * batch_size;

        let learning_rate = self.config.learning_rate;
        let mut total_loss = 0.0f32;
        for chunk in usable[..used].chunks(batch_size) {
            let batch = build_batch(chunk, teacher)?;
            total_loss += self.update_network(|net| net.train(&batch, learning_rate))?;
        }

        let summary = TrainSummary {
            batches,
            examples_used: used,
            examples_dropped: examples.len() - used,
            mean_loss: (batches > 0).then(|| total_loss / batches as f32),
        };
        info!(
            batches,
            used,
            dropped = summary.examples_dropped,
            mean_loss = ?summary.mean_loss,
            "Learned from examples"
        );
        Ok(summary)
    }

    /// Arena run of this driver's search, with root noise off, against `other`.
    pub fn test<A: Agent<S> + ?Sized>(
        &mut self,
        other: &mut A,
        temperature: f32,
        num_tests: usize,
    ) -> Result<ArenaResult, ArenaError> {
        let train = self.search.config().train;
        self.search.set_training(false);
        let result = Arena::test::<S, _, _>(&mut self.search, other, temperature, num_tests, &mut self.rng);
        self.search.set_training(train);
        result
    }
}

/// Backfill rewards once the outcome is known: 0 for a draw, otherwise +1
/// for plies played by the winner and -1 for the loser's.
pub fn assign_rewards<S>(history: &mut [TrainingExample<S>], outcome: Outcome) {
    for example in history.iter_mut() {
        example.reward = Some(reward_for(outcome, example.player));
    }
}

fn build_batch<S: GameState>(
    examples: &[&TrainingExample<S>],
    teacher: Option<&dyn Evaluator>,
) -> Result<TrainingBatch, EvaluatorError> {
    let mut batch = TrainingBatch::default();
    for example in examples {
        let input = example.state.encode();
        let policy = match teacher {
            Some(teacher) => {
                let legal = example.state.legal_actions();
                let raw = teacher.evaluate(&input)?.policy;
                if raw.len() != S::ACTION_COUNT {
                    return Err(EvaluatorError::InvalidShape {
                        expected: S::ACTION_COUNT,
                        actual: raw.len(),
                    });
                }
                mask_and_normalize(&raw, &legal, S::ACTION_COUNT)
                    .unwrap_or_else(|| uniform_priors(&legal, S::ACTION_COUNT))
            }
            None => example.visit_probabilities.clone(),
        };

        batch.states.push(input);
        batch.rewards.push(example.reward.unwrap_or(0.0));
        batch.policies.push(policy);
    }
    debug!(rows = batch.len(), teacher = teacher.is_some(), "Training batch built");
    Ok(batch)
}
