//! Memoized leaf evaluation over a policy/value network.
//!
//! Entries are keyed by `(state, perspective)` and bounded by an LRU policy.
//! Any change to the network parameters must go through
//! [`EvaluationCache::update_network`] (or be followed by
//! [`EvaluationCache::clear`]) so no stale prediction survives a training step.

use std::num::NonZeroUsize;

use engine_core::{GameState, Player};
use lru::LruCache;
use tracing::{debug, warn};

use crate::evaluator::{uniform_priors, Evaluation, Evaluator, EvaluatorError, LeafEvaluator};

/// Default number of cached evaluations.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Mask `policy` to the legal actions and renormalize.
///
/// Returns `None` when the legal mass is zero or not finite, leaving
/// the fallback to the caller.
pub fn mask_and_normalize(policy: &[f32], legal: &[usize], action_count: usize) -> Option<Vec<f32>> {
    let mass: f32 = legal.iter().map(|&a| policy[a].max(0.0)).sum();
    if !mass.is_finite() || mass <= 0.0 {
        return None;
    }

    let mut priors = vec![0.0; action_count];
    for &action in legal {
        priors[action] = policy[action].max(0.0) / mass;
    }
    Some(priors)
}

/// Network value in [-1, 1] for the state's mover, as a win probability for
/// `perspective`.
#[inline]
fn win_probability(value: f32, mover: Player, perspective: Player) -> f32 {
    let p = ((value + 1.0) * 0.5).clamp(0.0, 1.0);
    if mover == perspective {
        p
    } else {
        1.0 - p
    }
}

/// LRU-bounded memo table in front of an [`Evaluator`].
pub struct EvaluationCache<S: GameState, E> {
    network: E,
    entries: LruCache<(S, Player), Evaluation>,
    hits: u64,
    misses: u64,
}

impl<S: GameState, E: Evaluator> EvaluationCache<S, E> {
    /// A zero capacity is bumped to one entry.
    pub fn new(network: E, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            network,
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn with_default_capacity(network: E) -> Self {
        Self::new(network, DEFAULT_CACHE_CAPACITY)
    }

    pub fn network(&self) -> &E {
        &self.network
    }

    /// Mutate the network, then drop every cached entry.
    pub fn update_network<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> R {
        let result = f(&mut self.network);
        self.clear();
        result
    }

    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "Evaluation cache cleared");
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    fn compute(&self, state: &S, perspective: Player) -> Result<Evaluation, EvaluatorError> {
        let input = state.encode();
        if input.len() != S::INPUT_SIZE {
            return Err(EvaluatorError::InvalidShape {
                expected: S::INPUT_SIZE,
                actual: input.len(),
            });
        }

        let output = self.network.evaluate(&input)?;
        if output.policy.len() != S::ACTION_COUNT {
            return Err(EvaluatorError::InvalidShape {
                expected: S::ACTION_COUNT,
                actual: output.policy.len(),
            });
        }
        if !output.value.is_finite() {
            return Err(EvaluatorError::EvaluationFailed(format!(
                "non-finite value {}",
                output.value
            )));
        }

        let legal = state.legal_actions();
        let priors = match mask_and_normalize(&output.policy, &legal, S::ACTION_COUNT) {
            Some(priors) => priors,
            None => {
                warn!(
                    legal = legal.len(),
                    "Policy has no mass on legal actions, falling back to uniform"
                );
                uniform_priors(&legal, S::ACTION_COUNT)
            }
        };

        Ok(Evaluation {
            value: win_probability(output.value, state.player(), perspective),
            priors,
        })
    }
}

impl<S: GameState, E: Evaluator> LeafEvaluator<S> for EvaluationCache<S, E> {
    fn evaluate(&mut self, state: &S, perspective: Player) -> Result<Evaluation, EvaluatorError> {
        let key = (state.clone(), perspective);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(hit.clone());
        }

        self.misses += 1;
        let evaluation = self.compute(state, perspective)?;
        self.entries.put(key, evaluation.clone());
        Ok(evaluation)
    }
}

impl<S: GameState, E: std::fmt::Debug> std::fmt::Debug for EvaluationCache<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationCache")
            .field("network", &self.network)
            .field("len", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
