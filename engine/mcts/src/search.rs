//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse tree using PUCT to find a leaf
//! 2. Expansion: Add children to the leaf using the evaluator's priors
//! 3. Evaluation: Leaf value from the same evaluator call, or the exact
//!    outcome at a terminal node
//! 4. Backpropagation: Update statistics along the path
//!
//! [`SearchTree`] keeps its tree between calls so the subtree under the
//! realized move can be reused through [`SearchTree::move_root`].

use std::time::Instant;

use engine_core::GameState;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluation, EvaluatorError, LeafEvaluator};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot search from a terminal state")]
    TerminalState,

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid temperature: {0}")]
    InvalidTemperature(f32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// Counters collected during one `find_move` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Number of simulations performed
    pub simulations: u32,
    /// Leaf expansions (each one evaluator call)
    pub expansions: u32,
    /// Simulations that stopped at a terminal node
    pub terminal_hits: u32,
    /// Nodes in the tree after the search
    pub node_count: usize,
    /// Deepest selection path, in plies below the root
    pub max_depth: u32,
    pub elapsed_us: u64,
}

/// Result of one move search.
#[derive(Debug, Clone)]
pub struct MoveResult<S> {
    /// State after playing `action`
    pub state: S,

    /// Sampled action
    pub action: usize,

    /// Root mean value: win probability of the player who moved into the
    /// searched position.
    pub root_value: f32,

    /// Temperature-scaled visit distribution over the full action space
    pub visit_probabilities: Vec<f32>,

    pub stats: SearchStats,
}

/// Stateful PUCT search over positions of `S`.
pub struct SearchTree<S: GameState, L> {
    name: String,
    config: MctsConfig,
    evaluator: L,
    tree: Option<MctsTree<S>>,
    /// Evaluator priors at the root before noise, over the full action space
    root_priors: Vec<f32>,
    /// Noise already mixed into the current root's children
    root_noised: bool,
}

impl<S: GameState, L: LeafEvaluator<S>> SearchTree<S, L> {
    pub fn new(config: MctsConfig, evaluator: L) -> Self {
        Self {
            name: "mcts".to_string(),
            config,
            evaluator,
            tree: None,
            root_priors: Vec::new(),
            root_noised: false,
        }
    }

    /// Builder pattern: set the name reported in arena logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Switch root noise on or off. Turning it off restores the raw priors
    /// of an already-noised root.
    pub fn set_training(&mut self, train: bool) {
        if !train && self.root_noised {
            if let Some(tree) = self.tree.as_mut() {
                let children = tree.root_node().children.clone();
                for (action, id) in children {
                    tree.get_mut(id).prior = self.root_priors[action];
                }
            }
            self.root_noised = false;
        }
        self.config.train = train;
    }

    pub fn evaluator(&self) -> &L {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut L {
        &mut self.evaluator
    }

    /// Current tree, if any search or re-rooting has happened since the
    /// last drop.
    pub fn tree(&self) -> Option<&MctsTree<S>> {
        self.tree.as_ref()
    }

    /// Raw evaluator priors at the current root (empty until expanded).
    pub fn root_priors(&self) -> &[f32] {
        &self.root_priors
    }

    /// Mean value of each root child, `None` for unvisited or illegal actions.
    pub fn child_win_rates(&self) -> Vec<Option<f32>> {
        match &self.tree {
            Some(tree) => tree.child_win_rates(S::ACTION_COUNT),
            None => vec![None; S::ACTION_COUNT],
        }
    }

    /// Discard the whole tree. The next search starts from a fresh root.
    pub fn drop_root(&mut self) {
        self.tree = None;
        self.root_priors.clear();
        self.root_noised = false;
    }

    /// Re-root on the child whose state equals `state`, keeping its
    /// statistics and discarding every sibling subtree. Falls back to a
    /// fresh root when no such child exists.
    pub fn move_root(&mut self, state: &S) {
        if self.tree.as_ref().is_some_and(|t| t.root_node().state == *state) {
            return;
        }

        let next = match self.tree.take() {
            Some(tree) => match tree.reroot(state) {
                Some(reused) => {
                    debug!(
                        kept = reused.len(),
                        discarded = tree.len() - reused.len(),
                        visits = reused.root_node().visit_count,
                        "Tree reused"
                    );
                    reused
                }
                None => MctsTree::new(state.clone()),
            },
            None => MctsTree::new(state.clone()),
        };

        self.root_priors.clear();
        let root = next.root_node();
        if root.is_expanded() {
            self.root_priors = vec![0.0; S::ACTION_COUNT];
            for &(action, id) in &root.children {
                self.root_priors[action] = next.get(id).prior;
            }
        }
        self.root_noised = false;
        self.tree = Some(next);
    }

    /// Run the configured number of simulations from `state` and sample a move.
    ///
    /// A failed search discards the tree.
    pub fn find_move(
        &mut self,
        state: &S,
        temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<MoveResult<S>, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }
        if state.legal_actions().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SearchError::InvalidTemperature(temperature));
        }
        self.config.validate().map_err(SearchError::InvalidConfig)?;

        let start = Instant::now();
        let mut stats = SearchStats::default();

        let mut tree = match self.tree.take() {
            Some(tree) if tree.root_node().state == *state => tree,
            _ => {
                self.root_priors.clear();
                self.root_noised = false;
                MctsTree::new(state.clone())
            }
        };

        // Root expansion is not a visit; its value is discarded
        if !tree.root_node().is_expanded() {
            let root = tree.root();
            let eval = self.expand(&mut tree, root)?;
            stats.expansions += 1;
            self.root_priors = eval.priors;
        }

        if self.config.train && !self.root_noised {
            self.add_dirichlet_noise(&mut tree, rng)?;
            self.root_noised = true;
        }

        for _ in 0..self.config.num_simulations {
            self.simulate(&mut tree, &mut stats)?;
        }
        stats.simulations = self.config.num_simulations;

        let visit_probabilities = tree.root_policy(S::ACTION_COUNT, temperature);
        let action = sample_action(&visit_probabilities, rng)?;
        let root_value = tree.root_node().mean_value();

        stats.node_count = tree.len();
        stats.elapsed_us = start.elapsed().as_micros() as u64;
        self.tree = Some(tree);

        debug!(
            action,
            root_value,
            simulations = stats.simulations,
            expansions = stats.expansions,
            nodes = stats.node_count,
            elapsed_us = stats.elapsed_us,
            "MCTS move selected"
        );

        Ok(MoveResult {
            state: state.apply(action),
            action,
            root_value,
            visit_probabilities,
            stats,
        })
    }

    /// Run a single simulation (select -> expand -> evaluate -> backpropagate).
    fn simulate(&mut self, tree: &mut MctsTree<S>, stats: &mut SearchStats) -> Result<(), SearchError> {
        // Selection: traverse to a leaf
        let mut current = tree.root();
        let mut depth = 0u32;
        while !tree.get(current).is_leaf() {
            match tree.select_child(current, self.config.c_puct) {
                Some(child_id) => {
                    current = child_id;
                    depth += 1;
                }
                None => break,
            }
        }
        stats.max_depth = stats.max_depth.max(depth);

        let leaf = tree.get(current);
        let (value, perspective) = if leaf.is_terminal {
            stats.terminal_hits += 1;
            (leaf.terminal_value, leaf.perspective)
        } else {
            let mover = leaf.state.player();
            let eval = self.expand(tree, current)?;
            stats.expansions += 1;
            (eval.value, mover)
        };

        // Backpropagation
        tree.backpropagate(current, value, perspective);

        trace!(leaf = current.0, depth, value, "MCTS simulation complete");

        Ok(())
    }

    /// Add one child per legal action, priors from a single evaluator call
    /// made from the perspective of the node's mover.
    fn expand(&mut self, tree: &mut MctsTree<S>, node_id: NodeId) -> Result<Evaluation, SearchError> {
        let state = tree.get(node_id).state.clone();
        let eval = self.evaluator.evaluate(&state, state.player())?;
        if eval.priors.len() != S::ACTION_COUNT {
            return Err(EvaluatorError::InvalidShape {
                expected: S::ACTION_COUNT,
                actual: eval.priors.len(),
            }
            .into());
        }

        for action in state.legal_actions() {
            tree.add_child(node_id, action, eval.priors[action], state.apply(action));
        }

        Ok(eval)
    }

    /// Mix Dirichlet noise into the root children's priors:
    /// P = (1 - eps) * P_raw + eps * noise.
    fn add_dirichlet_noise(&self, tree: &mut MctsTree<S>, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let eps = self.config.dirichlet_epsilon;
        let children = tree.root_node().children.clone();
        if eps <= 0.0 || children.is_empty() {
            return Ok(());
        }

        let noise = dirichlet_noise(children.len(), self.config.dirichlet_alpha, rng)?;
        for ((action, child_id), eta) in children.into_iter().zip(noise) {
            tree.get_mut(child_id).prior = (1.0 - eps) * self.root_priors[action] + eps * eta;
        }
        Ok(())
    }
}

/// Sample an action from a probability distribution.
pub fn sample_action(policy: &[f32], rng: &mut ChaCha20Rng) -> Result<usize, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i);
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    for (i, &p) in policy.iter().enumerate().rev() {
        if p > 0.0 {
            return Ok(i);
        }
    }

    Err(SearchError::NoLegalMoves)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
pub fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Result<Vec<f32>, SearchError> {
    use rand_distr::{Distribution, Gamma};

    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet_alpha {alpha}: {e}")))?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        // Every draw underflowed; spread the noise evenly
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}
