//! Monte Carlo Tree Search (MCTS) for AlphaZero-style self-play.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`GameState`](engine_core::GameState)
//! contract.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running simulations.
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using PUCT to balance exploration and
//!    exploitation
//! 2. **Expansion**: When reaching a leaf, expand it by adding children for
//!    each legal action
//! 3. **Evaluation**: Use a policy/value network (through [`EvaluationCache`])
//!    or random playouts to estimate the value of the new state
//! 4. **Backpropagation**: Update visit counts and value estimates along the
//!    path from leaf to root
//!
//! All values in the tree are win probabilities in `[0, 1]`.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_tictactoe::TicTacToe;
//! use mcts::{EvaluationCache, MctsConfig, SearchTree, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let cache = EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<TicTacToe>());
//! let mut search = SearchTree::new(MctsConfig::for_testing(), cache);
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let state = TicTacToe::new();
//! let result = search.find_move(&state, 1.0, &mut rng).unwrap();
//! search.move_root(&result.state);
//!
//! println!("Best action: {}", result.action);
//! println!("Policy: {:?}", result.visit_probabilities);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per move (default: 800)
//! - `c_puct`: Exploration constant for PUCT (default: 1.25)
//! - `dirichlet_alpha` / `dirichlet_epsilon`: Root noise (default: 0.3 / 0.25)
//! - `train`: Mix root noise in self-play, off for arena play
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    SearchTree<S, L>                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌──────────────────────────────────┐    │
//! │  │ MctsTree<S> │   │ L: LeafEvaluator<S>              │    │
//! │  │  (arena)    │   │  EvaluationCache<S, E: Evaluator>│    │
//! │  └──────┬──────┘   │  RolloutEvaluator                │    │
//! │         │          └────────────────┬─────────────────┘    │
//! │         ▼                           ▼                      │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │ select → expand → evaluate → backpropagate           │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod cache;
pub mod config;
pub mod evaluator;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use agent::{Agent, RandomAgent};
pub use cache::{mask_and_normalize, EvaluationCache, DEFAULT_CACHE_CAPACITY};
pub use config::MctsConfig;
pub use evaluator::{
    uniform_priors, EvalResult, Evaluation, Evaluator, EvaluatorError, LeafEvaluator, Trainable,
    TrainingBatch, UniformEvaluator,
};
pub use node::{MctsNode, NodeId};
pub use rollout::RolloutEvaluator;
pub use search::{MoveResult, SearchError, SearchStats, SearchTree};
pub use tree::MctsTree;
