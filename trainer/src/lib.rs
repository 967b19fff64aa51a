//! Self-play training on top of the `mcts` search.
//!
//! - [`SelfPlayDriver`]: plays games with tree reuse, records one
//!   [`TrainingExample`] per ply, backfills rewards and trains in mini-batches
//! - [`Arena`]: head-to-head games between two [`mcts::Agent`]s, plus the
//!   [`gate`] rule that decides whether new parameters are kept
//! - [`LinearNetwork`]: a small trainable policy/value evaluator
//! - [`Coach`]: the iterate / learn / evaluate loop driven by the CLI

pub mod arena;
pub mod coach;
pub mod example;
pub mod network;
pub mod selfplay;

pub use arena::{gate, Arena, ArenaError, ArenaResult, GateDecision};
pub use coach::{search_config, BaselineSettings, Coach, CoachConfig, CoachError, IterationReport};
pub use example::TrainingExample;
pub use network::LinearNetwork;
pub use selfplay::{assign_rewards, SelfPlayConfig, SelfPlayDriver, SelfPlayError, TrainSummary};
