//! Training loop: self-play, learn, then gate the new parameters in the arena.

use std::path::PathBuf;

use engine_config::CentralConfig;
use engine_core::GameState;
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{
    EvaluationCache, EvaluatorError, MctsConfig, RandomAgent, RolloutEvaluator, SearchTree,
    Trainable,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::arena::{gate, ArenaError, ArenaResult, GateDecision};
use crate::network::LinearNetwork;
use crate::selfplay::{SelfPlayConfig, SelfPlayDriver, SelfPlayError, TrainSummary};

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Self-play failed: {0}")]
    SelfPlay(#[from] SelfPlayError),

    #[error("Arena failed: {0}")]
    Arena(#[from] ArenaError),

    #[error("Model error: {0}")]
    Model(#[from] EvaluatorError),
}

/// Shallow rollout search used as a fixed-strength opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSettings {
    pub num_simulations: u32,
    pub c_puct: f32,
    pub max_depth: u32,
}

impl BaselineSettings {
    pub fn agent<S: GameState>(&self, seed: u64) -> SearchTree<S, RolloutEvaluator> {
        let config = MctsConfig::for_evaluation()
            .with_simulations(self.num_simulations)
            .with_c_puct(self.c_puct);
        SearchTree::new(config, RolloutEvaluator::new(self.max_depth, seed)).with_name("rollout")
    }
}

#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub iterations: u32,
    pub games_per_iteration: usize,
    /// Self-play move temperature
    pub temperature: f32,
    /// Arena move temperature
    pub temp_exploitation: f32,
    pub eval_games: usize,
    pub win_threshold: f64,
    pub vs_previous: bool,
    pub vs_random: bool,
    pub vs_baseline: bool,
    pub baseline: BaselineSettings,
    pub search: MctsConfig,
    pub cache_capacity: usize,
    pub selfplay: SelfPlayConfig,
    pub seed: u64,
    /// Where promoted parameters are saved
    pub model_path: PathBuf,
    pub show_progress: bool,
}

impl CoachConfig {
    pub fn from_central(central: &CentralConfig, model_path: PathBuf) -> Self {
        Self {
            iterations: central.training.iterations,
            games_per_iteration: central.training.games_per_iteration,
            temperature: central.mcts.temperature as f32,
            temp_exploitation: central.mcts.temp_exploitation as f32,
            eval_games: central.evaluation.games,
            win_threshold: central.evaluation.win_threshold,
            vs_previous: central.evaluation.vs_previous,
            vs_random: central.evaluation.vs_random,
            vs_baseline: central.evaluation.vs_baseline,
            baseline: BaselineSettings {
                num_simulations: central.baseline.num_simulations,
                c_puct: central.baseline.c_puct as f32,
                max_depth: central.baseline.max_depth,
            },
            search: search_config(central),
            cache_capacity: central.mcts.cache_capacity,
            selfplay: SelfPlayConfig {
                batch_size: central.training.batch_size,
                learning_rate: central.training.learning_rate as f32,
                max_plies: central.training.max_plies,
                record_terminal: central.training.record_terminal,
            },
            seed: central.training.seed,
            model_path,
            show_progress: false,
        }
    }
}

/// Self-play search settings from the `[mcts]` section.
pub fn search_config(central: &CentralConfig) -> MctsConfig {
    MctsConfig::for_training()
        .with_simulations(central.mcts.num_simulations)
        .with_c_puct(central.mcts.c_puct as f32)
        .with_dirichlet(
            central.mcts.dirichlet_alpha as f32,
            central.mcts.dirichlet_weight as f32,
        )
}

/// Everything one iteration produced.
#[derive(Debug, Clone)]
pub struct IterationReport {
    pub iteration: u32,
    pub examples: usize,
    pub train: TrainSummary,
    pub vs_previous: Option<(ArenaResult, GateDecision)>,
    pub vs_random: Option<ArenaResult>,
    pub vs_baseline: Option<ArenaResult>,
}

pub struct Coach<S: GameState> {
    driver: SelfPlayDriver<S, LinearNetwork>,
    config: CoachConfig,
}

impl<S: GameState> Coach<S> {
    /// Start from the saved parameters at `model_path` when they exist.
    pub fn new(config: CoachConfig) -> Result<Self, CoachError> {
        let mut network = LinearNetwork::for_game::<S>();
        if config.model_path.exists() {
            network.load_model(&config.model_path)?;
            info!(path = %config.model_path.display(), "Resuming from saved network");
        }
        let driver = SelfPlayDriver::new(
            config.search.clone(),
            network,
            config.cache_capacity,
            config.selfplay.clone(),
            config.seed,
        );
        Ok(Self { driver, config })
    }

    pub fn driver(&self) -> &SelfPlayDriver<S, LinearNetwork> {
        &self.driver
    }

    pub fn network(&self) -> &LinearNetwork {
        self.driver.network()
    }

    pub fn run(&mut self) -> Result<Vec<IterationReport>, CoachError> {
        let mut reports = Vec::with_capacity(self.config.iterations as usize);
        for iteration in 1..=self.config.iterations {
            reports.push(self.run_iteration(iteration)?);
        }
        Ok(reports)
    }

    pub fn run_iteration(&mut self, iteration: u32) -> Result<IterationReport, CoachError> {
        let progress = self.progress_bar();
        for _ in 0..self.config.games_per_iteration {
            self.driver
                .generate_training_samples(1, self.config.temperature)?;
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let examples = self.driver.take_examples();
        let train = self.driver.learn_from_examples(&examples, None)?;

        let vs_previous = if self.config.vs_previous {
            Some(self.gate_against_previous()?)
        } else {
            None
        };

        let temp = self.config.temp_exploitation;
        let games = self.config.eval_games;
        let vs_random = if self.config.vs_random {
            Some(self.driver.test(&mut RandomAgent::new(), temp, games)?)
        } else {
            None
        };
        let vs_baseline = if self.config.vs_baseline {
            let mut baseline = self.config.baseline.agent::<S>(self.config.seed ^ iteration as u64);
            Some(self.driver.test(&mut baseline, temp, games)?)
        } else {
            None
        };

        info!(
            iteration,
            examples = examples.len(),
            batches = train.batches,
            mean_loss = ?train.mean_loss,
            vs_previous = ?vs_previous.map(|(r, d)| format!("{} {:?}", r, d)),
            vs_random = ?vs_random.map(|r| r.to_string()),
            vs_baseline = ?vs_baseline.map(|r| r.to_string()),
            "Iteration complete"
        );

        Ok(IterationReport {
            iteration,
            examples: examples.len(),
            train,
            vs_previous,
            vs_random,
            vs_baseline,
        })
    }

    /// Play the current parameters against the last saved ones and apply
    /// the gate decision.
    fn gate_against_previous(&mut self) -> Result<(ArenaResult, GateDecision), CoachError> {
        let path = self.config.model_path.clone();
        let previous = if path.exists() {
            LinearNetwork::load(&path)?
        } else {
            LinearNetwork::for_game::<S>()
        };

        let eval_config = self.config.search.clone().with_train(false);
        let mut opponent = SearchTree::new(
            eval_config,
            EvaluationCache::new(previous, self.config.cache_capacity),
        )
        .with_name("previous");

        let result = self.driver.test(
            &mut opponent,
            self.config.temp_exploitation,
            self.config.eval_games,
        )?;
        let decision = gate(&result, self.config.win_threshold);

        match decision {
            GateDecision::Promote => {
                self.driver.network().save_model(&path)?;
                info!(path = %path.display(), %result, "New network promoted");
            }
            GateDecision::Revert if path.exists() => {
                self.driver.update_network(|net| net.load_model(&path))?;
                warn!(path = %path.display(), %result, "Unanimous arena result, reverted network");
            }
            GateDecision::Revert => {
                warn!(%result, "Unanimous arena result but no saved network to revert to");
            }
            GateDecision::Retain => {
                info!(%result, "Network retained without saving");
            }
        }
        Ok((result, decision))
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.config.show_progress || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            return None;
        }
        let pb = ProgressBar::new(self.config.games_per_iteration as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    }
}
