//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per move.
    pub num_simulations: u32,

    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Dirichlet noise concentration for root exploration.
    /// For games with ~10 legal moves, use ~0.3.
    pub dirichlet_alpha: f32,

    /// Fraction of the root prior that comes from Dirichlet noise.
    /// 0.25 means 75% prior + 25% noise.
    pub dirichlet_epsilon: f32,

    /// Training mode: mix noise into root priors once per root.
    /// Arena and evaluation play run with this off.
    pub train: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 800,
            c_puct: 1.25,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.25,
            train: true,
        }
    }
}

impl MctsConfig {
    /// Create config for self-play training (with exploration noise).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Create config for evaluation/arena play (deterministic priors).
    pub fn for_evaluation() -> Self {
        Self {
            num_simulations: 800,
            c_puct: 1.25,
            dirichlet_alpha: 0.0, // No noise
            dirichlet_epsilon: 0.0,
            train: false,
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            c_puct: 1.25,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
            train: false,
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set root noise parameters.
    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Builder pattern: toggle training mode.
    pub fn with_train(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    /// Reject parameters the search cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_simulations == 0 {
            return Err("num_simulations must be positive".into());
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(format!("c_puct must be finite and >= 0, got {}", self.c_puct));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            ));
        }
        let alpha_ok = self.dirichlet_alpha.is_finite() && self.dirichlet_alpha > 0.0;
        if self.train && self.dirichlet_epsilon > 0.0 && !alpha_ok {
            return Err(format!(
                "dirichlet_alpha must be positive when noise is enabled, got {}",
                self.dirichlet_alpha
            ));
        }
        Ok(())
    }
}
