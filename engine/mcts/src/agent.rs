//! Move-selecting agents that can sit at an arena table.

use engine_core::GameState;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::evaluator::{uniform_priors, LeafEvaluator};
use crate::search::{MoveResult, SearchError, SearchStats, SearchTree};

/// Anything that picks moves and keeps (or ignores) a search tree in sync
/// with the real game.
pub trait Agent<S: GameState> {
    fn name(&self) -> &str;

    /// Forget all search state; called at the start of every game.
    fn drop_root(&mut self);

    fn find_move(
        &mut self,
        state: &S,
        temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<MoveResult<S>, SearchError>;

    /// Follow the game to `state`, whichever side produced it.
    fn move_root(&mut self, state: &S);
}

impl<S: GameState, L: LeafEvaluator<S>> Agent<S> for SearchTree<S, L> {
    fn name(&self) -> &str {
        SearchTree::name(self)
    }

    fn drop_root(&mut self) {
        SearchTree::drop_root(self)
    }

    fn find_move(
        &mut self,
        state: &S,
        temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<MoveResult<S>, SearchError> {
        SearchTree::find_move(self, state, temperature, rng)
    }

    fn move_root(&mut self, state: &S) {
        SearchTree::move_root(self, state)
    }
}

/// Uniform random legal mover. Holds no tree.
#[derive(Debug, Clone, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl<S: GameState> Agent<S> for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn drop_root(&mut self) {}

    fn find_move(
        &mut self,
        state: &S,
        _temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<MoveResult<S>, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }
        let legal = state.legal_actions();
        let action = *legal.choose(rng).ok_or(SearchError::NoLegalMoves)?;

        Ok(MoveResult {
            state: state.apply(action),
            action,
            root_value: 0.5,
            visit_probabilities: uniform_priors(&legal, S::ACTION_COUNT),
            stats: SearchStats::default(),
        })
    }

    fn move_root(&mut self, _state: &S) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EvaluationCache;
    use crate::config::MctsConfig;
    use crate::evaluator::UniformEvaluator;
    use games_tictactoe::TicTacToe;
    use rand::SeedableRng;

    #[test]
    fn test_random_agent_plays_legal_moves() {
        let mut agent = RandomAgent::new();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut state = TicTacToe::new();

        while !state.is_terminal() {
            let legal = state.legal_actions();
            let result = Agent::find_move(&mut agent, &state, 1.0, &mut rng).unwrap();
            assert!(legal.contains(&result.action));
            state = result.state;
        }

        let err = Agent::find_move(&mut agent, &state, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, SearchError::TerminalState));
    }

    #[test]
    fn test_search_tree_as_agent() {
        let tree = SearchTree::new(
            MctsConfig::for_testing(),
            EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<TicTacToe>()),
        )
        .with_name("uniform");
        let mut agent: Box<dyn Agent<TicTacToe>> = Box::new(tree);
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        assert_eq!(agent.name(), "uniform");
        let result = agent.find_move(&TicTacToe::new(), 1.0, &mut rng).unwrap();
        agent.move_root(&result.state);
        agent.drop_root();
    }
}
