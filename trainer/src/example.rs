//! Labeled positions produced by self-play.

use std::fmt;

use engine_core::{GameState, Outcome, Player};
use mcts::MoveResult;

/// One searched position and the labels the learner trains on.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample<S> {
    /// Position before the move was played
    pub state: S,
    /// Mover at this ply
    pub player: Player,
    /// Shape used to render per-action vectors
    pub board_shape: (usize, usize),
    /// Visit distribution over the full action space (policy target)
    pub visit_probabilities: Vec<f32>,
    /// Evaluator priors at the root, before noise
    pub priors: Vec<f32>,
    /// Mover's win probability estimated by the search. `None` marks the
    /// terminal anchor recorded after the last move.
    pub value: Option<f32>,
    /// Root child win rates, `None` for unvisited or illegal actions
    pub child_values: Vec<Option<f32>>,
    /// +1 / -1 / 0 from the mover's point of view, set once the game ends
    pub reward: Option<f32>,
}

impl<S: GameState> TrainingExample<S> {
    /// Record the search that was run from `state`.
    pub fn from_search(
        state: S,
        result: &MoveResult<S>,
        priors: Vec<f32>,
        child_values: Vec<Option<f32>>,
    ) -> Self {
        Self {
            player: state.player(),
            state,
            board_shape: S::ACTION_SHAPE,
            visit_probabilities: result.visit_probabilities.clone(),
            priors,
            value: Some(1.0 - result.root_value),
            child_values,
            reward: None,
        }
    }

    /// Zero-target example for the final position of a game, attributed to
    /// the side that would move next, so the loser of a won game.
    pub fn terminal_anchor(state: S) -> Self {
        let player = match state.winner() {
            Some(Outcome::Win(winner)) => winner.opponent(),
            _ => state.player(),
        };
        Self {
            player,
            state,
            board_shape: S::ACTION_SHAPE,
            visit_probabilities: vec![0.0; S::ACTION_COUNT],
            priors: vec![0.0; S::ACTION_COUNT],
            value: None,
            child_values: vec![None; S::ACTION_COUNT],
            reward: None,
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.value.is_none()
    }
}

impl<S: GameState + fmt::Display> fmt::Display for TrainingExample<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let child_values: Vec<f32> = self
            .child_values
            .iter()
            .map(|v| v.unwrap_or(f32::NAN))
            .collect();

        writeln!(f, "{}", self.state)?;
        match self.value {
            Some(v) => writeln!(f, "Value: {:.3}", v)?,
            None => writeln!(f, "Value: -")?,
        }
        writeln!(f, "Child Values:\n{}", self.state.eval_to_string(&child_values))?;
        match self.reward {
            Some(r) => writeln!(f, "Reward: {}", r)?,
            None => writeln!(f, "Reward: -")?,
        }
        writeln!(
            f,
            "Probabilities:\n{}",
            self.state.eval_to_string(&self.visit_probabilities)
        )?;
        write!(f, "Priors:\n{}", self.state.eval_to_string(&self.priors))
    }
}
