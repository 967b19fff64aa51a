//! Property-based tests for reward backfill and arena tallies

use engine_core::{reward_for, GameState, Outcome};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{EvaluationCache, MctsConfig, RandomAgent, SearchTree, UniformEvaluator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use trainer::{assign_rewards, Arena, LinearNetwork, SelfPlayConfig, SelfPlayDriver, TrainingExample};

/// Play `picks` as indices into the legal moves until the game ends, padding
/// with the first legal move. Returns one example per ply and the outcome.
fn random_history<S: GameState>(picks: &[usize]) -> (Vec<TrainingExample<S>>, Outcome) {
    let mut state = S::default();
    let mut history = Vec::new();
    let mut picks = picks.iter().copied();
    loop {
        if let Some(outcome) = state.winner() {
            return (history, outcome);
        }
        let legal = state.legal_actions();
        let action = legal[picks.next().unwrap_or(0) % legal.len()];
        history.push(TrainingExample::terminal_anchor(state.clone()));
        state = state.apply(action);
    }
}

fn check_rewards<S>(history: &[TrainingExample<S>], outcome: Outcome) -> Result<(), TestCaseError> {
    for example in history {
        prop_assert_eq!(example.reward, Some(reward_for(outcome, example.player)));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_backfill_matches_outcome_tictactoe(picks in prop::collection::vec(0usize..9, 0..9)) {
        let (mut history, outcome) = random_history::<TicTacToe>(&picks);
        assign_rewards(&mut history, outcome);
        check_rewards(&history, outcome)?;

        // Movers alternate, so consecutive rewards are negatives of each other.
        for pair in history.windows(2) {
            prop_assert_ne!(pair[0].player, pair[1].player);
            prop_assert_eq!(pair[0].reward.map(|r| -r), pair[1].reward);
        }
    }

    #[test]
    fn prop_backfill_matches_outcome_connect4(picks in prop::collection::vec(0usize..7, 0..42)) {
        let (mut history, outcome) = random_history::<Connect4>(&picks);
        assign_rewards(&mut history, outcome);
        check_rewards(&history, outcome)?;
    }

    #[test]
    fn prop_self_play_rewards_follow_outcome(seed in any::<u64>(), record_terminal in any::<bool>()) {
        let config = SelfPlayConfig {
            record_terminal,
            ..SelfPlayConfig::default()
        };
        let mut driver = SelfPlayDriver::<TicTacToe, _>::new(
            MctsConfig::for_testing().with_simulations(16),
            LinearNetwork::for_game::<TicTacToe>(),
            256,
            config,
            seed,
        );

        let (history, outcome) = driver.play_game(1.0).unwrap();
        prop_assert!(!history.is_empty());
        check_rewards(&history, outcome)?;
        prop_assert_eq!(history.iter().any(|e| e.is_anchor()), record_terminal);
    }

    #[test]
    fn prop_arena_tally_conserved(seed in any::<u64>(), num_tests in 1usize..6) {
        let cache = EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<TicTacToe>());
        let mut search = SearchTree::new(MctsConfig::for_evaluation().with_simulations(16), cache);
        let mut random = RandomAgent::new();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let tally = Arena::test::<TicTacToe, _, _>(&mut search, &mut random, 1.0, num_tests, &mut rng).unwrap();
        prop_assert_eq!(tally.wins + tally.draws + tally.losses, num_tests);
        prop_assert_eq!(tally.total(), num_tests);
    }

    #[test]
    fn prop_arena_tally_conserved_search_vs_search(seed in any::<u64>(), num_tests in 1usize..4) {
        let mut a = SearchTree::new(
            MctsConfig::for_evaluation().with_simulations(12),
            EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<Connect4>()),
        );
        let mut b = SearchTree::new(
            MctsConfig::for_evaluation().with_simulations(8),
            EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<Connect4>()),
        );
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let tally = Arena::test::<Connect4, _, _>(&mut a, &mut b, 1.0, num_tests, &mut rng).unwrap();
        prop_assert_eq!(tally.total(), num_tests);
    }
}
