//! Property-based tests for search tree invariants

use engine_core::{GameState, Player};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{EvaluationCache, LeafEvaluator, MctsConfig, MctsTree, SearchTree, UniformEvaluator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

type Search<S> = SearchTree<S, EvaluationCache<S, UniformEvaluator>>;

fn uniform_search<S: GameState>(config: MctsConfig) -> Search<S> {
    SearchTree::new(
        config,
        EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<S>()),
    )
}

/// Play `picks` as indices into the legal moves, stopping at a terminal state.
fn play_prefix<S: GameState>(picks: &[usize]) -> S {
    let mut state = S::default();
    for &pick in picks {
        let legal = state.legal_actions();
        if legal.is_empty() {
            break;
        }
        let next = state.apply(legal[pick % legal.len()]);
        if next.is_terminal() {
            break;
        }
        state = next;
    }
    state
}

/// Every non-terminal node: 0 <= N - sum(children N) <= 1, and expanded
/// nodes carry priors summing to 1 over exactly the legal actions.
fn check_invariants<S: GameState>(tree: &MctsTree<S>) -> Result<(), TestCaseError> {
    for node in tree.arena() {
        let child_visits: u32 = node.children.iter().map(|(_, id)| tree.get(*id).visit_count).sum();
        if node.is_terminal {
            prop_assert!(node.children.is_empty());
            continue;
        }
        prop_assert!(node.visit_count >= child_visits);
        prop_assert!(node.visit_count - child_visits <= 1);

        if node.is_expanded() {
            let actions: Vec<usize> = node.children.iter().map(|(a, _)| *a).collect();
            prop_assert_eq!(actions, node.state.legal_actions());
            let prior_sum: f32 = node.children.iter().map(|(_, id)| tree.get(*id).prior).sum();
            prop_assert!((prior_sum - 1.0).abs() < 1e-4, "prior sum {}", prior_sum);
        }

        let q = node.mean_value();
        prop_assert!((0.0..=1.0).contains(&q), "mean value {} out of range", q);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_visit_conservation_tictactoe(
        picks in prop::collection::vec(0usize..9, 0..6),
        sims in 1u32..120,
        seed in any::<u64>(),
        train in any::<bool>(),
    ) {
        let state: TicTacToe = play_prefix(&picks);
        prop_assume!(!state.is_terminal());

        let config = MctsConfig::for_training().with_simulations(sims).with_train(train);
        let mut search = uniform_search::<TicTacToe>(config);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let result = search.find_move(&state, 1.0, &mut rng).unwrap();

        let tree = search.tree().unwrap();
        check_invariants(tree)?;
        prop_assert_eq!(tree.root_node().visit_count, sims);

        let sum: f32 = result.visit_probabilities.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-4);
        for (action, p) in result.visit_probabilities.iter().enumerate() {
            if *p > 0.0 {
                prop_assert!(state.legal_actions().contains(&action));
            }
        }
    }

    #[test]
    fn prop_visit_conservation_connect4(
        picks in prop::collection::vec(0usize..7, 0..12),
        seed in any::<u64>(),
    ) {
        let state: Connect4 = play_prefix(&picks);
        prop_assume!(!state.is_terminal());

        let mut search = uniform_search::<Connect4>(MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        search.find_move(&state, 1.0, &mut rng).unwrap();

        check_invariants(search.tree().unwrap())?;
    }

    #[test]
    fn prop_tree_reuse_keeps_invariants(
        seed in any::<u64>(),
        plies in 1usize..6,
    ) {
        let mut search = uniform_search::<TicTacToe>(MctsConfig::for_testing().with_simulations(60));
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = TicTacToe::new();

        for _ in 0..plies {
            if state.is_terminal() {
                break;
            }
            let result = search.find_move(&state, 1.0, &mut rng).unwrap();
            let kept_visits = {
                let tree = search.tree().unwrap();
                tree.root_node()
                    .child(result.action)
                    .map_or(0, |id| tree.get(id).visit_count)
            };

            search.move_root(&result.state);
            let tree = search.tree().unwrap();
            prop_assert!(tree.root_node().parent.is_none());
            prop_assert_eq!(&tree.root_node().state, &result.state);
            prop_assert_eq!(tree.root_node().visit_count, kept_visits);
            check_invariants(tree)?;

            state = result.state;
        }
    }

    #[test]
    fn prop_temperature_one_is_proportional(seed in any::<u64>()) {
        let mut search = uniform_search::<TicTacToe>(MctsConfig::for_testing().with_simulations(90));
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let result = search.find_move(&TicTacToe::new(), 1.0, &mut rng).unwrap();

        let tree = search.tree().unwrap();
        let root = tree.root_node();
        let total: u32 = root.children.iter().map(|(_, id)| tree.get(*id).visit_count).sum();
        for &(action, id) in &root.children {
            let expected = tree.get(id).visit_count as f32 / total as f32;
            prop_assert!((result.visit_probabilities[action] - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn prop_temperature_zero_is_argmax(seed in any::<u64>()) {
        let mut search = uniform_search::<TicTacToe>(MctsConfig::for_testing().with_simulations(90));
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let result = search.find_move(&TicTacToe::new(), 0.0, &mut rng).unwrap();

        let (best, _) = search.tree().unwrap().best_action().unwrap();
        prop_assert_eq!(result.action, best);
        prop_assert_eq!(result.visit_probabilities.iter().filter(|p| **p > 0.0).count(), 1);
    }

    #[test]
    fn prop_cache_is_consistent(picks in prop::collection::vec(0usize..9, 0..8)) {
        let state: TicTacToe = play_prefix(&picks);
        let mut cache = EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<TicTacToe>());

        for perspective in [Player::One, Player::Two] {
            let first = cache.evaluate(&state, perspective).unwrap();
            let second = cache.evaluate(&state, perspective).unwrap();
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(cache.misses(), 2);
        prop_assert_eq!(cache.hits(), 2);
    }
}
