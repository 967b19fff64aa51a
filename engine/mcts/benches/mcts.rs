//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full move search with varying simulation counts
//! - Tree operations (selection, backpropagation, policy extraction, re-rooting)
//! - Search from different game states (opening, midgame, near-terminal)
//! - Game comparison (TicTacToe vs Connect4)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{GameState, Player};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{EvaluationCache, MctsConfig, MctsTree, RolloutEvaluator, SearchTree, UniformEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn uniform_search<S: GameState>(
    config: MctsConfig,
) -> SearchTree<S, EvaluationCache<S, UniformEvaluator>> {
    SearchTree::new(
        config,
        EvaluationCache::with_default_capacity(UniformEvaluator::for_game::<S>()),
    )
}

/// One search from `state` on a fresh tree.
fn search_once<S: GameState>(config: &MctsConfig, state: &S) {
    let mut search = uniform_search::<S>(config.clone());
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    black_box(search.find_move(state, 1.0, &mut rng).unwrap());
}

/// Root with nine visited children, for tree-op benches.
fn populated_tree() -> MctsTree<TicTacToe> {
    let start = TicTacToe::new();
    let mut tree = MctsTree::new(start);
    for i in 0..9usize {
        let child_id = tree.add_child(tree.root(), i, (i as f32 + 1.0) / 45.0, start.apply(i));
        let child = tree.get_mut(child_id);
        child.visit_count = (i as u32 + 1) * 10;
        child.value_sum = (i as f32 / 9.0) * child.visit_count as f32;
    }
    tree.get_mut(tree.root()).visit_count = 450;
    tree
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_simulations");

    for sims in [50, 100, 200, 400, 800, 1600] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("tictactoe", sims), &sims, |b, &sims| {
            let config = MctsConfig::for_testing().with_simulations(sims);
            b.iter(|| search_once(&config, &TicTacToe::new()));
        });
    }

    group.finish();
}

fn bench_mcts_connect4(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_connect4");

    for sims in [50, 100, 200, 400, 800] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("opening", sims), &sims, |b, &sims| {
            let config = MctsConfig::for_testing().with_simulations(sims);
            b.iter(|| search_once(&config, &Connect4::new()));
        });
    }

    group.finish();
}

fn bench_mcts_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let config = MctsConfig::for_testing().with_simulations(200);

    group.bench_function("opening", |b| {
        b.iter(|| search_once(&config, &TicTacToe::new()));
    });

    // Board: X at 4, O at 0, X at 2, O at 6
    let midgame = TicTacToe::from_moves(&[4, 0, 2, 6]);
    group.bench_function("midgame", |b| {
        b.iter(|| search_once(&config, &midgame));
    });

    // Board: X at 0, O at 3, X at 1, O at 4 -> X can win at 2
    let near_terminal = TicTacToe::from_moves(&[0, 3, 1, 4]);
    group.bench_function("near_terminal", |b| {
        b.iter(|| search_once(&config, &near_terminal));
    });

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    group.bench_function("select_child", |b| {
        let tree = populated_tree();
        b.iter(|| black_box(tree.select_child(tree.root(), 1.25)));
    });

    group.bench_function("backpropagate_depth_5", |b| {
        b.iter_batched(
            || {
                let mut tree = MctsTree::new(TicTacToe::new());
                let mut parent = tree.root();
                let mut state = TicTacToe::new();
                for action in [4, 0, 2, 6, 1] {
                    state = state.apply(action);
                    parent = tree.add_child(parent, action, 0.5, state);
                }
                (tree, parent)
            },
            |(mut tree, leaf)| {
                tree.backpropagate(leaf, 1.0, Player::One);
                black_box(tree)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("root_policy", |b| {
        let tree = populated_tree();
        b.iter(|| black_box(tree.root_policy(9, 1.0)));
    });

    group.bench_function("root_policy_temperature", |b| {
        let tree = populated_tree();
        b.iter(|| black_box(tree.root_policy(9, 0.5)));
    });

    group.bench_function("reroot_after_search", |b| {
        let mut search = uniform_search::<TicTacToe>(MctsConfig::for_testing().with_simulations(400));
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let result = search.find_move(&TicTacToe::new(), 0.0, &mut rng).unwrap();
        let tree = search.tree().unwrap().clone();
        b.iter(|| black_box(tree.reroot(&result.state)));
    });

    group.finish();
}

// =============================================================================
// Configuration Comparison Benchmarks
// =============================================================================

fn bench_mcts_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_configs");
    let sims = 200u32;

    group.bench_function("training_config", |b| {
        let config = MctsConfig::for_training().with_simulations(sims);
        b.iter(|| search_once(&config, &TicTacToe::new()));
    });

    group.bench_function("evaluation_config", |b| {
        let config = MctsConfig::for_evaluation().with_simulations(sims);
        b.iter(|| search_once(&config, &TicTacToe::new()));
    });

    for c_puct in [0.5, 1.25, 2.5, 4.0] {
        group.bench_with_input(BenchmarkId::new("c_puct", c_puct), &c_puct, |b, &c_puct| {
            let config = MctsConfig::for_testing()
                .with_simulations(sims)
                .with_c_puct(c_puct);
            b.iter(|| search_once(&config, &TicTacToe::new()));
        });
    }

    // Shallow rollout baseline
    group.bench_function("rollout_baseline", |b| {
        let config = MctsConfig::for_evaluation().with_simulations(sims).with_c_puct(0.85);
        b.iter(|| {
            let mut search = SearchTree::new(config.clone(), RolloutEvaluator::new(10, 7));
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            black_box(search.find_move(&Connect4::new(), 1.0, &mut rng).unwrap())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_simulations,
    bench_mcts_connect4,
    bench_mcts_game_phases,
    bench_tree_operations,
    bench_mcts_configs,
);

criterion_main!(benches);
