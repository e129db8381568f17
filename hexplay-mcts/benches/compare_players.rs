//! Search comparison benchmark
//!
//! Compares, on the standard starting positions:
//! 1. Time to find a move for alpha-beta (with and without cache),
//!    flat Monte Carlo and MCTS
//! 2. Node counts of alpha-beta with and without the transposition cache

use hexplay_core::{AlphaBetaAI, GameKind, GameState, Player};
use hexplay_mcts::{FlatMonteCarlo, MctsConfig, MctsPlayer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    position: String,
    player: String,
    config: String,
    avg_move_time_ms: f64,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {:<10} | {:<14} | {:<12} | {:>10.2}ms |",
            self.position, self.player, self.config, self.avg_move_time_ms
        )
    }
}

/// Average wall-clock milliseconds of `search` over `runs` calls
fn time_ms(runs: usize, mut search: impl FnMut()) -> f64 {
    let start = Instant::now();
    for _ in 0..runs {
        search();
    }
    start.elapsed().as_secs_f64() * 1000.0 / runs as f64
}

// ============================================================================
// BENCHMARK: Time to Find Move
// ============================================================================

fn benchmark_move_time(initial: &GameState, position_name: &str) -> Vec<BenchmarkResult> {
    println!("\n=== MOVE TIME BENCHMARK: {} ===", position_name);
    let mut results = Vec::new();
    let mut record = |player: &str, config: String, ms: f64| {
        println!("  {} {} ... {:.2}ms", player, config, ms);
        results.push(BenchmarkResult {
            position: position_name.to_string(),
            player: player.to_string(),
            config,
            avg_move_time_ms: ms,
        });
    };

    for depth in [2, 4] {
        for use_cache in [false, true] {
            let ai = AlphaBetaAI::new(depth).with_cache(use_cache);
            let mut state = initial.clone();
            let ms = time_ms(3, || {
                ai.best_move(&mut state);
            });
            let name = if use_cache { "AB + cache" } else { "Alpha-Beta" };
            record(name, format!("Depth {}", depth), ms);
        }
    }

    for iterations in [100, 1000] {
        let mc = FlatMonteCarlo::new(iterations);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = initial.clone();
        let ms = time_ms(3, || {
            mc.best_move(&mut state, &mut rng);
        });
        record("Flat MC", format!("{} sims", iterations), ms);
    }

    for iterations in [100, 1000, 5000] {
        let mut state = initial.clone();
        let ms = time_ms(3, || {
            // Fresh player each run so no tree is reused
            let config = MctsConfig::default().with_iterations(iterations).with_seed(1);
            MctsPlayer::new(config).best_move(&mut state);
        });
        record("MCTS", format!("{} sims", iterations), ms);
    }

    results
}

// ============================================================================
// BENCHMARK: Cache Effect
// ============================================================================

fn benchmark_cache(initial: &GameState, position_name: &str, depth: u32) {
    println!("\n=== CACHE BENCHMARK: {} depth {} ===", position_name, depth);
    let mut state = initial.clone();
    let plain = AlphaBetaAI::new(depth).search(&mut state);
    let cached = AlphaBetaAI::new(depth).with_cache(true).search(&mut state);

    println!("  plain:  {} nodes", plain.nodes);
    println!("  cached: {} nodes, {} hits", cached.nodes, cached.cache_hits);
    println!(
        "  same move: {}, same score: {}",
        plain.best_move == cached.best_move,
        plain.score == cached.score
    );
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║  HEXPLAY: Search Algorithm Benchmark                      ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let positions = [
        ("Dodo 4", GameState::new(GameKind::Dodo, 4, Player::Red)),
        ("Gopher 4", GameState::new(GameKind::Gopher, 4, Player::Red)),
    ];

    let mut all_results = Vec::new();
    for (name, state) in positions {
        let state = match state {
            Ok(state) => state,
            Err(e) => {
                eprintln!("cannot build {}: {}", name, e);
                continue;
            }
        };
        all_results.extend(benchmark_move_time(&state, name));
        benchmark_cache(&state, name, 4);
    }

    println!("\n| Position   | Player         | Config       |     Avg Move |");
    println!("|------------|----------------|--------------|--------------|");
    for result in &all_results {
        println!("{}", result.to_table_row());
    }
    println!();
}
