//! Simulate command - local self-play between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use hexplay_core::{GameConfig, GameKind, Player, Rules};

use crate::strategy::{Agent, StrategySpec};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Simulation config JSON file (replaces the other flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Game config JSON file (replaces --game and --size)
    #[arg(long, value_name = "FILE")]
    pub game_config: Option<PathBuf>,

    /// Game variant (dodo or gopher)
    #[arg(long, default_value = "dodo")]
    pub game: GameKind,

    /// Board size (cells per side)
    #[arg(long, default_value = "4")]
    pub size: i32,

    /// Strategy for Red
    #[arg(long, default_value = "mcts:1000")]
    pub red: StrategySpec,

    /// Strategy for Blue
    #[arg(long, default_value = "random")]
    pub blue: StrategySpec,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Append the JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything a simulation run needs, loadable from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub game: GameConfig,
    pub red: StrategySpec,
    pub blue: StrategySpec,
    pub games: usize,
    pub parallel: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            red: StrategySpec::Mcts { iterations: 1000 },
            blue: StrategySpec::Random,
            games: 10,
            parallel: false,
            seed: None,
            output: None,
        }
    }
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    winner: Player,
    score: i32,
    moves: u32,
    red_time_ms: f64,
    blue_time_ms: f64,
}

/// Aggregated simulation results
#[derive(Clone, Debug, Serialize)]
struct SimulationReport {
    timestamp: String,
    game: GameKind,
    hex_size: i32,
    red: StrategySpec,
    blue: StrategySpec,
    total_games: usize,
    red_wins: usize,
    blue_wins: usize,
    red_win_rate: f32,
    /// (red wins - blue wins) / games
    red_advantage: f32,
    avg_move_time_ms: f64,
    elapsed_secs: f64,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Resolve the configuration (file or flags)
/// 2. Play the games
/// 3. Report results
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args, seed)?;

    tracing::info!(
        "Starting simulation: {} size {}, red={} blue={} ({} games)",
        config.game.game,
        config.game.hex_size,
        config.red,
        config.blue,
        config.games
    );

    let start = Instant::now();
    let records = play_games(&config)?;
    let report = compute_statistics(&config, records, start.elapsed());

    report_results(&report, args.json)?;
    if let Some(path) = &config.output {
        append_report(&report, path)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &SimulateArgs, seed: Option<u64>) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read simulation config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse simulation config: {}", path.display()))?
        }
        None => SimulationConfig {
            game: match &args.game_config {
                Some(path) => GameConfig::load(path)?,
                None => GameConfig {
                    game: args.game,
                    hex_size: args.size,
                    ..GameConfig::default()
                },
            },
            red: args.red,
            blue: args.blue,
            games: args.games,
            parallel: args.parallel,
            seed: None,
            output: args.output.clone(),
        },
    };

    if seed.is_some() {
        config.seed = seed;
    }
    // Fail on a bad board before any game starts
    config.game.build()?;
    Ok(config)
}

/// Play all games, in parallel when configured
fn play_games(config: &SimulationConfig) -> Result<Vec<GameRecord>> {
    let progress = ProgressBar::new(config.games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games")?
            .progress_chars("=>-"),
    );

    let play = |game_number: usize| {
        let record = play_single_game(config, game_number);
        progress.inc(1);
        record
    };

    let records = if config.parallel {
        (1..=config.games).into_par_iter().map(play).collect::<Result<Vec<_>>>()
    } else {
        (1..=config.games).map(play).collect::<Result<Vec<_>>>()
    }?;

    progress.finish_and_clear();
    Ok(records)
}

fn report_results(report: &SimulationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_text_results(report);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to the end; each side keeps its own agent throughout
fn play_single_game(config: &SimulationConfig, game_number: usize) -> Result<GameRecord> {
    let mut game = config.game.build()?;
    let seed = config.seed.map(|s| s.wrapping_add(2 * game_number as u64));
    let mut red = Agent::new(config.red, seed);
    let mut blue = Agent::new(config.blue, seed.map(|s| s.wrapping_add(1)));

    let mut red_time = Duration::ZERO;
    let mut blue_time = Duration::ZERO;
    let mut moves = 0u32;

    while !game.is_terminal() {
        let player = game.current_player();
        let (agent, opponent, clock) = match player {
            Player::Red => (&mut red, &mut blue, &mut red_time),
            Player::Blue => (&mut blue, &mut red, &mut blue_time),
        };

        let start = Instant::now();
        let mv = agent.choose(&mut game);
        *clock += start.elapsed();

        opponent.observe(mv);
        tracing::debug!(game = game_number, turn = moves, ?player, %mv, "move played");
        game.apply(mv);
        moves += 1;
    }

    let record = GameRecord {
        game_number,
        winner: game.winner(),
        score: game.score(),
        moves,
        red_time_ms: red_time.as_secs_f64() * 1000.0,
        blue_time_ms: blue_time.as_secs_f64() * 1000.0,
    };
    tracing::info!(
        "Game {}: {:?} wins ({} moves)",
        record.game_number,
        record.winner,
        record.moves
    );
    Ok(record)
}

/// Compute aggregate statistics from game records
fn compute_statistics(config: &SimulationConfig, games: Vec<GameRecord>, elapsed: Duration) -> SimulationReport {
    let red_wins = games.iter().filter(|g| g.winner == Player::Red).count();
    let blue_wins = games.len() - red_wins;

    let total_moves: u32 = games.iter().map(|g| g.moves).sum();
    let total_time: f64 = games.iter().map(|g| g.red_time_ms + g.blue_time_ms).sum();

    SimulationReport {
        timestamp: chrono::Local::now().to_rfc3339(),
        game: config.game.game,
        hex_size: config.game.hex_size,
        red: config.red,
        blue: config.blue,
        total_games: games.len(),
        red_wins,
        blue_wins,
        red_win_rate: ratio(red_wins as f64, games.len() as f64) as f32,
        red_advantage: ratio(red_wins as f64 - blue_wins as f64, games.len() as f64) as f32,
        avg_move_time_ms: ratio(total_time, total_moves as f64),
        elapsed_secs: elapsed.as_secs_f64(),
        games,
    }
}

/// Append the report as one JSON line
fn append_report(report: &SimulationReport, path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open report file: {}", path.display()))?;
    serde_json::to_writer(&mut file, report)?;
    writeln!(file)?;
    tracing::info!("Report appended to {}", path.display());
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(report: &SimulationReport) {
    println!("\n=== Simulation Results ===");
    println!("Game:        {} size {}", report.game, report.hex_size);
    println!("Red:         {}", report.red);
    println!("Blue:        {}", report.blue);
    println!("Total games: {}", report.total_games);
    println!("Red wins:    {} ({:.1}%)", report.red_wins, report.red_win_rate * 100.0);
    println!("Blue wins:   {}", report.blue_wins);
    println!("Red advantage: {:+.1}%", report.red_advantage * 100.0);
    println!("Avg move:    {:.2}ms", report.avg_move_time_ms);
    println!("Elapsed:     {:.1}s", report.elapsed_secs);

    println!("\nGame details:");
    for game in &report.games {
        println!(
            "  Game {}: {:?} wins in {} moves (red {:.0}ms, blue {:.0}ms)",
            game.game_number, game.winner, game.moves, game.red_time_ms, game.blue_time_ms
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
