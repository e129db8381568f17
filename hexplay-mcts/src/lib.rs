//! HEXPLAY MCTS - Monte Carlo search for Dodo and Gopher
//!
//! This crate provides:
//! - Random rollouts on the live position (apply, then undo)
//! - Flat Monte Carlo evaluation of the root moves
//! - Monte Carlo Tree Search with UCB1 selection
//! - Tree reuse across turns via `MctsPlayer`

pub mod flat;
pub mod rollout;
pub mod search;
pub mod tree;

pub use flat::FlatMonteCarlo;
pub use rollout::{random_rollout, RolloutResult};
pub use search::{run_search, SearchReport};
pub use tree::{MctsNode, MctsTree, MoveStatistics, NodeId, NodeStats};

use hexplay_core::{Move, Rules};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// MCTS configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCB1 exploration constant
    pub exploration: f32,
    /// Iterations per move when there is no time limit
    pub iterations: u32,
    /// Wall-clock budget per move; takes precedence over `iterations`
    pub time_limit: Option<Duration>,
    /// Seed for the rollout RNG (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: std::f32::consts::SQRT_2,
            iterations: 1000,
            time_limit: None,
            seed: None,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self.time_limit = None;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_exploration(mut self, exploration: f32) -> Self {
        self.exploration = exploration;
        self
    }
}

/// MCTS player that keeps its tree between turns.
///
/// After choosing a move the player descends into that child, so the
/// caller only reports the opponent's replies through [`MctsPlayer::advance`].
pub struct MctsPlayer {
    config: MctsConfig,
    tree: Option<MctsTree>,
    rng: ChaCha8Rng,
    last_report: Option<SearchReport>,
}

impl MctsPlayer {
    pub fn new(config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            tree: None,
            rng,
            last_report: None,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Retained tree, rooted at the position after the last known move
    pub fn tree(&self) -> Option<&MctsTree> {
        self.tree.as_ref()
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Get best move using MCTS. Panics on a terminal position.
    ///
    /// The retained tree is searched further when its root matches `game`;
    /// otherwise the search starts from a fresh tree.
    pub fn best_move<G: Rules>(&mut self, game: &mut G) -> Move {
        assert!(!game.is_terminal(), "MCTS invoked on a terminal position");

        let fingerprint = game.fingerprint();
        let mut tree = match self.tree.take() {
            Some(tree) if tree.root_fingerprint() == fingerprint => {
                tracing::debug!(reused_nodes = tree.len(), "reusing search tree");
                tree
            }
            Some(_) => {
                tracing::debug!("retained tree does not match the position, starting over");
                MctsTree::new(&*game)
            }
            None => MctsTree::new(&*game),
        };

        let report = run_search(&mut tree, game, &self.config, &mut self.rng);
        let chosen = match tree.best_move() {
            Some(mv) => mv,
            None => panic!("MCTS search expanded no move"),
        };

        if tree.advance(chosen) {
            self.tree = Some(tree);
        }
        self.last_report = Some(report);
        chosen
    }

    /// Follow an opponent move in the retained tree.
    ///
    /// The tree is dropped when the move was never expanded.
    pub fn advance(&mut self, mv: Move) {
        if let Some(tree) = self.tree.as_mut() {
            if !tree.advance(mv) {
                tracing::debug!(%mv, "opponent move not in tree, discarding it");
                self.tree = None;
            }
        }
    }
}
