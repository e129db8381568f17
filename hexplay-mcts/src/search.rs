//! MCTS Search Loop
//!
//! Implements the core MCTS algorithm on the live position:
//! 1. Selection - Use UCB1 to traverse tree, applying each move
//! 2. Expansion - Add child node for one untried move
//! 3. Simulation - Random rollout to a terminal state
//! 4. Backpropagation - Update statistics, then undo the whole path
//!
//! ## Architecture
//! - Level 2: Search loop coordination
//! - Level 3: Individual MCTS phases

use crate::rollout::random_rollout;
use crate::tree::{MctsTree, NodeId};
use crate::MctsConfig;
use hexplay_core::{Move, Player, Rules};
use rand::Rng;
use std::time::{Duration, Instant};

// ============================================================================
// SEARCH REPORT
// ============================================================================

/// Summary of one search call
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    /// Iterations run by this call
    pub simulations: u32,
    /// Root visits, including those inherited from earlier turns
    pub root_visits: u32,
    /// Wall-clock time spent
    pub elapsed: Duration,
    /// Nodes in the tree after the search
    pub tree_size: usize,
}

// ============================================================================
// SEARCH LOOP (Level 2 - Main Coordination)
// ============================================================================

/// Grow `tree` from the position in `game`, which must match its root.
///
/// With a time limit the loop polls the clock between iterations, never
/// inside one; otherwise it runs `config.iterations` iterations. At least
/// one iteration always runs.
pub fn run_search<G: Rules, R: Rng>(
    tree: &mut MctsTree,
    game: &mut G,
    config: &MctsConfig,
    rng: &mut R,
) -> SearchReport {
    debug_assert_eq!(
        tree.root_fingerprint(),
        game.fingerprint(),
        "search tree does not match the live position"
    );

    let start = Instant::now();
    let mut simulations = 0u32;

    loop {
        run_single_iteration(tree, game, config.exploration, rng);
        simulations += 1;

        let done = match config.time_limit {
            Some(limit) => start.elapsed() >= limit,
            None => simulations >= config.iterations,
        };
        if done {
            break;
        }
    }

    let report = SearchReport {
        simulations,
        root_visits: tree.total_simulations(),
        elapsed: start.elapsed(),
        tree_size: tree.len(),
    };

    tracing::debug!(
        simulations = report.simulations,
        root_visits = report.root_visits,
        tree_size = report.tree_size,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "mcts search finished"
    );

    report
}

// ============================================================================
// SINGLE ITERATION (Level 3 - MCTS Phases)
// ============================================================================

/// Single MCTS iteration; `game` is back at the root position on return
fn run_single_iteration<G: Rules, R: Rng>(
    tree: &mut MctsTree,
    game: &mut G,
    exploration: f32,
    rng: &mut R,
) {
    let mut path: Vec<Move> = Vec::new();

    // Phase 1: Selection
    let mut node_id = select_leaf(tree, game, exploration, &mut path);

    // Phase 2: Expansion (if not terminal)
    if let Some((mv, child_id)) = tree.expand(node_id, game) {
        path.push(mv);
        node_id = child_id;
    }

    // Phase 3: Simulation
    let winner = simulate_node(tree, node_id, game, rng);

    for &mv in path.iter().rev() {
        game.undo(mv);
    }

    // Phase 4: Backpropagation
    tree.backpropagate(node_id, winner);
}

/// Descend through fully expanded nodes, applying each chosen move
fn select_leaf<G: Rules>(
    tree: &MctsTree,
    game: &mut G,
    exploration: f32,
    path: &mut Vec<Move>,
) -> NodeId {
    let mut current = tree.root();

    while tree.get(current).is_fully_expanded() && !tree.get(current).terminal {
        let Some((mv, child)) = tree.select_child(current, exploration) else {
            break;
        };
        game.apply(mv);
        path.push(mv);
        debug_assert_eq!(
            tree.get(child).fingerprint,
            game.fingerprint(),
            "replayed path diverged from the tree"
        );
        current = child;
    }

    current
}

/// Winner of a terminal node, or of a random rollout from it
fn simulate_node<G: Rules, R: Rng>(tree: &MctsTree, node_id: NodeId, game: &mut G, rng: &mut R) -> Player {
    if tree.get(node_id).terminal {
        game.winner()
    } else {
        random_rollout(game, rng).winner
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexplay_core::{GameKind, GameState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_run_search_basic() {
        let mut game = GameState::new(GameKind::Dodo, 4, Player::Red).unwrap();
        let before = game.clone();
        let mut tree = MctsTree::new(&game);
        let config = MctsConfig::default().with_iterations(50);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = run_search(&mut tree, &mut game, &config, &mut rng);

        assert_eq!(report.simulations, 50);
        assert_eq!(report.root_visits, 50);
        assert_eq!(report.tree_size, 51);
        assert_eq!(game, before);
    }

    #[test]
    fn test_run_search_accumulates() {
        let mut game = GameState::new(GameKind::Gopher, 3, Player::Red).unwrap();
        let mut tree = MctsTree::new(&game);
        let config = MctsConfig::default().with_iterations(20);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        run_search(&mut tree, &mut game, &config, &mut rng);
        let report = run_search(&mut tree, &mut game, &config, &mut rng);

        assert_eq!(report.simulations, 20);
        assert_eq!(report.root_visits, 40);
    }

    #[test]
    fn test_time_limited_search() {
        let mut game = GameState::new(GameKind::Dodo, 4, Player::Blue).unwrap();
        let mut tree = MctsTree::new(&game);
        let config = MctsConfig::default().with_time_limit(Duration::from_millis(20));
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let report = run_search(&mut tree, &mut game, &config, &mut rng);

        assert!(report.simulations >= 1);
        assert!(report.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_terminal_children_are_scored_directly() {
        // Gopher size 1: the only opening move ends the game
        let mut game = GameState::new(GameKind::Gopher, 1, Player::Red).unwrap();
        let mut tree = MctsTree::new(&game);
        let config = MctsConfig::default().with_iterations(5);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        run_search(&mut tree, &mut game, &config, &mut rng);

        let stats = tree.move_statistics();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].visits, 5);
        assert_eq!(stats[0].q, 5);
    }
}
