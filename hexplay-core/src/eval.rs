//! Terminal scores and static position evaluation

use crate::board::Player;
use crate::dodo::Dodo;
use crate::game::{Move, Rules};
use crate::gopher::Gopher;
use serde::{Deserialize, Serialize};

/// Score of a won game, from Red's point of view
pub const WIN_SCORE: i32 = 100;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Weight for the mover's legal move count
    pub mobility_weight: f32,
    /// Weight for average forward progress (Dodo only)
    pub progress_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            mobility_weight: 1.0,
            progress_weight: 0.1,
        }
    }
}

/// Dodo evaluation from Red's point of view.
///
/// The goal is to run out of moves, so fewer legal moves for the mover is
/// better for the mover. Advanced pieces get blocked sooner, so forward
/// progress counts in the player's favour.
pub fn dodo_evaluation(game: &Dodo, legal: &[Move], heuristics: &Heuristics) -> f32 {
    let mobility = legal.len() as f32;
    let mobility_term = match game.current_player() {
        Player::Red => -mobility,
        Player::Blue => mobility,
    };

    let progress_term = if heuristics.progress_weight != 0.0 {
        average_progress(game, Player::Red) - average_progress(game, Player::Blue)
    } else {
        0.0
    };

    heuristics.mobility_weight * mobility_term + heuristics.progress_weight * progress_term
}

/// Gopher evaluation from Red's point of view: mobility of the mover
pub fn gopher_evaluation(game: &Gopher, legal: &[Move], heuristics: &Heuristics) -> f32 {
    let mobility = legal.len() as f32;
    let mobility_term = match game.current_player() {
        Player::Red => mobility,
        Player::Blue => -mobility,
    };
    heuristics.mobility_weight * mobility_term
}

/// Mean rank advanced towards the enemy side.
///
/// Summed as integers so the result does not depend on piece-list order.
fn average_progress(game: &Dodo, player: Player) -> f32 {
    let pieces = game.pieces(player);
    if pieces.is_empty() {
        return 0.0;
    }
    let total: i32 = pieces
        .iter()
        .map(|cell| match player {
            Player::Red => cell.rank(),
            Player::Blue => -cell.rank(),
        })
        .sum();
    total as f32 / pieces.len() as f32
}
