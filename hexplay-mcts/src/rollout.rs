//! Random rollouts
//!
//! A rollout plays uniformly random legal moves on the live position until
//! the game ends, reads the winner, then undoes every move it made. The
//! boards are finite and each move fills (Gopher) or advances (Dodo) the
//! position, so rollouts always terminate.

use hexplay_core::{Player, Rules};
use rand::Rng;

/// Result of a rollout simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RolloutResult {
    /// Winner of the terminal position reached
    pub winner: Player,
    /// Number of moves played
    pub moves_played: u32,
}

/// Play random moves to the end of the game and restore the position
pub fn random_rollout<G: Rules, R: Rng>(game: &mut G, rng: &mut R) -> RolloutResult {
    let mut played = Vec::new();

    loop {
        let legal_moves = game.legal_moves();
        if legal_moves.is_empty() {
            break;
        }
        let mv = legal_moves[rng.gen_range(0..legal_moves.len())];
        game.apply(mv);
        played.push(mv);
    }

    let winner = game.winner();
    for &mv in played.iter().rev() {
        game.undo(mv);
    }

    RolloutResult {
        winner,
        moves_played: played.len() as u32,
    }
}
