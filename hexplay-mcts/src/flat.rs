//! Flat Monte Carlo: every root move gets an equal share of random rollouts

use crate::rollout::random_rollout;
use hexplay_core::{Move, Rules};
use rand::Rng;

/// Flat Monte Carlo player
#[derive(Clone, Debug)]
pub struct FlatMonteCarlo {
    /// Total rollout budget, split evenly across the root moves
    pub iterations: u32,
}

impl FlatMonteCarlo {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Rollouts run after each root move, rounded up
    fn share(&self, moves: usize) -> u32 {
        self.iterations.div_ceil(moves as u32).max(1)
    }

    /// Win rate of every root move for the player to move, in move order
    pub fn evaluate<G: Rules, R: Rng>(&self, game: &mut G, rng: &mut R) -> Vec<(Move, f32)> {
        let player = game.current_player();
        let moves = game.legal_moves();
        if moves.is_empty() {
            return Vec::new();
        }
        let share = self.share(moves.len());

        moves
            .into_iter()
            .map(|mv| {
                game.apply(mv);
                let wins = (0..share)
                    .filter(|_| random_rollout(game, rng).winner == player)
                    .count();
                game.undo(mv);
                (mv, wins as f32 / share as f32)
            })
            .collect()
    }

    /// Move with the best win rate; the first one wins ties.
    /// Panics on a terminal position.
    pub fn best_move<G: Rules, R: Rng>(&self, game: &mut G, rng: &mut R) -> Move {
        let moves = game.legal_moves();
        assert!(!moves.is_empty(), "Monte Carlo invoked on a terminal position");
        if let [only] = moves.as_slice() {
            return *only;
        }

        let mut best = moves[0];
        let mut best_rate = f32::NEG_INFINITY;
        for (mv, rate) in self.evaluate(game, rng) {
            if rate > best_rate {
                best = mv;
                best_rate = rate;
            }
        }

        tracing::debug!(mv = %best, win_rate = best_rate, "flat monte carlo finished");
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexplay_core::{Cell, GameKind, GameState, GopherOpening, Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_share_rounds_up() {
        let mc = FlatMonteCarlo::new(10);
        assert_eq!(mc.share(3), 4);
        assert_eq!(mc.share(10), 1);
        assert_eq!(FlatMonteCarlo::new(0).share(5), 1);
    }

    #[test]
    fn test_best_move_is_legal_and_restores() {
        let mut game = GameState::new(GameKind::Dodo, 4, Player::Blue).unwrap();
        let before = game.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let mv = FlatMonteCarlo::new(100).best_move(&mut game, &mut rng);

        assert!(game.legal_moves().contains(&mv));
        assert_eq!(game, before);
    }

    #[test]
    fn test_single_move_skips_sampling() {
        let mut game = GameState::new(GameKind::Gopher, 4, Player::Red)
            .unwrap()
            .with_opening(GopherOpening::Fixed(Cell::ORIGIN))
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let untouched = rng.clone();

        let mv = FlatMonteCarlo::new(1000).best_move(&mut game, &mut rng);

        assert_eq!(mv, Move::Place(Cell::ORIGIN));
        assert_eq!(rng, untouched);
    }

    #[test]
    fn test_avoids_losing_move() {
        // Gopher size 3 after Red (1, 2) and Blue (0, 1): (-1, 0) wins about
        // 1% of random playouts, the other two moves about half of them
        let mut game = GameState::from_position(
            GameKind::Gopher,
            3,
            Player::Red,
            &[
                (Cell::from_offset(1, 2), Player::Red),
                (Cell::from_offset(0, 1), Player::Blue),
            ],
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let rates = FlatMonteCarlo::new(600).evaluate(&mut game, &mut rng);
        assert_eq!(rates.len(), 3);
        let trap = Move::Place(Cell::from_offset(-1, 0));
        for &(mv, rate) in &rates {
            if mv == trap {
                assert!(rate < 0.15);
            } else {
                assert!(rate > 0.3);
            }
        }

        let mv = FlatMonteCarlo::new(600).best_move(&mut game, &mut rng);
        assert_ne!(mv, trap);
    }

    #[test]
    #[should_panic(expected = "terminal position")]
    fn test_best_move_panics_when_terminal() {
        let mut game = GameState::new(GameKind::Dodo, 2, Player::Red).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        FlatMonteCarlo::new(10).best_move(&mut game, &mut rng);
    }
}
