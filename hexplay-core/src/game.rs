//! Game state, moves and the rule contract shared by both variants

use crate::board::{Board, Occupant, Player};
use crate::dodo::Dodo;
use crate::error::ConfigError;
use crate::eval::Heuristics;
use crate::gopher::{Gopher, GopherOpening};
use crate::hex::Cell;
use rand::Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Dodo,
    Gopher,
}

impl FromStr for GameKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dodo" => Ok(GameKind::Dodo),
            "gopher" => Ok(GameKind::Gopher),
            _ => Err(ConfigError::UnknownGame(s.to_string())),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Dodo => write!(f, "dodo"),
            GameKind::Gopher => write!(f, "gopher"),
        }
    }
}

/// A legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Gopher: put a stone on an empty cell
    Place(Cell),
    /// Dodo: slide a piece to a forward neighbour
    Step { from: Cell, to: Cell },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(cell) => write!(f, "{}", cell),
            Move::Step { from, to } => write!(f, "{} -> {}", from, to),
        }
    }
}

// ============================================================================
// RULE CONTRACT
// ============================================================================

/// Turn-taking, legality and scoring over a mutable board.
///
/// `apply` performs no legality check: moves must come from `legal_moves`.
/// `undo` is only valid as the inverse of the most recent `apply`.
pub trait Rules {
    fn board(&self) -> &Board;

    fn current_player(&self) -> Player;

    /// Number of moves applied since the starting position
    fn turn(&self) -> u32;

    fn legal_moves(&self) -> Vec<Move>;

    fn apply(&mut self, mv: Move);

    fn undo(&mut self, mv: Move);

    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }

    /// Winner of a terminal position
    fn winner(&self) -> Player;

    /// `+WIN_SCORE` when Red wins, `-WIN_SCORE` when Blue wins.
    /// Only meaningful on a terminal position.
    fn score(&self) -> i32;

    /// Static estimate from Red's point of view, given the current legal moves
    fn heuristic_evaluation(&self, legal: &[Move], heuristics: &Heuristics) -> f32;

    /// Hash of the player to move and the occupancy, in board order
    fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.current_player().hash(&mut hasher);
        let board = self.board();
        for &cell in board.cells() {
            board.get(cell).hash(&mut hasher);
        }
        hasher.finish()
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// The live position of either variant
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Dodo(Dodo),
    Gopher(Gopher),
}

impl GameState {
    /// Standard starting position
    pub fn new(kind: GameKind, hex_size: i32, first_player: Player) -> Result<Self, ConfigError> {
        match kind {
            GameKind::Dodo => Ok(GameState::Dodo(Dodo::new(hex_size, first_player)?)),
            GameKind::Gopher => Ok(GameState::Gopher(Gopher::new(hex_size, first_player)?)),
        }
    }

    /// Position with an arbitrary occupancy, e.g. synchronised from a server
    pub fn from_position(
        kind: GameKind,
        hex_size: i32,
        to_move: Player,
        occupied: &[(Cell, Player)],
    ) -> Result<Self, ConfigError> {
        let mut board = Board::new(hex_size)?;
        for &(cell, player) in occupied {
            if !board.contains(cell) {
                return Err(ConfigError::CellOffBoard { cell, hex_size });
            }
            board.set(cell, Occupant::Occupied(player));
        }

        Ok(match kind {
            GameKind::Dodo => GameState::Dodo(Dodo::from_board(board, to_move)),
            GameKind::Gopher => GameState::Gopher(Gopher::from_board(board, to_move)),
        })
    }

    /// Set the Gopher opening rule (no effect on Dodo)
    pub fn with_opening(self, opening: GopherOpening) -> Result<Self, ConfigError> {
        match self {
            GameState::Gopher(gopher) => Ok(GameState::Gopher(gopher.with_opening(opening)?)),
            other => Ok(other),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameState::Dodo(_) => GameKind::Dodo,
            GameState::Gopher(_) => GameKind::Gopher,
        }
    }

    pub fn hex_size(&self) -> i32 {
        self.board().hex_size()
    }
}

impl Rules for GameState {
    fn board(&self) -> &Board {
        match self {
            GameState::Dodo(g) => g.board(),
            GameState::Gopher(g) => g.board(),
        }
    }

    fn current_player(&self) -> Player {
        match self {
            GameState::Dodo(g) => g.current_player(),
            GameState::Gopher(g) => g.current_player(),
        }
    }

    fn turn(&self) -> u32 {
        match self {
            GameState::Dodo(g) => g.turn(),
            GameState::Gopher(g) => g.turn(),
        }
    }

    fn legal_moves(&self) -> Vec<Move> {
        match self {
            GameState::Dodo(g) => g.legal_moves(),
            GameState::Gopher(g) => g.legal_moves(),
        }
    }

    fn apply(&mut self, mv: Move) {
        match self {
            GameState::Dodo(g) => g.apply(mv),
            GameState::Gopher(g) => g.apply(mv),
        }
    }

    fn undo(&mut self, mv: Move) {
        match self {
            GameState::Dodo(g) => g.undo(mv),
            GameState::Gopher(g) => g.undo(mv),
        }
    }

    fn is_terminal(&self) -> bool {
        match self {
            GameState::Dodo(g) => g.is_terminal(),
            GameState::Gopher(g) => g.is_terminal(),
        }
    }

    fn winner(&self) -> Player {
        match self {
            GameState::Dodo(g) => g.winner(),
            GameState::Gopher(g) => g.winner(),
        }
    }

    fn score(&self) -> i32 {
        match self {
            GameState::Dodo(g) => g.score(),
            GameState::Gopher(g) => g.score(),
        }
    }

    fn heuristic_evaluation(&self, legal: &[Move], heuristics: &Heuristics) -> f32 {
        match self {
            GameState::Dodo(g) => g.heuristic_evaluation(legal, heuristics),
            GameState::Gopher(g) => g.heuristic_evaluation(legal, heuristics),
        }
    }
}

// ============================================================================
// RANDOM STRATEGY
// ============================================================================

/// Uniformly random legal move. Panics on a terminal position.
pub fn random_move<G: Rules, R: Rng>(game: &G, rng: &mut R) -> Move {
    let moves = game.legal_moves();
    assert!(!moves.is_empty(), "random_move called on a terminal position");
    moves[rng.gen_range(0..moves.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_game_kind_parsing() {
        assert_eq!("dodo".parse::<GameKind>(), Ok(GameKind::Dodo));
        assert_eq!("Gopher".parse::<GameKind>(), Ok(GameKind::Gopher));
        assert_eq!(
            "chess".parse::<GameKind>(),
            Err(ConfigError::UnknownGame("chess".to_string()))
        );
    }

    #[test]
    fn test_new_rejects_bad_size() {
        assert_eq!(
            GameState::new(GameKind::Gopher, 0, Player::Red),
            Err(ConfigError::InvalidSize(0))
        );
    }

    #[test]
    fn test_from_position_rejects_off_board_cell() {
        let cell = Cell::from_offset(5, 0);
        let result = GameState::from_position(GameKind::Dodo, 3, Player::Red, &[(cell, Player::Red)]);
        assert_eq!(result, Err(ConfigError::CellOffBoard { cell, hex_size: 3 }));
    }

    #[test]
    fn test_fingerprint_tracks_position() {
        let mut game = GameState::new(GameKind::Dodo, 4, Player::Red).unwrap();
        let before = game.fingerprint();
        let mv = game.legal_moves()[0];
        game.apply(mv);
        assert_ne!(game.fingerprint(), before);
        game.undo(mv);
        assert_eq!(game.fingerprint(), before);
    }

    #[test]
    fn test_random_move_is_legal() {
        let game = GameState::new(GameKind::Dodo, 4, Player::Blue).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mv = random_move(&game, &mut rng);
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    #[should_panic(expected = "terminal position")]
    fn test_random_move_panics_when_terminal() {
        // Dodo size 2: Red is blocked from the start
        let game = GameState::new(GameKind::Dodo, 2, Player::Red).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        random_move(&game, &mut rng);
    }
}
