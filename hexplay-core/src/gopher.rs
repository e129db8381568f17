//! Gopher: stones connect to exactly one enemy, the player left without a move loses

use crate::board::{Board, NeighborTable, Occupant, Player};
use crate::error::ConfigError;
use crate::eval::{gopher_evaluation, Heuristics, WIN_SCORE};
use crate::game::{Move, Rules};
use crate::hex::{Cell, DIRECTIONS};
use serde::{Deserialize, Serialize};

/// Where the first stone of the game may go
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GopherOpening {
    /// Any cell of the empty board
    #[default]
    Anywhere,
    /// A single imposed cell
    Fixed(Cell),
}

/// Gopher position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gopher {
    board: Board,
    to_move: Player,
    /// Stones of each player in placement order, indexed by `Player::index`
    pieces: [Vec<Cell>; 2],
    neighbors: NeighborTable,
    opening: GopherOpening,
    turn: u32,
}

impl Gopher {
    /// Empty board
    pub fn new(hex_size: i32, first_player: Player) -> Result<Self, ConfigError> {
        Ok(Self::from_board(Board::new(hex_size)?, first_player))
    }

    /// Position from an arbitrary occupancy
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let pieces = [
            board.pieces(Player::Red).collect(),
            board.pieces(Player::Blue).collect(),
        ];
        let neighbors = NeighborTable::build(&board, &DIRECTIONS);

        Self {
            board,
            to_move,
            pieces,
            neighbors,
            opening: GopherOpening::Anywhere,
            turn: 0,
        }
    }

    /// Set the opening rule; a fixed cell must lie on the board
    pub fn with_opening(mut self, opening: GopherOpening) -> Result<Self, ConfigError> {
        if let GopherOpening::Fixed(cell) = opening {
            if !self.board.contains(cell) {
                return Err(ConfigError::CellOffBoard {
                    cell,
                    hex_size: self.board.hex_size(),
                });
            }
        }
        self.opening = opening;
        Ok(self)
    }

    pub fn opening(&self) -> GopherOpening {
        self.opening
    }

    pub fn pieces(&self, player: Player) -> &[Cell] {
        &self.pieces[player.index()]
    }

    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.neighbors.get(cell)
    }

    fn is_opening(&self) -> bool {
        self.pieces.iter().all(Vec::is_empty)
    }

    /// Exactly one enemy neighbour and no friendly one
    fn is_connection(&self, cell: Cell, player: Player) -> bool {
        let mut enemy = 0;
        for &n in self.neighbors(cell) {
            match self.board.get(n) {
                Occupant::Occupied(p) if p == player => return false,
                Occupant::Occupied(_) => enemy += 1,
                Occupant::Empty => {}
            }
        }
        enemy == 1
    }

    fn opening_moves(&self) -> Vec<Move> {
        match self.opening {
            GopherOpening::Anywhere => self.board.cells().iter().map(|&c| Move::Place(c)).collect(),
            GopherOpening::Fixed(cell) => vec![Move::Place(cell)],
        }
    }
}

fn placement(mv: Move) -> Cell {
    match mv {
        Move::Place(cell) => cell,
        Move::Step { from, to } => panic!("Gopher cannot step from {} to {}", from, to),
    }
}

impl Rules for Gopher {
    fn board(&self) -> &Board {
        &self.board
    }

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.is_opening() {
            return self.opening_moves();
        }

        let player = self.to_move;
        let mut moves = Vec::new();

        // A legal cell touches exactly one enemy stone, so each one is
        // reached from a single enemy and never listed twice.
        for &enemy in self.pieces(player.opponent()) {
            for &cell in self.neighbors(enemy) {
                if self.board.get(cell).is_empty() && self.is_connection(cell, player) {
                    moves.push(Move::Place(cell));
                }
            }
        }

        moves
    }

    fn apply(&mut self, mv: Move) {
        let cell = placement(mv);
        let player = self.to_move;

        self.board.set(cell, Occupant::Occupied(player));
        self.pieces[player.index()].push(cell);

        self.to_move = player.opponent();
        self.turn += 1;
    }

    fn undo(&mut self, mv: Move) {
        let cell = placement(mv);
        let player = self.to_move.opponent();

        self.board.set(cell, Occupant::Empty);
        let popped = self.pieces[player.index()].pop();
        debug_assert_eq!(popped, Some(cell), "undo must mirror the last apply");

        self.to_move = player;
        self.turn -= 1;
    }

    /// Normal play: the blocked player loses
    fn winner(&self) -> Player {
        self.to_move.opponent()
    }

    fn score(&self) -> i32 {
        match self.winner() {
            Player::Red => WIN_SCORE,
            Player::Blue => -WIN_SCORE,
        }
    }

    fn heuristic_evaluation(&self, legal: &[Move], heuristics: &Heuristics) -> f32 {
        gopher_evaluation(self, legal, heuristics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_anywhere() {
        let game = Gopher::new(4, Player::Red).unwrap();
        assert_eq!(game.legal_moves().len(), 37);
    }

    #[test]
    fn test_opening_fixed() {
        let center = Cell::ORIGIN;
        let game = Gopher::new(4, Player::Red)
            .unwrap()
            .with_opening(GopherOpening::Fixed(center))
            .unwrap();
        assert_eq!(game.legal_moves(), vec![Move::Place(center)]);
    }

    #[test]
    fn test_opening_fixed_off_board() {
        let outside = Cell::from_offset(9, 9);
        let result = Gopher::new(3, Player::Red)
            .unwrap()
            .with_opening(GopherOpening::Fixed(outside));
        assert_eq!(
            result,
            Err(ConfigError::CellOffBoard { cell: outside, hex_size: 3 })
        );
    }

    #[test]
    fn test_reply_touches_one_enemy() {
        let mut game = Gopher::new(4, Player::Red).unwrap();
        game.apply(Move::Place(Cell::ORIGIN));

        let replies = game.legal_moves();
        assert_eq!(replies.len(), 6);
        for mv in replies {
            assert_eq!(placement(mv).distance_to(Cell::ORIGIN), 1);
        }
    }

    #[test]
    fn test_friendly_contact_is_illegal() {
        let mut game = Gopher::new(4, Player::Red).unwrap();
        game.apply(Move::Place(Cell::ORIGIN));
        game.apply(Move::Place(Cell::from_offset(1, 0)));

        // Red may not touch its own stone at the origin
        for mv in game.legal_moves() {
            let cell = placement(mv);
            assert!(!game.neighbors(cell).contains(&Cell::ORIGIN));
            assert!(game.neighbors(cell).contains(&Cell::from_offset(1, 0)));
        }
    }

    #[test]
    fn test_undo_restores_exactly() {
        let mut game = Gopher::new(3, Player::Blue).unwrap();
        game.apply(Move::Place(Cell::from_offset(1, 1)));
        let snapshot = game.clone();
        for mv in snapshot.legal_moves() {
            game.apply(mv);
            game.undo(mv);
            assert_eq!(game, snapshot);
        }
    }

    #[test]
    fn test_blocked_player_loses() {
        // Size 1: a single cell, the opening fills it and Blue is stuck
        let mut game = Gopher::new(1, Player::Red).unwrap();
        game.apply(Move::Place(Cell::ORIGIN));
        assert!(game.is_terminal());
        assert_eq!(game.winner(), Player::Red);
        assert_eq!(game.score(), WIN_SCORE);
    }
}
