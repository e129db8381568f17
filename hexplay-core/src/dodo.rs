//! Dodo: pieces slide forward, the player left without a move wins

use crate::board::{Board, NeighborTable, Occupant, Player};
use crate::error::ConfigError;
use crate::eval::{dodo_evaluation, Heuristics, WIN_SCORE};
use crate::game::{Move, Rules};
use crate::hex::{Cell, BLUE_FORWARD, RED_FORWARD};

/// Dodo position with per-player piece lists and forward tables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dodo {
    board: Board,
    to_move: Player,
    /// Piece lists indexed by `Player::index`; a move rewrites its slot in place
    pieces: [Vec<Cell>; 2],
    /// Forward neighbour tables indexed by `Player::index`
    forward: [NeighborTable; 2],
    turn: u32,
}

impl Dodo {
    /// Standard starting position
    pub fn new(hex_size: i32, first_player: Player) -> Result<Self, ConfigError> {
        Ok(Self::from_board(Board::dodo_start(hex_size)?, first_player))
    }

    /// Position from an arbitrary occupancy
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let pieces = [
            board.pieces(Player::Red).collect(),
            board.pieces(Player::Blue).collect(),
        ];
        let forward = [
            NeighborTable::build(&board, &RED_FORWARD),
            NeighborTable::build(&board, &BLUE_FORWARD),
        ];

        Self {
            board,
            to_move,
            pieces,
            forward,
            turn: 0,
        }
    }

    pub fn pieces(&self, player: Player) -> &[Cell] {
        &self.pieces[player.index()]
    }

    /// Forward cells of `cell` for `player` that exist on the board
    pub fn forward(&self, player: Player, cell: Cell) -> &[Cell] {
        self.forward[player.index()].get(cell)
    }

    /// Replace `from` with `to` in the piece list of `player`
    fn relocate(&mut self, player: Player, from: Cell, to: Cell) {
        let list = &mut self.pieces[player.index()];
        match list.iter().position(|&c| c == from) {
            Some(slot) => list[slot] = to,
            None => debug_assert!(false, "{:?} has no piece on {}", player, from),
        }
    }
}

fn step(mv: Move) -> (Cell, Cell) {
    match mv {
        Move::Step { from, to } => (from, to),
        Move::Place(cell) => panic!("Dodo cannot place a stone on {}", cell),
    }
}

impl Rules for Dodo {
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
        let player = self.to_move;
        let mut moves = Vec::new();

        for &from in self.pieces(player) {
            for &to in self.forward(player, from) {
                if self.board.get(to).is_empty() {
                    moves.push(Move::Step { from, to });
                }
            }
        }

        moves
    }

    fn apply(&mut self, mv: Move) {
        let (from, to) = step(mv);
        let player = self.to_move;

        self.board.set(from, Occupant::Empty);
        self.board.set(to, Occupant::Occupied(player));
        self.relocate(player, from, to);

        self.to_move = player.opponent();
        self.turn += 1;
    }

    fn undo(&mut self, mv: Move) {
        let (from, to) = step(mv);
        let player = self.to_move.opponent();

        self.board.set(to, Occupant::Empty);
        self.board.set(from, Occupant::Occupied(player));
        self.relocate(player, to, from);

        self.to_move = player;
        self.turn -= 1;
    }

    /// Misère: the blocked player wins
    fn winner(&self) -> Player {
        self.to_move
    }

    fn score(&self) -> i32 {
        match self.winner() {
            Player::Red => WIN_SCORE,
            Player::Blue => -WIN_SCORE,
        }
    }

    fn heuristic_evaluation(&self, legal: &[Move], heuristics: &Heuristics) -> f32 {
        dodo_evaluation(self, legal, heuristics)
    }
}
