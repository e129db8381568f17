//! Translation between engine values and the game server's conventions
//!
//! The server addresses cells with offset pairs `(x, y)` and reports the
//! whole board after every opponent move; the engine needs a `Move`.

use crate::board::{Occupant, Player};
use crate::error::ConfigError;
use crate::game::{Move, Rules};
use crate::hex::Cell;
use serde::{Deserialize, Serialize};

/// A cell in server coordinates
pub type ExternalCell = (i32, i32);

/// A board as reported by the server: every cell with its occupant token
pub type ObservedBoard = Vec<(ExternalCell, i64)>;

/// A move in server coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalMove {
    Place(ExternalCell),
    Step(ExternalCell, ExternalCell),
}

impl Move {
    pub fn to_external(self) -> ExternalMove {
        match self {
            Move::Place(cell) => ExternalMove::Place(cell.to_offset()),
            Move::Step { from, to } => ExternalMove::Step(from.to_offset(), to.to_offset()),
        }
    }

    pub fn from_external(mv: ExternalMove) -> Self {
        match mv {
            ExternalMove::Place((x, y)) => Move::Place(Cell::from_offset(x, y)),
            ExternalMove::Step((fx, fy), (tx, ty)) => Move::Step {
                from: Cell::from_offset(fx, fy),
                to: Cell::from_offset(tx, ty),
            },
        }
    }
}

/// Decode a server board into occupied cells
pub fn decode_board(observed: &[(ExternalCell, i64)]) -> Result<Vec<(Cell, Player)>, ConfigError> {
    let mut occupied = Vec::new();
    for &((x, y), token) in observed {
        if let Some(player) = Occupant::from_token(token)?.player() {
            occupied.push((Cell::from_offset(x, y), player));
        }
    }
    Ok(occupied)
}

/// Work out which move turned the local position into the observed one.
///
/// Returns `None` when the difference is not exactly one legal move for
/// the player to move; nothing should be applied in that case.
pub fn infer_opponent_move<G: Rules>(game: &G, observed: &[(ExternalCell, i64)]) -> Option<Move> {
    let board = game.board();
    let mover = game.current_player();
    let mut appeared = Vec::new();
    let mut vanished = Vec::new();

    for &((x, y), token) in observed {
        let cell = Cell::from_offset(x, y);
        if !board.contains(cell) {
            tracing::warn!(%cell, "observed cell is not on the board");
            return None;
        }
        let seen = match Occupant::from_token(token) {
            Ok(occupant) => occupant,
            Err(e) => {
                tracing::warn!(%cell, "unreadable observed cell: {}", e);
                return None;
            }
        };
        match (board.get(cell), seen) {
            (local, seen) if local == seen => {}
            (Occupant::Empty, Occupant::Occupied(p)) if p == mover => appeared.push(cell),
            (Occupant::Occupied(p), Occupant::Empty) if p == mover => vanished.push(cell),
            (local, seen) => {
                tracing::warn!(%cell, ?local, ?seen, ?mover, "observed change was not made by the mover");
                return None;
            }
        }
    }

    let inferred = match (appeared.as_slice(), vanished.as_slice()) {
        ([cell], []) => Move::Place(*cell),
        ([to], [from]) => Move::Step {
            from: *from,
            to: *to,
        },
        _ => {
            tracing::warn!(
                appeared = appeared.len(),
                vanished = vanished.len(),
                "observed board is not one move away"
            );
            return None;
        }
    };

    if game.legal_moves().contains(&inferred) {
        Some(inferred)
    } else {
        tracing::warn!(mv = %inferred, "inferred move is not legal here");
        None
    }
}
