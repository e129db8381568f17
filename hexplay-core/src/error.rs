//! Configuration errors

use crate::hex::Cell;

/// Invalid game setup, raised before any search runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid player token {0}: expected 1 (red) or 2 (blue)")]
    InvalidPlayer(i64),

    #[error("Invalid occupant token {0}: expected 0, 1 or 2")]
    InvalidOccupant(i64),

    #[error("Invalid board size {0}: must be at least 1")]
    InvalidSize(i32),

    #[error("Unknown game variant {0:?}: expected \"dodo\" or \"gopher\"")]
    UnknownGame(String),

    #[error("Cell {cell} is outside a board of size {hex_size}")]
    CellOffBoard { cell: Cell, hex_size: i32 },
}
