//! Board model: cell occupancy over a hexagonal region plus adjacency tables

use crate::error::ConfigError;
use crate::hex::Cell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// PLAYERS AND OCCUPANTS
// ============================================================================

/// Player color. Red is the maximizing side of every search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Parse the protocol token (1 = red, 2 = blue)
    pub fn from_token(token: i64) -> Result<Self, ConfigError> {
        match token {
            1 => Ok(Player::Red),
            2 => Ok(Player::Blue),
            other => Err(ConfigError::InvalidPlayer(other)),
        }
    }

    pub fn token(self) -> u8 {
        match self {
            Player::Red => 1,
            Player::Blue => 2,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Content of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    Occupied(Player),
}

impl Occupant {
    /// Parse the protocol token (0 = empty, 1 = red, 2 = blue)
    pub fn from_token(token: i64) -> Result<Self, ConfigError> {
        match token {
            0 => Ok(Occupant::Empty),
            1 | 2 => Player::from_token(token).map(Occupant::Occupied),
            other => Err(ConfigError::InvalidOccupant(other)),
        }
    }

    pub fn token(self) -> u8 {
        match self {
            Occupant::Empty => 0,
            Occupant::Occupied(player) => player.token(),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Occupant::Empty => None,
            Occupant::Occupied(player) => Some(player),
        }
    }
}

impl From<Player> for Occupant {
    fn from(player: Player) -> Self {
        Occupant::Occupied(player)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Occupancy of every cell of a hexagonal board.
///
/// The key set is fixed at construction; only occupants change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    hex_size: i32,
    /// Cells in construction order (rows from top to bottom)
    cells: Vec<Cell>,
    occupants: FxHashMap<Cell, Occupant>,
}

impl Board {
    /// Empty board whose cells lie within `hex_size - 1` of the origin
    pub fn new(hex_size: i32) -> Result<Self, ConfigError> {
        if hex_size < 1 {
            return Err(ConfigError::InvalidSize(hex_size));
        }

        let n = hex_size - 1;
        let mut cells = Vec::with_capacity(cell_count(hex_size));
        for y in (-n..=n).rev() {
            for x in (-n).max(y - n)..=n.min(y + n) {
                cells.push(Cell::from_offset(x, y));
            }
        }

        let occupants = cells.iter().map(|&cell| (cell, Occupant::Empty)).collect();

        Ok(Self {
            hex_size,
            cells,
            occupants,
        })
    }

    /// Dodo start: each army fills its corner triangle, the middle band is empty
    pub fn dodo_start(hex_size: i32) -> Result<Self, ConfigError> {
        let mut board = Self::new(hex_size)?;
        let n = hex_size - 1;

        for i in 0..board.cells.len() {
            let cell = board.cells[i];
            let (x, y) = cell.to_offset();
            if -x > y + (n - 2) {
                board.set(cell, Occupant::Occupied(Player::Red));
            } else if y > -x + (n - 2) {
                board.set(cell, Occupant::Occupied(Player::Blue));
            }
        }

        Ok(board)
    }

    pub fn hex_size(&self) -> i32 {
        self.hex_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.occupants.contains_key(&cell)
    }

    /// All cells, in construction order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Occupant of a cell. The cell must be on the board.
    pub fn get(&self, cell: Cell) -> Occupant {
        self.occupants[&cell]
    }

    /// Overwrite the occupant of a cell that is on the board
    pub fn set(&mut self, cell: Cell, occupant: Occupant) {
        debug_assert!(self.contains(cell), "cell {} is not on the board", cell);
        if let Some(slot) = self.occupants.get_mut(&cell) {
            *slot = occupant;
        }
    }

    /// Cells held by `player`, in board order
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .copied()
            .filter(move |&cell| self.get(cell) == Occupant::Occupied(player))
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces(player).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupants.values().filter(|o| !o.is_empty()).count()
    }

    /// Canonical occupancy snapshot in board order
    pub fn snapshot(&self) -> Box<[Occupant]> {
        self.cells.iter().map(|&cell| self.get(cell)).collect()
    }
}

/// Number of cells on a board of the given size: `3h² - 3h + 1`
pub fn cell_count(hex_size: i32) -> usize {
    let h = hex_size.max(0) as usize;
    if h == 0 {
        return 0;
    }
    3 * h * h - 3 * h + 1
}

// ============================================================================
// NEIGHBOR TABLES
// ============================================================================

/// For every cell, the on-board cells reached by a fixed set of vectors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborTable {
    map: FxHashMap<Cell, Vec<Cell>>,
}

impl NeighborTable {
    pub fn build(board: &Board, directions: &[Cell]) -> Self {
        let map = board
            .cells()
            .iter()
            .map(|&cell| {
                let neighbors = directions
                    .iter()
                    .map(|&dir| cell + dir)
                    .filter(|&n| board.contains(n))
                    .collect();
                (cell, neighbors)
            })
            .collect();
        Self { map }
    }

    /// Neighbours of an on-board cell
    pub fn get(&self, cell: Cell) -> &[Cell] {
        self.map.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }
}
