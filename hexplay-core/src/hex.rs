//! Hex grid geometry with cube coordinates

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

/// Cube hex coordinates, `q + r + s == 0`
///
/// Equality, ordering and hashing only look at `(q, r)`: `s` is derived.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Cell {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell::new(0, 0);

    /// Build a cell from its two free axes
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Convert a doubled/offset pair `(x, y)` to cube coordinates.
    ///
    /// This is the convention of the game server: neighbours of `(x, y)` are
    /// `(x±1, y)`, `(x, y±1)`, `(x+1, y+1)` and `(x-1, y-1)`.
    pub const fn from_offset(x: i32, y: i32) -> Self {
        Self { q: x, r: -y, s: y - x }
    }

    /// Inverse of [`Cell::from_offset`]
    pub const fn to_offset(self) -> (i32, i32) {
        (self.q, -self.r)
    }

    /// Distance from the origin
    pub fn distance_to_center(&self) -> i32 {
        (self.q.abs() + self.r.abs() + self.s.abs()) / 2
    }

    /// Distance between two cells
    pub fn distance_to(&self, other: Cell) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s - other.s).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbour in direction (0-5), see [`DIRECTIONS`]
    pub fn neighbor(&self, direction: usize) -> Cell {
        *self + DIRECTIONS[direction % 6]
    }

    /// Rank along the axis both Dodo armies advance on: `x + y` in offset terms
    pub fn rank(&self) -> i32 {
        let (x, y) = self.to_offset();
        x + y
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.q == other.q && self.r == other.r
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.q.hash(state);
        self.r.hash(state);
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.q, self.r).cmp(&(other.q, other.r))
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.to_offset();
        write!(f, "({}, {})", x, y)
    }
}

/// The six unit vectors, written in offset terms
/// Index: 0=W, 1=SW, 2=S, 3=N, 4=NE, 5=E
pub const DIRECTIONS: [Cell; 6] = [
    Cell::from_offset(-1, 0),
    Cell::from_offset(-1, -1),
    Cell::from_offset(0, -1),
    Cell::from_offset(0, 1),
    Cell::from_offset(1, 1),
    Cell::from_offset(1, 0),
];

/// Dodo forward vectors for Red (towards growing rank)
pub const RED_FORWARD: [Cell; 3] = [DIRECTIONS[3], DIRECTIONS[4], DIRECTIONS[5]];

/// Dodo forward vectors for Blue (towards shrinking rank)
pub const BLUE_FORWARD: [Cell; 3] = [DIRECTIONS[0], DIRECTIONS[1], DIRECTIONS[2]];
