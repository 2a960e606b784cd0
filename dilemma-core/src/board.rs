//! Toroidal board geometry with integer coordinates

use serde::{Deserialize, Serialize};

/// Grid position. Plain integer coordinates; wraparound is applied by the
/// surface at the point of grid indexing, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position displaced by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// The 9 offsets forming the Moore neighbourhood of a position, the
/// position itself included. Consumers that want the 8 proper neighbours
/// filter the cell itself out after grid lookup.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0), (0,  0), (1,  0),
    (-1,  1), (0,  1), (1,  1),
];
