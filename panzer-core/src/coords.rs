//! Hex grid geometry: offset cells, axial math and facings
//!
//! The map is stored as rows and columns of flat-topped hexes with odd
//! columns shifted down half a hex ("odd-q"). Distances and neighbours are
//! computed in axial coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Facing angles in degrees (screen space, y grows downwards)
/// 0=N(270), 1=NE(330), 2=SE(30), 3=S(90), 4=SW(150), 5=NW(210)
const FACING_ANGLES: [f32; 6] = [270.0, 330.0, 30.0, 90.0, 150.0, 210.0];

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Direction a unit faces on the map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    N = 0,
    NE = 1,
    #[default]
    SE = 2,
    S = 3,
    SW = 4,
    NW = 5,
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::N,
        Facing::NE,
        Facing::SE,
        Facing::S,
        Facing::SW,
        Facing::NW,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Facing for a direction index (wraps modulo 6)
    pub fn from_index(index: usize) -> Facing {
        Facing::ALL[index % 6]
    }

    pub fn opposite(self) -> Facing {
        Facing::from_index(self.index() + 3)
    }

    /// Axial direction vector for this facing
    pub fn vector(self) -> (i32, i32) {
        DIRECTIONS[self.index()]
    }
}

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Axial) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }
}

/// A map position in offset (row, column) coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn to_axial(self) -> Axial {
        Axial::new(self.col, self.row - (self.col - (self.col & 1)) / 2)
    }

    pub fn from_axial(axial: Axial) -> Cell {
        Cell::new(axial.r + (axial.q - (axial.q & 1)) / 2, axial.q)
    }

    /// Neighbouring cell in the given direction (may lie off the map)
    pub fn neighbor(self, facing: Facing) -> Cell {
        let (dq, dr) = facing.vector();
        let a = self.to_axial();
        Cell::from_axial(Axial::new(a.q + dq, a.r + dr))
    }

    /// All six neighbours, N first, clockwise
    pub fn neighbors(self) -> [Cell; 6] {
        Facing::ALL.map(|f| self.neighbor(f))
    }

    /// Hex distance between two cells
    pub fn distance_to(self, other: Cell) -> i32 {
        self.to_axial().distance_to(other.to_axial())
    }

    /// Facing that best points from this cell towards `other`.
    ///
    /// Returns `None` when both cells are the same.
    pub fn direction_to(self, other: Cell) -> Option<Facing> {
        if self == other {
            return None;
        }
        let from = self.to_axial();
        let to = other.to_axial();
        let dq = (to.q - from.q) as f32;
        let dr = (to.r - from.r) as f32;

        // Axial to cartesian for flat-topped hexes
        let x = 1.5 * dq;
        let y = 0.8660254 * dq + 1.7320508 * dr;

        let mut angle = y.atan2(x).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }

        let mut best = Facing::N;
        let mut best_diff = f32::MAX;
        for facing in Facing::ALL {
            let mut diff = (angle - FACING_ANGLES[facing.index()]).abs();
            if diff > 180.0 {
                diff = 360.0 - diff;
            }
            if diff < best_diff {
                best_diff = diff;
                best = facing;
            }
        }
        Some(best)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axial_round_trip() {
        for row in -3..4 {
            for col in -3..4 {
                let cell = Cell::new(row, col);
                assert_eq!(Cell::from_axial(cell.to_axial()), cell);
            }
        }
    }

    #[test]
    fn test_row_cells_are_adjacent() {
        // Cells along one row zig-zag but stay adjacent
        assert_eq!(Cell::new(0, 0).distance_to(Cell::new(0, 1)), 1);
        assert_eq!(Cell::new(0, 1).distance_to(Cell::new(0, 2)), 1);
        assert_eq!(Cell::new(0, 0).distance_to(Cell::new(0, 2)), 2);
    }

    #[test]
    fn test_neighbors_at_distance_one() {
        let center = Cell::new(4, 5);
        for n in center.neighbors() {
            assert_eq!(center.distance_to(n), 1);
        }
    }

    #[test]
    fn test_direction_to_neighbors() {
        let center = Cell::new(4, 4);
        for facing in Facing::ALL {
            assert_eq!(center.direction_to(center.neighbor(facing)), Some(facing));
        }
        assert_eq!(center.direction_to(center), None);
    }

    #[test]
    fn test_facing_opposite() {
        assert_eq!(Facing::N.opposite(), Facing::S);
        assert_eq!(Facing::SW.opposite(), Facing::NE);
    }
}
