use std::fmt;

use serde::{Deserialize, Serialize};

/// Board radius. A cell is on the board iff `max(|q|, |r|, |s|) <= BOARD_RADIUS`,
/// which gives `3R² + 3R + 1 = 61` cells at radius 4.
pub const BOARD_RADIUS: i8 = 4;

/// Side length of the square array used to store the hex board,
/// indexed by `[q + BOARD_RADIUS][r + BOARD_RADIUS]`.
pub const BOARD_SIZE: usize = 2 * BOARD_RADIUS as usize + 1;

/// Axial hex coordinates. The third axis is implicit: `s = -q - r`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Cell {
    pub q: i8,
    pub r: i8,
}

impl Cell {
    pub fn new(q: i8, r: i8) -> Cell {
        Cell { q, r }
    }

    /// The redundant third axis coordinate.
    pub fn s(self) -> i8 {
        -self.q - self.r
    }

    pub fn is_valid(self) -> bool {
        self.q
            .abs()
            .max(self.r.abs())
            .max(self.s().abs())
            <= BOARD_RADIUS
    }

    /// One step in `dir`. Does not validate; callers filter with `is_valid`.
    pub fn step(self, dir: Direction) -> Cell {
        let (dq, dr) = dir.delta();
        Cell::new(self.q + dq, self.r + dr)
    }

    /// Arbitrary offset, used for knight leaps. Does not validate.
    pub fn offset(self, dq: i8, dr: i8) -> Cell {
        Cell::new(self.q + dq, self.r + dr)
    }

    /// Cube distance: adjacency is distance 1.
    pub fn distance(self, other: Cell) -> i8 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        let ds = self.s() - other.s();
        dq.abs().max(dr.abs()).max(ds.abs())
    }

    /// Distance from the board's centre cell `(0, 0)`.
    pub fn center_distance(self) -> i8 {
        self.distance(Cell::new(0, 0))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// The six hex directions, in table order. The discriminants are stable;
/// piece movement masks are expressed as subsets of this table.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Direction {
    North,
    South,
    NorthEast,
    SouthWest,
    NorthWest,
    SouthEast,
}

pub const DIRECTIONS: [Direction; 6] = [
    Direction::North,
    Direction::South,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::NorthWest,
    Direction::SouthEast,
];

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, 0),
            Direction::SouthEast => (1, 0),
        }
    }
}

/// Every on-board cell, in column-major `(q, r)` order.
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (-BOARD_RADIUS..=BOARD_RADIUS).flat_map(|q| {
        (-BOARD_RADIUS..=BOARD_RADIUS)
            .map(move |r| Cell::new(q, r))
            .filter(|c| c.is_valid())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_validity() {
        assert!(Cell::new(0, 0).is_valid());
        assert!(Cell::new(4, 0).is_valid());
        assert!(Cell::new(-4, 4).is_valid());
        assert!(Cell::new(0, -4).is_valid());

        assert!(!Cell::new(5, 0).is_valid());
        assert!(!Cell::new(3, 3).is_valid(), "|s| = 6 is off the board");
        assert!(!Cell::new(0, -5).is_valid());
    }

    #[test]
    fn board_has_61_cells() {
        assert_eq!(all_cells().count(), 61);
    }

    #[test]
    fn direction_deltas() {
        let deltas: Vec<(i8, i8)> = DIRECTIONS.iter().map(|d| d.delta()).collect();
        assert_eq!(
            deltas,
            vec![(0, -1), (0, 1), (1, -1), (-1, 1), (-1, 0), (1, 0)]
        );
    }

    #[test]
    fn cube_distance() {
        let center = Cell::new(0, 0);
        assert_eq!(center.distance(Cell::new(0, -1)), 1);
        assert_eq!(center.distance(Cell::new(1, -1)), 1);
        assert_eq!(center.distance(Cell::new(2, -1)), 2);
        assert_eq!(Cell::new(-4, 4).distance(Cell::new(4, -4)), 8);
        assert_eq!(Cell::new(3, -2).center_distance(), 3);
    }

    #[test]
    fn stepping_stays_consistent_with_deltas() {
        let c = Cell::new(1, -2);
        for dir in DIRECTIONS {
            let (dq, dr) = dir.delta();
            assert_eq!(c.step(dir), Cell::new(1 + dq, -2 + dr));
        }
    }
}
