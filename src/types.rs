//! Common small types shared across railten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four cardinal directions a train can face or move toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Nibble index used by the cell transition encoding (N=0,E=1,S=2,W=3).
    pub fn bit_index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn from_bit_index(i: usize) -> Option<Direction> {
        match i {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// The 180-degree reversal of this direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Row/column delta for stepping one cell in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl TryFrom<u8> for Direction {
    type Error = crate::error::RouterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::from_bit_index(value as usize).ok_or_else(|| {
            crate::error::RouterError::InvalidAgent {
                index: usize::MAX,
                reason: format!("unknown direction code {value}"),
            }
        })
    }
}

/// Row-major grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighboring cell in `dir`, or `None` if it would fall outside
    /// a grid of the given dimensions.
    pub fn step(self, dir: Direction, rows: usize, cols: usize) -> Option<CellCoord> {
        let (dr, dc) = dir.delta();
        let r = self.row as isize + dr;
        let c = self.col as isize + dc;
        if r < 0 || c < 0 || r as usize >= rows || c as usize >= cols {
            None
        } else {
            Some(CellCoord::new(r as usize, c as usize))
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Method used to produce a conflict-free routing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    /// Restricted master problem grown by column generation.
    ColumnGeneration,
    /// Direct binary multi-commodity flow formulation.
    ArcFormulation,
}

impl Default for SolveMethod {
    fn default() -> Self {
        SolveMethod::ColumnGeneration
    }
}

/// Per-commodity outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommodityStatus {
    /// A conflict-free path was found and included in the plan.
    Ok,
    /// The commodity was excluded from the optimization (e.g. it shares an
    /// initial cell with another commodity that was assigned first).
    Dropped,
    /// No conflict-free assignment could be found for this commodity.
    Infeasible,
}
