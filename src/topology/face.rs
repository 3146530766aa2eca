//! Face node naming.
//!
//! Every non-empty grid cell owns eight face nodes, one per
//! `(direction, side)` pair. Names are deterministic strings so they can be
//! reused stably both by the track graph and, time-stamped, by the
//! time-expanded network.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CellCoord, Direction};

/// Which side of a face a node represents: the boundary an agent crosses
/// into the cell (`In`) or out of it (`Out`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    In,
    Out,
}

impl Side {
    fn suffix(self) -> &'static str {
        match self {
            Side::In => "in",
            Side::Out => "out",
        }
    }
}

/// One of the eight face nodes belonging to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceNode {
    pub cell: CellCoord,
    pub direction: Direction,
    pub side: Side,
}

impl FaceNode {
    pub fn new(cell: CellCoord, direction: Direction, side: Side) -> Self {
        Self {
            cell,
            direction,
            side,
        }
    }

    pub fn in_face(cell: CellCoord, direction: Direction) -> Self {
        Self::new(cell, direction, Side::In)
    }

    pub fn out_face(cell: CellCoord, direction: Direction) -> Self {
        Self::new(cell, direction, Side::Out)
    }
}

impl fmt::Display for FaceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})_{}_{}",
            self.cell.row,
            self.cell.col,
            self.direction,
            self.side.suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_convention() {
        let f = FaceNode::in_face(CellCoord::new(1, 2), Direction::North);
        assert_eq!(f.to_string(), "(1,2)_N_in");
    }
}
