//! Commodity (train routing requirement) and raw agent input types.

use serde::{Deserialize, Serialize};

use crate::types::{CellCoord, Direction};

/// A single routing requirement: one train's start, heading, and target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub start: CellCoord,
    pub initial_direction: Direction,
    pub target: CellCoord,
    pub speed: f64,
}

impl Commodity {
    pub fn new(
        start: CellCoord,
        initial_direction: Direction,
        target: CellCoord,
        speed: f64,
    ) -> Self {
        Self {
            start,
            initial_direction,
            target,
            speed,
        }
    }
}

/// Raw agent input as accepted by [`crate::Router::solve`], mirroring the
/// shape of an external grid/agent provider before it is validated into a
/// [`Commodity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub initial_position: CellCoord,
    pub direction: Direction,
    pub target: CellCoord,
    /// Read but not used by the optimization core, which assumes unit speed.
    pub speed: f64,
}

impl Agent {
    pub fn new(initial_position: CellCoord, direction: Direction, target: CellCoord) -> Self {
        Self {
            initial_position,
            direction,
            target,
            speed: 1.0,
        }
    }

    pub fn into_commodity(self) -> Commodity {
        Commodity::new(self.initial_position, self.direction, self.target, self.speed)
    }
}
