//! # railten
//!
//! A conflict-free multi-agent railway routing library built on a
//! time-expanded network.
//!
//! Given a grid of rail cells and a list of trains (each with a start cell,
//! heading, and target cell), `railten` produces, for every train, a
//! time-stamped sequence of cells that respects the grid's physical
//! transitions, never places two trains on the same cell at the same time
//! step, never lets two trains swap across the same edge head-on, and
//! minimizes the sum of path lengths.
//!
//! ## Example
//!
//! ```rust
//! use railten::prelude::*;
//!
//! // A straight east-west track: East continues East, West continues West.
//! let bits: u16 = 1025;
//! let grid = Grid::new(1, 3, vec![bits; 3]).unwrap();
//!
//! let router = Router::new(grid, RouterConfig::default()).unwrap();
//! let agents = vec![Agent::new(
//!     CellCoord::new(0, 0),
//!     Direction::East,
//!     CellCoord::new(0, 2),
//! )];
//! let solution = router.solve(&agents).unwrap();
//! assert_eq!(solution.score, 2.0);
//! ```
//!
//! ## Architecture
//!
//! - [`grid`] / [`types`]: the 16-bit cell transition encoding and small
//!   shared value types.
//! - [`topology`]: the directed cell-face track graph and its position /
//!   swap constraint families.
//! - [`ten`]: the time-expanded network built by replicating the track
//!   graph across time layers.
//! - [`pathfinding`]: shortest-path primitives over the TEN.
//! - [`solver`]: the greedy initial solution, the column-generation
//!   master/pricing pair, and the alternative arc formulation.
//! - [`router`]: the public [`Router`] entry point wiring all of the above.

pub mod commodity;
pub mod config;
pub mod error;
pub mod extract;
pub mod grid;
pub mod pathfinding;
pub mod router;
pub mod solver;
pub mod stats;
pub mod ten;
pub mod topology;
pub mod types;

/// Convenient single-import surface for common callers.
pub mod prelude {
    pub use crate::commodity::{Agent, Commodity};
    pub use crate::config::RouterConfig;
    pub use crate::error::{Result, RouterError};
    pub use crate::grid::Grid;
    pub use crate::router::Router;
    pub use crate::stats::{RoutingSolution, SolveStats, TerminationReason};
    pub use crate::types::{CellCoord, CommodityStatus, Direction, SolveMethod};
}

pub use error::{Result, RouterError};
pub use router::Router;
