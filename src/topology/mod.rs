//! Cell-face graph topology: face node naming and the track graph built
//! from a decoded grid, including its position and swap constraint
//! families.

pub mod face;
pub mod track_graph;

pub use face::{FaceNode, Side};
pub use track_graph::{PositionConstraint, SwapConstraint, TrackGraph};
