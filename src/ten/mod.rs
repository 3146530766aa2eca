//! Time-expanded network construction.

pub mod network;

pub use network::{
    ConstraintIndex, ConstraintKey, Ten, TenEdge, TenEdgeKind, TenNodeKind,
    TimedPositionConstraint, TimedSwapConstraint,
};
