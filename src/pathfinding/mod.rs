//! Shortest-path primitives over the time-expanded network.

pub mod k_shortest;
pub mod reweighted;

pub use k_shortest::k_shortest_paths;
pub use reweighted::shortest_path;
