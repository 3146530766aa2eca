//! Error types for the railten library.

use thiserror::Error;

/// Errors that can occur while building or solving a routing instance.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// The grid is not rectangular, or has zero rows/columns.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// An agent's start or target cell has no rail (transition bits are 0).
    #[error("invalid agent {index}: {reason}")]
    InvalidAgent { index: usize, reason: String },

    /// `RouterConfig::validate` rejected a non-positive field.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// No path exists between a commodity's source and sink in the
    /// time-expanded network at all, regardless of conflicts.
    #[error("commodity {index} is unreachable within horizon {horizon}")]
    Unreachable { index: usize, horizon: u32 },

    /// The greedy initial solution could not find a conflict-free
    /// assignment for every commodity within its retry budget.
    #[error("no conflict-free assignment found for commodity {index} after {retries} retries")]
    Infeasible { index: usize, retries: u32 },

    /// The underlying LP/IP backend failed to produce a solution.
    #[error("lp backend error: {0}")]
    LpBackendError(String),
}

/// Result type alias used throughout railten.
pub type Result<T> = std::result::Result<T, RouterError>;
