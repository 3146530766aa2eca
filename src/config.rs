//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};
use crate::types::SolveMethod;

/// Tunable parameters for a [`crate::Router`] instance.
///
/// Every field has a documented default; construct with
/// `RouterConfig::default()` and override only what matters, then call
/// [`RouterConfig::validate`] (done automatically by `Router::new`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Number of time layers in the time-expanded network. `None` asks the
    /// router to derive a conservative bound from grid size.
    pub horizon: Option<u32>,
    /// Which solver to run.
    pub method: SolveMethod,
    /// Restrict each commodity's source connector to the face matching its
    /// declared initial direction, rather than all four.
    pub use_direction: bool,
    /// Number of candidate paths requested per commodity by the k-shortest
    /// path finder while building the initial feasible solution.
    pub k_shortest: u32,
    /// Cost of a waiting (self-loop) edge, in the same units as a move.
    pub waiting_cost: u32,
    /// Upper bound on restarts of the greedy initial-solution search before
    /// a commodity is reported infeasible.
    pub max_initial_solution_retries: u32,
    /// Hard cap on column-generation iterations, independent of natural
    /// convergence (no improving column found).
    pub max_column_generation_iterations: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            horizon: None,
            method: SolveMethod::ColumnGeneration,
            use_direction: true,
            k_shortest: 5,
            waiting_cost: 1,
            max_initial_solution_retries: 64,
            max_column_generation_iterations: 200,
        }
    }
}

impl RouterConfig {
    /// The conservative default horizon for a grid of the given shape:
    /// `4 * 2 * (cols + rows + 20)`.
    pub fn default_horizon(rows: usize, cols: usize) -> u32 {
        (4 * 2 * (cols + rows + 20)) as u32
    }

    pub fn resolved_horizon(&self, rows: usize, cols: usize) -> u32 {
        self.horizon.unwrap_or_else(|| Self::default_horizon(rows, cols))
    }

    /// Reject configurations that can never produce a usable solve.
    pub fn validate(&self) -> Result<()> {
        if let Some(h) = self.horizon {
            if h == 0 {
                return Err(RouterError::InvalidConfig(
                    "horizon must be positive".to_string(),
                ));
            }
        }
        if self.k_shortest == 0 {
            return Err(RouterError::InvalidConfig(
                "k_shortest must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(RouterConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_horizon_rejected() {
        let mut cfg = RouterConfig::default();
        cfg.horizon = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_k_shortest_rejected() {
        let mut cfg = RouterConfig::default();
        cfg.k_shortest = 0;
        assert!(cfg.validate().is_err());
    }
}
