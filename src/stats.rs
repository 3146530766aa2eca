//! Diagnostics and the serializable solve output.

use serde::{Deserialize, Serialize};

use crate::types::CellCoord;
use crate::types::CommodityStatus;

/// Why the column-generation loop stopped, distinguishing true LP
/// optimality from the degenerate case where pricing only rediscovers
/// columns already in the restricted master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Pricing found no column with negative reduced cost: the restricted
    /// master is LP-optimal.
    Converged,
    /// Pricing returned only paths already present in the master; treated
    /// as no improvement and stopped rather than looping forever.
    PricingDegenerate,
    /// `max_column_generation_iterations` was reached before either of the
    /// above.
    IterationCapReached,
    /// The arc formulation was used instead; there is no column-generation
    /// loop to terminate.
    NotApplicable,
}

/// Diagnostics accumulated over one solve, independent of which method
/// (`column-generation` or `arc-formulation`) produced the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of column-generation iterations run (0 for the arc formulation).
    pub iterations: u32,
    /// Total candidate paths added across the whole solve (0 for the arc
    /// formulation, which has no notion of columns).
    pub columns_added: u32,
    /// Per-commodity outcome, indexed the same as the input agent list.
    pub commodity_status: Vec<CommodityStatus>,
    /// Sum of path lengths over every `CommodityStatus::Ok` commodity.
    pub objective: f64,
    /// Why the solve stopped iterating.
    pub termination: TerminationReason,
}

impl SolveStats {
    pub fn new(
        iterations: u32,
        columns_added: u32,
        commodity_status: Vec<CommodityStatus>,
        objective: f64,
        termination: TerminationReason,
    ) -> Self {
        Self {
            iterations,
            columns_added,
            commodity_status,
            objective,
            termination,
        }
    }
}

/// A complete routing plan: one cell sequence per commodity, its status,
/// the total score, and the diagnostics that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSolution {
    /// `paths[k]` is the ordered cell sequence for commodity `k`, or
    /// `None` if its status is not `Ok`.
    pub paths: Vec<Option<Vec<CellCoord>>>,
    pub statuses: Vec<CommodityStatus>,
    pub score: f64,
    pub stats: SolveStats,
}
