//! Solvers: the greedy initial feasible solution, the column-generation
//! master/pricing pair, the alternative arc formulation, and the
//! orchestration loop that ties them together.

pub mod initial;

#[cfg(feature = "ilp-solver")]
pub mod arc;
#[cfg(feature = "ilp-solver")]
pub mod master;
#[cfg(feature = "ilp-solver")]
pub mod orchestrator;
#[cfg(feature = "ilp-solver")]
pub mod pricing;

pub use initial::{build_initial_solution, InitialSolution};

#[cfg(feature = "ilp-solver")]
pub use master::{Duals, MasterProblem};
#[cfg(feature = "ilp-solver")]
pub use orchestrator::{run_column_generation, ColumnGenerationResult, OrchestratorState};
#[cfg(feature = "ilp-solver")]
pub use pricing::{price, PricedColumn};
