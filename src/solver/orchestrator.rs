//! Column-generation orchestration: build the restricted master from the
//! greedy initial solution, alternate LP relaxation and pricing until no
//! improving column is found, then solve the integer master.

use petgraph::graph::EdgeIndex;
use tracing::{debug, trace, warn};

use crate::commodity::Commodity;
use crate::config::RouterConfig;
use crate::error::Result;
use crate::solver::initial::build_initial_solution;
use crate::solver::master::MasterProblem;
use crate::solver::pricing::price;
use crate::stats::TerminationReason;
use crate::ten::Ten;
use crate::types::CommodityStatus;

/// The orchestrator's visible state, mirrored into `trace!` events on every
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Built,
    Relaxed,
    Priced,
    Done,
}

/// Outcome of running column generation to completion.
pub struct ColumnGenerationResult {
    pub objective: f64,
    pub paths: Vec<Option<Vec<EdgeIndex>>>,
    pub statuses: Vec<CommodityStatus>,
    pub iterations: u32,
    pub columns_added: u32,
    pub termination: TerminationReason,
}

fn transition(from: OrchestratorState, to: OrchestratorState) {
    trace!(?from, ?to, "orchestrator state transition");
}

/// Run the full column-generation loop described in the design notes:
/// build the restricted master from a greedy initial solution, repeatedly
/// solve the LP relaxation and reprice until pricing finds nothing
/// improving (or the iteration cap is hit), then solve the integer master.
pub fn run_column_generation(
    ten: &Ten,
    commodities: &[Commodity],
    config: &RouterConfig,
) -> Result<ColumnGenerationResult> {
    let initial = build_initial_solution(ten, commodities, config)?;
    let mut statuses = initial.statuses.clone();
    for (k, status) in statuses.iter().enumerate() {
        if *status != CommodityStatus::Ok {
            warn!(commodity = k, ?status, "commodity not dispatched by initial solution");
        }
    }

    if !statuses.iter().any(|s| *s == CommodityStatus::Ok) {
        // No commodity got an initial path at all; nothing for the master
        // problem to do.
        return Ok(ColumnGenerationResult {
            objective: 0.0,
            paths: initial.paths,
            statuses,
            iterations: 0,
            columns_added: 0,
            termination: TerminationReason::Converged,
        });
    }

    let mut master = MasterProblem::build(ten, commodities.len(), &initial);
    let mut state = OrchestratorState::Built;

    let mut iterations = 0u32;
    let mut columns_added = 0u32;
    let termination;

    loop {
        transition(state, OrchestratorState::Relaxed);
        state = OrchestratorState::Relaxed;
        let (objective, duals) = master.solve_relaxation()?;
        iterations += 1;

        transition(state, OrchestratorState::Priced);
        state = OrchestratorState::Priced;
        let improving = price(ten, master.active_constraints(), &duals, commodities.len());

        debug!(
            iteration = iterations,
            objective,
            columns_added = improving.len(),
            "column generation iteration"
        );

        if improving.is_empty() {
            transition(state, OrchestratorState::Done);
            termination = TerminationReason::Converged;
            break;
        }
        if iterations >= config.max_column_generation_iterations {
            warn!(
                iterations,
                "column generation hit the iteration cap before natural convergence"
            );
            transition(state, OrchestratorState::Done);
            termination = TerminationReason::IterationCapReached;
            break;
        }

        let mut any_added = false;
        for column in improving {
            if master.add_column(column.commodity, column.edges) {
                columns_added += 1;
                any_added = true;
            }
        }
        if !any_added {
            // Every priced path already existed (degenerate pricing);
            // nothing new to explore, so stop instead of looping forever.
            transition(state, OrchestratorState::Done);
            termination = TerminationReason::PricingDegenerate;
            break;
        }
        transition(state, OrchestratorState::Relaxed);
        state = OrchestratorState::Relaxed;
    }

    let (objective, paths) = master.solve_ip()?;

    // Commodities dropped or found infeasible by the initial solution never
    // got a column and so never appear in `paths`; their status stands.
    let mut final_paths = initial.paths;
    for (k, path) in paths.into_iter().enumerate() {
        if path.is_some() {
            final_paths[k] = path;
            statuses[k] = CommodityStatus::Ok;
        }
    }

    Ok(ColumnGenerationResult {
        objective,
        paths: final_paths,
        statuses,
        iterations,
        columns_added,
        termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{encode, Grid, TransitionMap};
    use crate::topology::TrackGraph;
    use crate::types::{CellCoord, Direction};

    /// A `side x side` grid of four-way diamond crossings: every cell
    /// connects straight through in all four directions.
    fn open_square_grid(side: usize) -> Grid {
        let mut cross = TransitionMap::new();
        cross.insert(Direction::North, vec![Direction::North]);
        cross.insert(Direction::South, vec![Direction::South]);
        cross.insert(Direction::East, vec![Direction::East]);
        cross.insert(Direction::West, vec![Direction::West]);
        let bits = encode(&cross);
        Grid::new(side, side, vec![bits; side * side]).unwrap()
    }

    #[test]
    fn column_generation_converges_with_monotone_relaxation_objective() {
        let side = 5;
        let grid = open_square_grid(side);
        let track = TrackGraph::build(&grid);
        let commodities = vec![
            Commodity::new(CellCoord::new(0, 0), Direction::South, CellCoord::new(4, 0), 1.0),
            Commodity::new(CellCoord::new(0, 2), Direction::South, CellCoord::new(4, 2), 1.0),
            Commodity::new(CellCoord::new(0, 4), Direction::South, CellCoord::new(4, 4), 1.0),
        ];
        let mut config = RouterConfig::default();
        config.horizon = Some(20);
        let ten = Ten::build(&track, &commodities, 20, config.waiting_cost, true);

        let initial = build_initial_solution(&ten, &commodities, &config).unwrap();
        assert!(initial.statuses.iter().all(|s| *s == CommodityStatus::Ok));

        let mut master = MasterProblem::build(&ten, commodities.len(), &initial);
        let mut objectives = Vec::new();

        for _ in 0..config.max_column_generation_iterations {
            let (objective, duals) = master.solve_relaxation().unwrap();
            objectives.push(objective);
            let improving = price(&ten, master.active_constraints(), &duals, commodities.len());
            if improving.is_empty() {
                break;
            }
            let mut any_added = false;
            for column in improving {
                if master.add_column(column.commodity, column.edges) {
                    any_added = true;
                }
            }
            if !any_added {
                break;
            }
        }

        assert!(objectives.len() < config.max_column_generation_iterations as usize);
        for pair in objectives.windows(2) {
            assert!(
                pair[1] + 1e-6 >= pair[0],
                "relaxation objective decreased across an iteration: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn single_agent_corridor_reports_converged_termination() {
        let mut map = TransitionMap::new();
        map.insert(Direction::East, vec![Direction::East]);
        map.insert(Direction::West, vec![Direction::West]);
        let bits = encode(&map);
        let grid = Grid::new(1, 3, vec![bits; 3]).unwrap();
        let track = TrackGraph::build(&grid);
        let commodities = vec![Commodity::new(
            CellCoord::new(0, 0),
            Direction::East,
            CellCoord::new(0, 2),
            1.0,
        )];
        let config = RouterConfig::default();
        let ten = Ten::build(&track, &commodities, 6, config.waiting_cost, true);

        let result = run_column_generation(&ten, &commodities, &config).unwrap();
        assert_eq!(result.termination, TerminationReason::Converged);
        assert!(result.statuses.iter().all(|s| *s == CommodityStatus::Ok));
    }
}
