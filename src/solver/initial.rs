//! Greedy initial feasible solution: assign each commodity a candidate path
//! compatible with every commodity assigned before it.

use std::collections::{HashMap, HashSet};

use petgraph::graph::EdgeIndex;

use crate::commodity::Commodity;
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::pathfinding::k_shortest_paths;
use crate::ten::{ConstraintIndex, ConstraintKey, Ten};
use crate::types::{CellCoord, CommodityStatus};

/// One path per commodity, or `None` where the commodity was dropped or
/// found infeasible, alongside the status that explains why.
pub struct InitialSolution {
    pub paths: Vec<Option<Vec<EdgeIndex>>>,
    pub statuses: Vec<CommodityStatus>,
}

/// Build a conflict-free starting assignment, one commodity at a time, in
/// input order.
///
/// A commodity whose initial cell was already claimed by an earlier
/// commodity is dropped outright (two trains cannot occupy the same start
/// cell at `t=0`, and the source fan-out makes that conflict immediate).
/// Otherwise up to `config.max_initial_solution_retries` rounds of
/// `config.k_shortest` candidates are drawn from the k-shortest-path finder;
/// the first candidate that shares no constraint set with any previously
/// accepted path is accepted. A commodity with no path to its target at all
/// (even ignoring other commodities) surfaces as `RouterError::Unreachable`
/// immediately, since no amount of retrying can fix that.
pub fn build_initial_solution(
    ten: &Ten,
    commodities: &[Commodity],
    config: &RouterConfig,
) -> Result<InitialSolution> {
    let index = ten.build_constraint_index();
    let mut used_constraints: HashSet<ConstraintKey> = HashSet::new();
    let mut used_start_cells: HashSet<CellCoord> = HashSet::new();

    let mut paths: Vec<Option<Vec<EdgeIndex>>> = Vec::with_capacity(commodities.len());
    let mut statuses: Vec<CommodityStatus> = Vec::with_capacity(commodities.len());

    for (k, commodity) in commodities.iter().enumerate() {
        if used_start_cells.contains(&commodity.start) {
            paths.push(None);
            statuses.push(CommodityStatus::Dropped);
            continue;
        }

        let source = ten.source(k);
        let sink = ten.sink(k);
        let mut accepted: Option<Vec<EdgeIndex>> = None;

        for attempt in 0..config.max_initial_solution_retries {
            let candidates = k_shortest_paths(ten, source, sink, config.k_shortest);
            if candidates.is_empty() {
                if attempt == 0 {
                    return Err(RouterError::Unreachable {
                        index: k,
                        horizon: ten.horizon(),
                    });
                }
                break;
            }
            if let Some(p) = candidates
                .into_iter()
                .find(|p| is_compatible(p, &index, &used_constraints))
            {
                accepted = Some(p);
                break;
            }
        }

        match accepted {
            Some(p) => {
                for &e in &p {
                    for &key in index.constraints_of(e) {
                        used_constraints.insert(key);
                    }
                }
                used_start_cells.insert(commodity.start);
                paths.push(Some(p));
                statuses.push(CommodityStatus::Ok);
            }
            None => {
                paths.push(None);
                statuses.push(CommodityStatus::Infeasible);
            }
        }
    }

    Ok(InitialSolution { paths, statuses })
}

fn is_compatible(
    path: &[EdgeIndex],
    index: &ConstraintIndex,
    used: &HashSet<ConstraintKey>,
) -> bool {
    path.iter()
        .flat_map(|&e| index.constraints_of(e).iter())
        .all(|key| !used.contains(key))
}
