//! Pricing solver: given the master problem's dual values, reweight the
//! time-expanded network and search, per commodity, for a path whose
//! reduced cost beats that commodity's unit-flow dual.

use std::collections::HashMap;

use petgraph::graph::EdgeIndex;

use crate::pathfinding::shortest_path;
use crate::solver::master::Duals;
use crate::ten::{ConstraintKey, Ten};

/// An improving path found for one commodity, ready to be handed to
/// `MasterProblem::add_column`.
pub struct PricedColumn {
    pub commodity: usize,
    pub edges: Vec<EdgeIndex>,
    pub reduced_cost: f64,
}

/// Tolerance below which a reduced cost is treated as zero, guarding
/// against re-adding a column the LP already priced to break-even due to
/// floating point noise.
const REDUCED_COST_EPSILON: f64 = 1e-7;

/// Find, for each commodity, the minimum-weight `s_k -> t_k` path under
/// reduced costs, and return those whose reduced cost is strictly negative.
/// An empty result means the restricted master is already optimal and
/// column generation should stop.
pub fn price(
    ten: &Ten,
    active_constraints: &[ConstraintKey],
    duals: &Duals,
    num_commodities: usize,
) -> Vec<PricedColumn> {
    let restriction_dual: HashMap<ConstraintKey, f64> = active_constraints
        .iter()
        .copied()
        .zip(duals.restriction_duals.iter().copied())
        .collect();
    let index = ten.build_constraint_index();

    let reweight = |e: EdgeIndex| -> f64 {
        let penalty: f64 = index
            .constraints_of(e)
            .iter()
            .filter_map(|ck| restriction_dual.get(ck))
            .sum();
        ten.base_weight(e) + penalty
    };

    let mut improving = Vec::new();
    for k in 0..num_commodities {
        let Some((total, edges)) = shortest_path(ten, ten.source(k), ten.sink(k), reweight) else {
            continue;
        };
        let commodity_dual = duals.commodity_duals.get(k).copied().unwrap_or(0.0);
        let reduced_cost = total - commodity_dual;
        if reduced_cost < -REDUCED_COST_EPSILON {
            improving.push(PricedColumn {
                commodity: k,
                edges,
                reduced_cost,
            });
        }
    }
    improving
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodity::Commodity;
    use crate::grid::{encode, Grid, TransitionMap};
    use crate::solver::initial::build_initial_solution;
    use crate::solver::master::MasterProblem;
    use crate::topology::TrackGraph;
    use crate::types::{CellCoord, Direction};
    use crate::RouterConfig;

    fn straight_ew_grid(len: usize) -> Grid {
        let mut map = TransitionMap::new();
        map.insert(Direction::East, vec![Direction::East]);
        map.insert(Direction::West, vec![Direction::West]);
        let bits = encode(&map);
        Grid::new(1, len, vec![bits; len]).unwrap()
    }

    #[test]
    fn single_commodity_with_only_path_prices_nothing_new() {
        let grid = straight_ew_grid(3);
        let track = TrackGraph::build(&grid);
        let commodities = vec![Commodity::new(
            CellCoord::new(0, 0),
            Direction::East,
            CellCoord::new(0, 2),
            1.0,
        )];
        let ten = Ten::build(&track, &commodities, 6, 1, true);
        let config = RouterConfig::default();
        let initial = build_initial_solution(&ten, &commodities, &config).unwrap();
        let mut master = MasterProblem::build(&ten, 1, &initial);
        let (_objective, duals) = master.solve_relaxation().unwrap();
        let improving = price(&ten, master.active_constraints(), &duals, 1);
        assert!(improving.is_empty());
    }
}
