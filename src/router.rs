//! Public entry point: validate a grid and agent list, build the track
//! graph and time-expanded network, solve, and extract per-commodity cell
//! sequences.

use tracing::{info_span, warn};

use crate::commodity::{Agent, Commodity};
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::extract::collapse_to_cells;
use crate::grid::Grid;
use crate::stats::{RoutingSolution, SolveStats, TerminationReason};
use crate::ten::Ten;
use crate::topology::TrackGraph;
use crate::types::{CommodityStatus, SolveMethod};

/// A validated routing instance: a grid plus a configuration, ready to
/// solve for any agent list sharing that grid's shape.
pub struct Router {
    grid: Grid,
    config: RouterConfig,
}

impl Router {
    /// Validate `config` and construct a router bound to `grid`.
    pub fn new(grid: Grid, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { grid, config })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Validate agents against the grid, build the track graph and TEN,
    /// solve with the configured method, and return a complete plan.
    pub fn solve(&self, agents: &[Agent]) -> Result<RoutingSolution> {
        let span = info_span!(
            "railten.solve",
            num_commodities = agents.len(),
            method = ?self.config.method,
            horizon = tracing::field::Empty,
        );
        let _enter = span.enter();

        let commodities = self.validate_agents(agents)?;
        let track = TrackGraph::build(&self.grid);
        let horizon = self.config.resolved_horizon(self.grid.rows, self.grid.cols);
        span.record("horizon", horizon);
        let ten = Ten::build(
            &track,
            &commodities,
            horizon,
            self.config.waiting_cost,
            self.config.use_direction,
        );

        let (objective, edge_paths, statuses, iterations, columns_added, termination) =
            match self.config.method {
                SolveMethod::ColumnGeneration => {
                    #[cfg(feature = "ilp-solver")]
                    {
                        let result = crate::solver::run_column_generation(
                            &ten,
                            &commodities,
                            &self.config,
                        )?;
                        (
                            result.objective,
                            result.paths,
                            result.statuses,
                            result.iterations,
                            result.columns_added,
                            result.termination,
                        )
                    }
                    #[cfg(not(feature = "ilp-solver"))]
                    {
                        return Err(RouterError::LpBackendError(
                            "column generation requires the ilp-solver feature".to_string(),
                        ));
                    }
                }
                SolveMethod::ArcFormulation => {
                    #[cfg(feature = "ilp-solver")]
                    {
                        let (objective, paths) =
                            crate::solver::arc::solve(&ten, commodities.len())?;
                        let statuses = paths
                            .iter()
                            .map(|p| {
                                if p.is_some() {
                                    CommodityStatus::Ok
                                } else {
                                    CommodityStatus::Infeasible
                                }
                            })
                            .collect();
                        (objective, paths, statuses, 0, 0, TerminationReason::NotApplicable)
                    }
                    #[cfg(not(feature = "ilp-solver"))]
                    {
                        return Err(RouterError::LpBackendError(
                            "arc formulation requires the ilp-solver feature".to_string(),
                        ));
                    }
                }
            };

        for (k, status) in statuses.iter().enumerate() {
            if *status != CommodityStatus::Ok {
                warn!(commodity = k, ?status, "commodity not included in final plan");
            }
        }

        let paths = edge_paths
            .iter()
            .map(|p| p.as_ref().map(|edges| collapse_to_cells(&ten, &track, edges)))
            .collect();

        let stats = SolveStats::new(
            iterations,
            columns_added,
            statuses.clone(),
            objective,
            termination,
        );

        Ok(RoutingSolution {
            paths,
            statuses,
            score: objective,
            stats,
        })
    }

    fn validate_agents(&self, agents: &[Agent]) -> Result<Vec<Commodity>> {
        let mut commodities = Vec::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            let start = agent.initial_position;
            let target = agent.target;
            if start.row >= self.grid.rows || start.col >= self.grid.cols {
                return Err(RouterError::InvalidAgent {
                    index: i,
                    reason: "start cell is outside the grid".to_string(),
                });
            }
            if target.row >= self.grid.rows || target.col >= self.grid.cols {
                return Err(RouterError::InvalidAgent {
                    index: i,
                    reason: "target cell is outside the grid".to_string(),
                });
            }
            if self.grid.is_empty_cell(start.row, start.col) {
                return Err(RouterError::InvalidAgent {
                    index: i,
                    reason: "start cell has no rail".to_string(),
                });
            }
            if self.grid.is_empty_cell(target.row, target.col) {
                return Err(RouterError::InvalidAgent {
                    index: i,
                    reason: "target cell has no rail".to_string(),
                });
            }
            commodities.push(agent.into_commodity());
        }
        Ok(commodities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{encode, TransitionMap};
    use crate::types::{CellCoord, Direction};

    fn straight_ew_grid(len: usize) -> Grid {
        let mut map = TransitionMap::new();
        map.insert(Direction::East, vec![Direction::East]);
        map.insert(Direction::West, vec![Direction::West]);
        let bits = encode(&map);
        Grid::new(1, len, vec![bits; len]).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let grid = straight_ew_grid(3);
        let mut config = RouterConfig::default();
        config.k_shortest = 0;
        assert!(Router::new(grid, config).is_err());
    }

    #[test]
    fn empty_start_cell_is_rejected() {
        let grid = Grid::new(1, 1, vec![0]).unwrap();
        let router = Router::new(grid, RouterConfig::default()).unwrap();
        let agents = vec![Agent::new(
            CellCoord::new(0, 0),
            Direction::East,
            CellCoord::new(0, 0),
        )];
        let err = router.solve(&agents).unwrap_err();
        assert!(matches!(err, RouterError::InvalidAgent { index: 0, .. }));
    }

    #[cfg(feature = "ilp-solver")]
    #[test]
    fn single_agent_corridor_scores_two() {
        let grid = straight_ew_grid(3);
        let router = Router::new(grid, RouterConfig::default()).unwrap();
        let agents = vec![Agent::new(
            CellCoord::new(0, 0),
            Direction::East,
            CellCoord::new(0, 2),
        )];
        let solution = router.solve(&agents).unwrap();
        assert_eq!(solution.statuses[0], CommodityStatus::Ok);
        assert!((solution.score - 2.0).abs() < 1e-6);
        assert_eq!(
            solution.paths[0],
            Some(vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(0, 2)
            ])
        );
    }
}
