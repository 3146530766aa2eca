//! Restricted master problem: one binary variable per candidate path, unit
//! flow per commodity, at most one activated variable per constraint set.

use std::collections::{HashMap, HashSet};

use good_lp::solvers::DualValues;
use good_lp::{default_solver, variable, Expression, ProblemVariables, Solution, SolverModel};
use petgraph::graph::EdgeIndex;

use crate::error::{Result, RouterError};
use crate::solver::initial::InitialSolution;
use crate::ten::{ConstraintIndex, ConstraintKey, Ten};

/// A candidate path registered with the master problem.
struct Column {
    commodity: usize,
    edges: Vec<EdgeIndex>,
    cost: f64,
}

/// The restricted master problem over the candidate path sets `Ω_k`.
///
/// Grows by `add_column` as the pricing solver finds improving paths;
/// never shrinks. `solve_relaxation` exposes dual values ordered
/// restrictions-first, commodity-unit-flow-second, matching the ordering
/// the pricing solver expects when reweighting edges.
pub struct MasterProblem<'a> {
    ten: &'a Ten,
    index: ConstraintIndex,
    num_commodities: usize,
    columns: Vec<Column>,
    seen_edge_sequences: HashSet<(usize, Vec<EdgeIndex>)>,
    active_constraints: Vec<ConstraintKey>,
    constraint_position: HashMap<ConstraintKey, usize>,
}

/// Dual values from the LP relaxation, ordered restrictions-first then
/// commodity-unit-flow, matching `MasterProblem::active_constraints` and
/// commodity index order respectively.
pub struct Duals {
    pub restriction_duals: Vec<f64>,
    pub commodity_duals: Vec<f64>,
}

impl<'a> MasterProblem<'a> {
    /// Seed the master problem with one path per commodity that has one
    /// (commodities dropped or found infeasible by the initial solution
    /// generator contribute no column and no unit-flow constraint; their
    /// status is carried through to the final solution unchanged).
    pub fn build(ten: &'a Ten, num_commodities: usize, initial: &InitialSolution) -> Self {
        let mut master = Self {
            ten,
            index: ten.build_constraint_index(),
            num_commodities,
            columns: Vec::new(),
            seen_edge_sequences: HashSet::new(),
            active_constraints: Vec::new(),
            constraint_position: HashMap::new(),
        };
        for (k, path) in initial.paths.iter().enumerate() {
            if let Some(edges) = path {
                master.add_column(k, edges.clone());
            }
        }
        master
    }

    pub fn columns_of(&self, commodity: usize) -> impl Iterator<Item = &[EdgeIndex]> {
        self.columns
            .iter()
            .filter(move |c| c.commodity == commodity)
            .map(|c| c.edges.as_slice())
    }

    pub fn active_constraints(&self) -> &[ConstraintKey] {
        &self.active_constraints
    }

    /// Register a new candidate path for `commodity`. Silently ignores an
    /// exact repeat of an already-registered edge sequence for the same
    /// commodity (duplicate columns add nothing but LP size) and reports
    /// whether anything was actually added.
    pub fn add_column(&mut self, commodity: usize, edges: Vec<EdgeIndex>) -> bool {
        let key = (commodity, edges.clone());
        if !self.seen_edge_sequences.insert(key) {
            return false;
        }
        for &e in &edges {
            for &ck in self.index.constraints_of(e) {
                self.constraint_position.entry(ck).or_insert_with(|| {
                    self.active_constraints.push(ck);
                    self.active_constraints.len() - 1
                });
            }
        }
        let cost = crate::extract::path_cost(self.ten, &edges);
        self.columns.push(Column {
            commodity,
            edges,
            cost,
        });
        true
    }

    /// Common setup for both solves: variables plus the objective, one
    /// integer or continuous handle per column.
    fn build_variables(&self, integer: bool) -> (ProblemVariables, Vec<good_lp::Variable>, Expression) {
        let mut vars = ProblemVariables::new();
        let mut handles = Vec::with_capacity(self.columns.len());
        for _ in &self.columns {
            let v = variable().min(0.0).max(1.0);
            let v = if integer { v.integer() } else { v };
            handles.push(vars.add(v));
        }
        let objective: Expression = self
            .columns
            .iter()
            .zip(&handles)
            .map(|(c, &h)| c.cost * h)
            .sum();
        (vars, handles, objective)
    }

    fn flow_terms(&self, commodity: usize, handles: &[good_lp::Variable]) -> Expression {
        self.columns
            .iter()
            .zip(handles)
            .filter(|(c, _)| c.commodity == commodity)
            .map(|(_, &h)| h)
            .sum()
    }

    fn restriction_terms(&self, key: ConstraintKey, handles: &[good_lp::Variable]) -> Expression {
        self.columns
            .iter()
            .zip(handles)
            .filter(|(c, _)| {
                c.edges
                    .iter()
                    .any(|&e| self.index.constraints_of(e).contains(&key))
            })
            .map(|(_, &h)| h)
            .sum()
    }

    /// Solve the LP relaxation and report its objective alongside dual
    /// values. HiGHS reports `≤` restriction duals as non-positive under
    /// minimization (see `DESIGN.md`); `solver::pricing` accounts for the
    /// sign when reweighting.
    pub fn solve_relaxation(&mut self) -> Result<(f64, Duals)> {
        if self.columns.is_empty() {
            return Err(RouterError::LpBackendError(
                "master problem has no candidate columns".to_string(),
            ));
        }
        let (vars, handles, objective) = self.build_variables(false);
        let mut model = vars.minimise(&objective).using(default_solver);

        let mut flow_refs = Vec::new();
        for k in 0..self.num_commodities {
            if !self.columns.iter().any(|c| c.commodity == k) {
                continue;
            }
            let terms = self.flow_terms(k, &handles);
            flow_refs.push(model.add_constraint(terms.eq(1.0)));
        }
        let mut restriction_refs = Vec::with_capacity(self.active_constraints.len());
        for &ck in &self.active_constraints {
            let terms = self.restriction_terms(ck, &handles);
            restriction_refs.push(model.add_constraint(terms.leq(1.0)));
        }

        let solution = model
            .solve()
            .map_err(|e| RouterError::LpBackendError(e.to_string()))?;

        let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
        let objective_value: f64 = self
            .columns
            .iter()
            .zip(&values)
            .map(|(c, &v)| c.cost * v)
            .sum();

        let restriction_duals = restriction_refs
            .iter()
            .map(|&r| solution.dual(r))
            .collect();
        let commodity_duals = flow_refs.iter().map(|&r| solution.dual(r)).collect();

        Ok((
            objective_value,
            Duals {
                restriction_duals,
                commodity_duals,
            },
        ))
    }

    /// Solve the integer master and return, per commodity, the chosen
    /// path's edges (`None` if the commodity has no columns at all).
    pub fn solve_ip(&mut self) -> Result<(f64, Vec<Option<Vec<EdgeIndex>>>)> {
        if self.columns.is_empty() {
            return Err(RouterError::LpBackendError(
                "master problem has no candidate columns".to_string(),
            ));
        }
        let (vars, handles, objective) = self.build_variables(true);
        let mut model = vars.minimise(&objective).using(default_solver);

        for k in 0..self.num_commodities {
            if !self.columns.iter().any(|c| c.commodity == k) {
                continue;
            }
            let terms = self.flow_terms(k, &handles);
            model = model.with(terms.eq(1.0));
        }
        for &ck in &self.active_constraints {
            let terms = self.restriction_terms(ck, &handles);
            model = model.with(terms.leq(1.0));
        }

        let solution = model
            .solve()
            .map_err(|e| RouterError::LpBackendError(e.to_string()))?;

        let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
        let objective_value: f64 = self
            .columns
            .iter()
            .zip(&values)
            .map(|(c, &v)| c.cost * v)
            .sum();

        let mut per_commodity: Vec<Option<Vec<EdgeIndex>>> = vec![None; self.num_commodities];
        for (col, &v) in self.columns.iter().zip(&values) {
            if v > 0.5 {
                per_commodity[col.commodity] = Some(col.edges.clone());
            }
        }
        Ok((objective_value, per_commodity))
    }
}
