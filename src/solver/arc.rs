//! Direct arc-formulation solver: one binary flow variable per
//! (commodity, TEN edge) pair, solved as a single integer program instead
//! of growing a restricted master by column generation.

use std::collections::HashMap;

use good_lp::{default_solver, variable, Expression, ProblemVariables, Solution, SolverModel};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::error::{Result, RouterError};
use crate::ten::{Ten, TenNodeKind};

/// Solve the conflict-free routing problem as a single binary
/// multicommodity flow program over the time-expanded network.
///
/// Memory and time scale as `O(num_commodities * |E_TEN|)`; prefer column
/// generation for larger instances. Returns the objective value and, per
/// commodity, the chosen edge sequence (`None` if that commodity has no
/// feasible flow, which cannot happen here since every commodity always
/// gets a variable set spanning `s_k` to `t_k` — infeasibility instead
/// surfaces as a solver error).
pub fn solve(ten: &Ten, num_commodities: usize) -> Result<(f64, Vec<Option<Vec<EdgeIndex>>>)> {
    if num_commodities == 0 {
        return Ok((0.0, Vec::new()));
    }

    // Which commodities may use each edge: every commodity for a shared
    // move/wait edge, only the owning commodity for a source/sink connector.
    let relevant = |e: EdgeIndex| -> Vec<usize> {
        let (u, v) = ten.graph().edge_endpoints(e).unwrap();
        match (ten.graph()[u], ten.graph()[v]) {
            (TenNodeKind::Source(k), _) => vec![k],
            (_, TenNodeKind::Sink(k)) => vec![k],
            _ => (0..num_commodities).collect(),
        }
    };

    let mut vars = ProblemVariables::new();
    let mut var_of: HashMap<(usize, EdgeIndex), good_lp::Variable> = HashMap::new();
    let mut terms_by_edge: HashMap<EdgeIndex, Vec<(usize, good_lp::Variable)>> = HashMap::new();
    let mut outgoing: HashMap<NodeIndex, Vec<EdgeIndex>> = HashMap::new();
    let mut incoming: HashMap<NodeIndex, Vec<EdgeIndex>> = HashMap::new();

    for e in ten.graph().edge_indices() {
        let (u, v) = ten.graph().edge_endpoints(e).unwrap();
        outgoing.entry(u).or_default().push(e);
        incoming.entry(v).or_default().push(e);
        for k in relevant(e) {
            let handle = vars.add(variable().binary());
            var_of.insert((k, e), handle);
            terms_by_edge.entry(e).or_default().push((k, handle));
        }
    }

    let objective: Expression = ten
        .graph()
        .edge_indices()
        .flat_map(|e| {
            let w = ten.base_weight(e);
            terms_by_edge
                .get(&e)
                .into_iter()
                .flatten()
                .map(move |&(_, h)| w * h)
        })
        .sum();

    let mut model = vars.minimise(&objective).using(default_solver);

    // Edge capacity: at most one commodity may occupy a shared edge.
    for terms in terms_by_edge.values() {
        if terms.len() > 1 {
            let lhs: Expression = terms.iter().map(|&(_, h)| h).sum();
            model = model.with(lhs.leq(1.0));
        }
    }

    // Flow conservation: outgoing - incoming = supply(node, k).
    let node_ids: Vec<NodeIndex> = ten.graph().node_indices().collect();
    for &n in &node_ids {
        for k in 0..num_commodities {
            let out_terms: Vec<good_lp::Variable> = outgoing
                .get(&n)
                .into_iter()
                .flatten()
                .filter_map(|e| var_of.get(&(k, *e)).copied())
                .collect();
            let in_terms: Vec<good_lp::Variable> = incoming
                .get(&n)
                .into_iter()
                .flatten()
                .filter_map(|e| var_of.get(&(k, *e)).copied())
                .collect();
            if out_terms.is_empty() && in_terms.is_empty() {
                continue;
            }
            let supply = match ten.graph()[n] {
                TenNodeKind::Source(kk) if kk == k => 1.0,
                TenNodeKind::Sink(kk) if kk == k => -1.0,
                _ => 0.0,
            };
            let lhs: Expression = out_terms.iter().map(|&h| h).sum::<Expression>()
                - in_terms.iter().map(|&h| h).sum::<Expression>();
            model = model.with(lhs.eq(supply));
        }
    }

    // Position constraints: at most one commodity total across the set.
    for pc in ten.position_constraints() {
        let terms: Vec<good_lp::Variable> = pc
            .edges
            .iter()
            .flat_map(|e| terms_by_edge.get(e).into_iter().flatten())
            .map(|&(_, h)| h)
            .collect();
        if !terms.is_empty() {
            let lhs: Expression = terms.iter().map(|&h| h).sum();
            model = model.with(lhs.leq(1.0));
        }
    }

    // Swap constraints: at most one of the two crossing edges, total.
    for sc in ten.swap_constraints() {
        let terms: Vec<good_lp::Variable> = sc
            .edges
            .iter()
            .flat_map(|e| terms_by_edge.get(e).into_iter().flatten())
            .map(|&(_, h)| h)
            .collect();
        if !terms.is_empty() {
            let lhs: Expression = terms.iter().map(|&h| h).sum();
            model = model.with(lhs.leq(1.0));
        }
    }

    let solution = model
        .solve()
        .map_err(|e| RouterError::LpBackendError(e.to_string()))?;

    let objective_value: f64 = var_of
        .iter()
        .map(|(&(_, e), &h)| ten.base_weight(e) * solution.value(h))
        .sum();

    let mut plans: Vec<Option<Vec<EdgeIndex>>> = vec![None; num_commodities];
    for k in 0..num_commodities {
        let mut cur = ten.source(k);
        let mut edges = Vec::new();
        let sink = ten.sink(k);
        // Walk the chosen unit flow from source to sink; the LP guarantees
        // exactly one outgoing selected edge at every node along the way.
        while cur != sink {
            let next_edge = outgoing
                .get(&cur)
                .into_iter()
                .flatten()
                .find(|&&e| {
                    var_of
                        .get(&(k, e))
                        .map(|&h| solution.value(h) > 0.5)
                        .unwrap_or(false)
                })
                .copied();
            let Some(e) = next_edge else { break };
            edges.push(e);
            cur = ten.graph().edge_endpoints(e).unwrap().1;
        }
        if cur == sink {
            plans[k] = Some(edges);
        }
    }

    Ok((objective_value, plans))
}
