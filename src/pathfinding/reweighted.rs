//! Shortest path search over a (possibly negatively) reweighted copy of
//! the time-expanded network, used by the pricing solver.
//!
//! The TEN is acyclic by construction (every move or wait edge advances
//! the time layer by exactly one, and source/sink pseudo-nodes have no
//! incoming/outgoing back edges respectively), so a single topological
//! relaxation pass computes exact shortest paths even with negative edge
//! weights, without the O(V*E) worst case a general Bellman-Ford needs to
//! guard against negative cycles. This one pass is what both the
//! Bellman-Ford and SPFA configuration options reduce to on a DAG.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::ten::Ten;

/// Find the minimum-weight path from `source` to `target` using
/// `edge_weight` (which may differ from the TEN's base weights, e.g. after
/// dual-value reweighting). Returns the total weight and the edge sequence,
/// or `None` if `target` is unreachable from `source`.
pub fn shortest_path(
    ten: &Ten,
    source: NodeIndex,
    target: NodeIndex,
    edge_weight: impl Fn(EdgeIndex) -> f64,
) -> Option<(f64, Vec<EdgeIndex>)> {
    let order = toposort(ten.graph(), None).expect("time-expanded network must be acyclic");

    let mut dist: HashMap<NodeIndex, f64> = HashMap::new();
    let mut pred: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
    dist.insert(source, 0.0);

    for node in order {
        let Some(&d) = dist.get(&node) else {
            continue;
        };
        for edge in ten.graph().edges(node) {
            let w = edge_weight(edge.id());
            let cand = d + w;
            let v = edge.target();
            let better = match dist.get(&v) {
                Some(&existing) => cand < existing,
                None => true,
            };
            if better {
                dist.insert(v, cand);
                pred.insert(v, (node, edge.id()));
            }
        }
    }

    let total = *dist.get(&target)?;
    let mut edges = Vec::new();
    let mut cur = target;
    while cur != source {
        let (prev, edge) = pred[&cur];
        edges.push(edge);
        cur = prev;
    }
    edges.reverse();
    Some((total, edges))
}
