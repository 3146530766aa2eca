//! Repeated-Dijkstra k-shortest-path search with per-use edge-weight
//! inflation, used only to seed the greedy initial feasible solution.

use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::ten::Ten;

/// Find up to `k` distinct-ish paths from `source` to `target`, each
/// returned as an ordered list of TEN edges. After each path is found,
/// every edge it used has its weight incremented by 1 before the next
/// search, nudging subsequent searches toward a different route. Fewer
/// than `k` paths are returned if the graph is exhausted of routes that
/// reach `target` at all.
pub fn k_shortest_paths(
    ten: &Ten,
    source: NodeIndex,
    target: NodeIndex,
    k: u32,
) -> Vec<Vec<EdgeIndex>> {
    let mut inflation: HashMap<EdgeIndex, f64> = HashMap::new();
    let mut results = Vec::new();
    for _ in 0..k {
        match shortest_path_edges(ten, source, target, &inflation) {
            Some(edges) => {
                for &e in &edges {
                    *inflation.entry(e).or_insert(0.0) += 1.0;
                }
                results.push(edges);
            }
            None => break,
        }
    }
    results
}

fn shortest_path_edges(
    ten: &Ten,
    source: NodeIndex,
    target: NodeIndex,
    inflation: &HashMap<EdgeIndex, f64>,
) -> Option<Vec<EdgeIndex>> {
    let (_, nodes) = astar(
        ten.graph(),
        source,
        |n| n == target,
        |edge| ten.base_weight(edge.id()) + inflation.get(&edge.id()).copied().unwrap_or(0.0),
        |_| 0.0,
    )?;

    let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
    for pair in nodes.windows(2) {
        let e = ten.graph().find_edge(pair[0], pair[1])?;
        edges.push(e);
    }
    Some(edges)
}
