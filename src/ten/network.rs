//! Time-expanded network (TEN): the track graph replicated across discrete
//! time layers, with waiting self-loops and per-commodity source/sink
//! connectors, plus the position and swap constraint families lifted to
//! time-indexed edge sets.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex as PNodeIndex};

use crate::commodity::Commodity;
use crate::topology::TrackGraph;

/// What role a TEN node plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenNodeKind {
    /// A track-graph face node replicated at time layer `t`.
    Face { face: PNodeIndex, t: u32 },
    /// The super-source for commodity `k`.
    Source(usize),
    /// The super-sink for commodity `k`.
    Sink(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenEdgeKind {
    /// A track-graph edge replicated between two consecutive layers.
    Move,
    /// A same-face self-loop from layer `t` to `t+1`.
    Wait,
    /// A zero-weight connector from a source or to a sink.
    Connector,
}

#[derive(Debug, Clone, Copy)]
pub struct TenEdge {
    pub weight: f64,
    pub kind: TenEdgeKind,
}

/// One time-lifted position constraint: at most one commodity may occupy
/// `cell` during the interval `[t, t+1)`.
#[derive(Debug, Clone)]
pub struct TimedPositionConstraint {
    pub cell_index: usize,
    pub t: u32,
    pub edges: Vec<EdgeIndex>,
}

/// One time-lifted swap constraint: at most one of the two opposite
/// crossing edges between a cell pair may be used at time `t`.
#[derive(Debug, Clone)]
pub struct TimedSwapConstraint {
    pub pair_index: usize,
    pub t: u32,
    pub edges: [EdgeIndex; 2],
}

/// One constraint set a TEN edge may belong to, identified by its position
/// in `Ten::position_constraints()` / `Ten::swap_constraints()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKey {
    Position(usize),
    Swap(usize),
}

/// Reverse index from a TEN edge to every constraint set it participates
/// in, built once per solve and shared by the initial-solution generator
/// and the master problem.
pub struct ConstraintIndex {
    edge_constraints: HashMap<EdgeIndex, Vec<ConstraintKey>>,
}

impl ConstraintIndex {
    pub fn constraints_of(&self, edge: EdgeIndex) -> &[ConstraintKey] {
        self.edge_constraints
            .get(&edge)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

pub struct Ten {
    graph: DiGraph<TenNodeKind, TenEdge>,
    face_layer: HashMap<(PNodeIndex, u32), PNodeIndex>,
    horizon: u32,
    sources: Vec<PNodeIndex>,
    sinks: Vec<PNodeIndex>,
    position_constraints: Vec<TimedPositionConstraint>,
    swap_constraints: Vec<TimedSwapConstraint>,
}

impl Ten {
    pub fn graph(&self) -> &DiGraph<TenNodeKind, TenEdge> {
        &self.graph
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn source(&self, commodity: usize) -> PNodeIndex {
        self.sources[commodity]
    }

    pub fn sink(&self, commodity: usize) -> PNodeIndex {
        self.sinks[commodity]
    }

    pub fn position_constraints(&self) -> &[TimedPositionConstraint] {
        &self.position_constraints
    }

    pub fn swap_constraints(&self) -> &[TimedSwapConstraint] {
        &self.swap_constraints
    }

    /// The face node and time layer a TEN node represents, or `None` for a
    /// source/sink pseudo-node.
    pub fn face_of(&self, node: PNodeIndex) -> Option<(PNodeIndex, u32)> {
        match self.graph[node] {
            TenNodeKind::Face { face, t } => Some((face, t)),
            _ => None,
        }
    }

    pub fn base_weight(&self, edge: EdgeIndex) -> f64 {
        self.graph[edge].weight
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Build the edge-to-constraints reverse index (§4.3's
    /// `build_constraints` output contract). Cheap enough to rebuild once
    /// per solve; not cached since it is only needed by the initial
    /// solution generator and the master problem, each exactly once.
    pub fn build_constraint_index(&self) -> ConstraintIndex {
        let mut edge_constraints: HashMap<EdgeIndex, Vec<ConstraintKey>> = HashMap::new();
        for (i, pc) in self.position_constraints.iter().enumerate() {
            for &e in &pc.edges {
                edge_constraints
                    .entry(e)
                    .or_default()
                    .push(ConstraintKey::Position(i));
            }
        }
        for (i, sc) in self.swap_constraints.iter().enumerate() {
            for &e in &sc.edges {
                edge_constraints
                    .entry(e)
                    .or_default()
                    .push(ConstraintKey::Swap(i));
            }
        }
        ConstraintIndex { edge_constraints }
    }

    /// Build the time-expanded network for `horizon` layers (`0..=horizon`).
    pub fn build(
        track: &TrackGraph,
        commodities: &[Commodity],
        horizon: u32,
        waiting_cost: u32,
        use_direction: bool,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut face_layer: HashMap<(PNodeIndex, u32), PNodeIndex> = HashMap::new();

        for face in track.graph().node_indices() {
            for t in 0..=horizon {
                let n = graph.add_node(TenNodeKind::Face { face, t });
                face_layer.insert((face, t), n);
            }
        }

        // Replicate track edges across layers. A switch decision within one
        // cell (both endpoints on the same cell) is instantaneous and costs
        // nothing; only actually crossing into a neighboring cell spends a
        // unit of path length. Both kinds still advance the time layer by
        // one, so position/swap constraints lifted below need no special
        // casing.
        let mut move_edge_at: HashMap<(petgraph::graph::EdgeIndex, u32), EdgeIndex> =
            HashMap::new();
        for e in track.graph().edge_indices() {
            let (u, v) = track.graph().edge_endpoints(e).unwrap();
            let same_cell = track.face_at(u).cell == track.face_at(v).cell;
            let weight = if same_cell { 0.0 } else { 1.0 };
            for t in 0..horizon {
                let tail = face_layer[&(u, t)];
                let head = face_layer[&(v, t + 1)];
                let te = graph.add_edge(
                    tail,
                    head,
                    TenEdge {
                        weight,
                        kind: TenEdgeKind::Move,
                    },
                );
                move_edge_at.insert((e, t), te);
            }
        }

        // Waiting self-loops.
        let mut wait_edge_at: HashMap<(PNodeIndex, u32), EdgeIndex> = HashMap::new();
        for face in track.graph().node_indices() {
            for t in 0..horizon {
                let tail = face_layer[&(face, t)];
                let head = face_layer[&(face, t + 1)];
                let we = graph.add_edge(
                    tail,
                    head,
                    TenEdge {
                        weight: waiting_cost as f64,
                        kind: TenEdgeKind::Wait,
                    },
                );
                wait_edge_at.insert((face, t), we);
            }
        }

        // Lift position constraints.
        let mut position_constraints = Vec::new();
        for (cell_index, pc) in track.position_constraints().iter().enumerate() {
            let faces = track.faces_of(pc.cell);
            for t in 0..horizon {
                let mut edges: Vec<EdgeIndex> = pc
                    .edges
                    .iter()
                    .filter_map(|&e| move_edge_at.get(&(e, t)).copied())
                    .collect();
                for &f in &faces {
                    if let Some(&we) = wait_edge_at.get(&(f, t)) {
                        edges.push(we);
                    }
                }
                position_constraints.push(TimedPositionConstraint {
                    cell_index,
                    t,
                    edges,
                });
            }
        }

        // Lift swap constraints.
        let mut swap_constraints = Vec::new();
        for (pair_index, sc) in track.swap_constraints().iter().enumerate() {
            for t in 0..horizon {
                let e0 = move_edge_at.get(&(sc.edges[0], t)).copied();
                let e1 = move_edge_at.get(&(sc.edges[1], t)).copied();
                if let (Some(e0), Some(e1)) = (e0, e1) {
                    swap_constraints.push(TimedSwapConstraint {
                        pair_index,
                        t,
                        edges: [e0, e1],
                    });
                }
            }
        }

        // Source/sink connectors.
        let mut sources = Vec::with_capacity(commodities.len());
        let mut sinks = Vec::with_capacity(commodities.len());
        for (k, commodity) in commodities.iter().enumerate() {
            let src = graph.add_node(TenNodeKind::Source(k));
            for &d in crate::types::Direction::ALL.iter() {
                if use_direction && d != commodity.initial_direction {
                    continue;
                }
                if let Some(face) = track.node_index(&crate::topology::FaceNode::out_face(
                    commodity.start,
                    d,
                )) {
                    let head = face_layer[&(face, 0)];
                    graph.add_edge(
                        src,
                        head,
                        TenEdge {
                            weight: 0.0,
                            kind: TenEdgeKind::Connector,
                        },
                    );
                }
            }
            sources.push(src);

            let sink = graph.add_node(TenNodeKind::Sink(k));
            for &d in crate::types::Direction::ALL.iter() {
                if let Some(face) =
                    track.node_index(&crate::topology::FaceNode::in_face(commodity.target, d))
                {
                    for t in 1..=horizon {
                        let tail = face_layer[&(face, t)];
                        graph.add_edge(
                            tail,
                            sink,
                            TenEdge {
                                weight: 0.0,
                                kind: TenEdgeKind::Connector,
                            },
                        );
                    }
                }
            }
            sinks.push(sink);
        }

        Self {
            graph,
            face_layer,
            horizon,
            sources,
            sinks,
            position_constraints,
            swap_constraints,
        }
    }
}
