//! Directed cell-face graph built from a decoded grid, plus the two
//! conflict constraint families (position, swap) that live on it.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::grid::{decode, Grid};
use crate::topology::face::FaceNode;
use crate::types::CellCoord;

/// The set of internal track-graph edges that occupy one cell. Used to
/// prevent two trains from ever sharing a cell at the same time step.
#[derive(Debug, Clone)]
pub struct PositionConstraint {
    pub cell: CellCoord,
    pub edges: Vec<EdgeIndex>,
}

/// The pair of opposite external edges crossing between two adjacent cells.
/// Used to prevent a head-on swap across one edge in a single time step.
#[derive(Debug, Clone)]
pub struct SwapConstraint {
    pub cell_a: CellCoord,
    pub cell_b: CellCoord,
    pub edges: [EdgeIndex; 2],
}

/// A directed graph of cell-face nodes, assembled once per grid.
#[derive(Debug, Clone)]
pub struct TrackGraph {
    graph: DiGraph<FaceNode, ()>,
    index: HashMap<FaceNode, NodeIndex>,
    position_constraints: Vec<PositionConstraint>,
    swap_constraints: Vec<SwapConstraint>,
}

impl TrackGraph {
    pub fn graph(&self) -> &DiGraph<FaceNode, ()> {
        &self.graph
    }

    pub fn node_index(&self, face: &FaceNode) -> Option<NodeIndex> {
        self.index.get(face).copied()
    }

    pub fn face_at(&self, node: NodeIndex) -> &FaceNode {
        &self.graph[node]
    }

    pub fn position_constraints(&self) -> &[PositionConstraint] {
        &self.position_constraints
    }

    pub fn swap_constraints(&self) -> &[SwapConstraint] {
        &self.swap_constraints
    }

    /// The face nodes that actually exist for a cell (only faces touched by
    /// at least one internal transition are materialized, matching the
    /// behavior of dropping isolated nodes before time expansion).
    pub fn faces_of(&self, cell: CellCoord) -> Vec<NodeIndex> {
        self.index
            .iter()
            .filter(|(face, _)| face.cell == cell)
            .map(|(_, &n)| n)
            .collect()
    }

    fn get_or_create(
        graph: &mut DiGraph<FaceNode, ()>,
        index: &mut HashMap<FaceNode, NodeIndex>,
        face: FaceNode,
    ) -> NodeIndex {
        *index.entry(face).or_insert_with(|| graph.add_node(face))
    }

    /// Build the track graph from a decoded grid.
    ///
    /// A face named by direction `x` represents the boundary on the `x`
    /// side of the cell. Internal edges connect `in(cell, opp(in_dir)) ->
    /// out(cell, out_dir)` for every permitted transition, since a train
    /// currently heading `in_dir` is physically observed entering through
    /// the boundary opposite its heading. External edges connect
    /// `out(cell, d) -> in(neighbor, opp(d))` to the geometric neighbor
    /// stepped from `cell` in direction `d`, for the same reason: heading
    /// `d` into the neighbor crosses its boundary opposite `d`.
    pub fn build(grid: &Grid) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<FaceNode, NodeIndex> = HashMap::new();
        let mut position_constraints = Vec::new();
        let mut nonempty_cells: HashSet<CellCoord> = HashSet::new();

        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let cell = CellCoord::new(row, col);
                let bits = grid.get(row, col);
                if bits == 0 {
                    continue;
                }
                let transitions = decode(bits);
                if transitions.is_empty() {
                    continue;
                }
                nonempty_cells.insert(cell);

                let mut cell_edges = Vec::new();
                for (&in_dir, outs) in transitions.iter() {
                    let in_face = FaceNode::in_face(cell, in_dir.opposite());
                    let in_node = Self::get_or_create(&mut graph, &mut index, in_face);
                    for &out_dir in outs {
                        let out_face = FaceNode::out_face(cell, out_dir);
                        let out_node = Self::get_or_create(&mut graph, &mut index, out_face);
                        let e = graph.add_edge(in_node, out_node, ());
                        cell_edges.push(e);
                    }
                }
                position_constraints.push(PositionConstraint {
                    cell,
                    edges: cell_edges,
                });
            }
        }

        let mut swap_constraints = Vec::new();
        let mut seen_pairs: HashMap<(CellCoord, CellCoord), usize> = HashMap::new();

        for &cell in &nonempty_cells {
            for &d in &crate::types::Direction::ALL {
                let Some(&out_node) = index.get(&FaceNode::out_face(cell, d)) else {
                    continue;
                };
                let Some(neighbor) = cell.step(d, grid.rows, grid.cols) else {
                    continue;
                };
                if !nonempty_cells.contains(&neighbor) {
                    continue;
                }
                let in_face = FaceNode::in_face(neighbor, d.opposite());
                let in_node = Self::get_or_create(&mut graph, &mut index, in_face);
                let edge = graph.add_edge(out_node, in_node, ());

                let key = if cell < neighbor {
                    (cell, neighbor)
                } else {
                    (neighbor, cell)
                };
                match seen_pairs.get(&key) {
                    None => {
                        seen_pairs.insert(key, swap_constraints.len());
                        swap_constraints.push(SwapConstraint {
                            cell_a: key.0,
                            cell_b: key.1,
                            edges: [edge, edge],
                        });
                    }
                    Some(&idx) => {
                        swap_constraints[idx].edges[1] = edge;
                    }
                }
            }
        }

        // A swap constraint only matters if both directions are actually
        // present; a one-way external edge has no opposite to swap with.
        swap_constraints.retain(|c| c.edges[0] != c.edges[1]);

        Self {
            graph,
            index,
            position_constraints,
            swap_constraints,
        }
    }
}
