//! Translate a time-expanded-network path into the cell sequence a caller
//! actually wants.

use petgraph::graph::EdgeIndex;

use crate::ten::{Ten, TenEdgeKind, TenNodeKind};
use crate::topology::TrackGraph;
use crate::types::CellCoord;

/// Total path cost: the sum of edge weights along the path. A within-cell
/// switch is instantaneous (weight 0); crossing into a neighboring cell or
/// waiting in place each cost one unit, so this equals the number of grid
/// cells actually advanced plus any waits.
pub fn path_cost(ten: &Ten, edges: &[EdgeIndex]) -> f64 {
    edges.iter().map(|&e| ten.base_weight(e)).sum()
}

/// Number of TEN edges in the path that are not source/sink connectors,
/// i.e. the number of discrete time layers the path spans.
pub fn path_hops(ten: &Ten, edges: &[EdgeIndex]) -> usize {
    edges
        .iter()
        .filter(|&&e| !matches!(ten.graph()[e].kind, TenEdgeKind::Connector))
        .count()
}

/// Collapse a TEN edge path into an ordered, deduplicated cell sequence,
/// starting at the commodity's initial cell and ending at its target.
pub fn collapse_to_cells(ten: &Ten, track: &TrackGraph, edges: &[EdgeIndex]) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    for &e in edges {
        let (u, _v) = ten.graph().edge_endpoints(e).unwrap();
        if let Some((face, _t)) = ten.face_of(u) {
            let cell = track.face_at(face).cell;
            if cells.last() != Some(&cell) {
                cells.push(cell);
            }
        }
    }
    // The path's final node (the in-face feeding the sink) is never a
    // source of an edge in the loop above; pick it up explicitly.
    if let Some(&last_edge) = edges.last() {
        let (_u, v) = ten.graph().edge_endpoints(last_edge).unwrap();
        match ten.graph()[v] {
            TenNodeKind::Face { face, .. } => {
                let cell = track.face_at(face).cell;
                if cells.last() != Some(&cell) {
                    cells.push(cell);
                }
            }
            TenNodeKind::Sink(_) => {}
            TenNodeKind::Source(_) => {}
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodity::Commodity;
    use crate::grid::{encode, Grid, TransitionMap};
    use crate::pathfinding::k_shortest_paths;
    use crate::types::Direction;

    #[test]
    fn straight_corridor_collapses_to_three_cells() {
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
        let ten = Ten::build(&track, &commodities, 6, 1, true);
        let paths = k_shortest_paths(&ten, ten.source(0), ten.sink(0), 1);
        let edges = &paths[0];
        let cells = collapse_to_cells(&ten, &track, edges);
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(0, 2)
            ]
        );
        assert_eq!(path_cost(&ten, edges), 2.0);
        assert_eq!(path_hops(&ten, edges), 3);
    }
}
