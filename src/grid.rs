//! Grid input and per-cell transition decoding.
//!
//! Each grid cell is a 16-bit integer: four 4-bit nibbles, one per incoming
//! direction in N,E,S,W order, each nibble's bits giving the permitted
//! outgoing directions in the same N,E,S,W order. A value of 0 means no
//! rail at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};
use crate::types::Direction;

/// A row-major grid of rail cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<u16>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, cells: Vec<u16>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(RouterError::InvalidGrid(
                "grid must have at least one row and column".to_string(),
            ));
        }
        if cells.len() != rows * cols {
            return Err(RouterError::InvalidGrid(format!(
                "expected {} cells for a {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.cells[row * self.cols + col]
    }

    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 0
    }
}

/// Decoded permitted transitions for one cell: for each incoming direction,
/// the list of legal outgoing directions.
pub type TransitionMap = BTreeMap<Direction, Vec<Direction>>;

/// Decode a cell's 16-bit transition value into a transition map.
///
/// A dead end is authored as a single entry whose only permitted exit is the
/// 180-degree reversal of the entry direction, e.g. entering heading North
/// with the sole exit heading South. No rewrite is needed for the track
/// graph to read this as a U-turn: the entry face and the exit face both
/// land on the boundary opposite the entry heading, which is the cell's one
/// real opening, so the two faces coincide with the wall side never
/// referenced.
pub fn decode(cell: u16) -> TransitionMap {
    let mut map = TransitionMap::new();
    for in_dir in Direction::ALL {
        let nibble = (cell >> ((3 - in_dir.bit_index()) * 4)) & 0xF;
        let mut outs = Vec::new();
        for out_dir in Direction::ALL {
            let bit = 3 - out_dir.bit_index();
            if (nibble >> bit) & 1 == 1 {
                outs.push(out_dir);
            }
        }
        if !outs.is_empty() {
            map.insert(in_dir, outs);
        }
    }
    map
}

/// Encode a transition map back into a 16-bit value, the exact inverse of
/// [`decode`]. Test-only: production callers only ever decode grids supplied
/// by the caller.
#[cfg(test)]
pub fn encode(map: &TransitionMap) -> u16 {
    let mut value: u16 = 0;
    for (&in_dir, outs) in map.iter() {
        for &out_dir in outs {
            let shift = (3 - in_dir.bit_index()) * 4 + (3 - out_dir.bit_index());
            value |= 1 << shift;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encode_decode_is_a_bit_level_round_trip(bits in any::<u16>()) {
            let decoded = decode(bits);
            prop_assert_eq!(encode(&decoded), bits);
        }
    }

    #[test]
    fn straight_east_west_cell() {
        // N->S and S->N is a common straight track encoding used by flatland-style grids.
        let mut map = TransitionMap::new();
        map.insert(Direction::East, vec![Direction::East]);
        map.insert(Direction::West, vec![Direction::West]);
        let bits = encode(&map);
        let decoded = decode(bits);
        assert_eq!(decoded.get(&Direction::East), Some(&vec![Direction::East]));
        assert_eq!(decoded.get(&Direction::West), Some(&vec![Direction::West]));
    }

    #[test]
    fn dead_end_decodes_unchanged() {
        let mut map = TransitionMap::new();
        map.insert(Direction::North, vec![Direction::South]);
        let bits = encode(&map);
        let decoded = decode(bits);
        assert_eq!(decoded.get(&Direction::North), Some(&vec![Direction::South]));
        assert!(decoded.get(&Direction::South).is_none());
    }

    #[test]
    fn empty_cell_decodes_to_empty_map() {
        assert!(decode(0).is_empty());
    }

    #[test]
    fn switch_cell_is_not_a_dead_end() {
        let mut map = TransitionMap::new();
        map.insert(Direction::North, vec![Direction::South, Direction::East]);
        let bits = encode(&map);
        let decoded = decode(bits);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[&Direction::North].len(), 2);
    }
}
