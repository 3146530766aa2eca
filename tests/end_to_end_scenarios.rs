//! Literal end-to-end routing scenarios.

use railten::grid::TransitionMap;
use railten::prelude::*;
use railten::types::Direction;

fn encode(map: &TransitionMap) -> u16 {
    let mut value: u16 = 0;
    for (&in_dir, outs) in map.iter() {
        for &out_dir in outs {
            let shift = (3 - in_dir.bit_index()) * 4 + (3 - out_dir.bit_index());
            value |= 1 << shift;
        }
    }
    value
}

fn straight_ew_bits() -> u16 {
    let mut map = TransitionMap::new();
    map.insert(Direction::East, vec![Direction::East]);
    map.insert(Direction::West, vec![Direction::West]);
    encode(&map)
}

#[test]
fn straight_corridor_single_agent_scores_two() {
    let bits = straight_ew_bits();
    let grid = Grid::new(1, 3, vec![bits; 3]).unwrap();
    let router = Router::new(grid, RouterConfig::default()).unwrap();
    let agents = vec![Agent::new(
        CellCoord::new(0, 0),
        Direction::East,
        CellCoord::new(0, 2),
    )];
    let solution = router.solve(&agents).unwrap();
    assert_eq!(solution.statuses, vec![CommodityStatus::Ok]);
    assert_eq!(solution.score, 2.0);
    assert_eq!(
        solution.paths[0],
        Some(vec![
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(0, 2)
        ])
    );
}

#[test]
fn head_on_corridor_with_no_siding_and_no_slack_is_infeasible() {
    let bits = straight_ew_bits();
    let grid = Grid::new(1, 4, vec![bits; 4]).unwrap();
    let mut config = RouterConfig::default();
    // Exactly the 3 hops either train needs end to end: no room for either
    // to wait out the other, so the two must meet head-on in the middle.
    config.horizon = Some(3);
    let router = Router::new(grid, config).unwrap();
    let agents = vec![
        Agent::new(CellCoord::new(0, 0), Direction::East, CellCoord::new(0, 3)),
        Agent::new(CellCoord::new(0, 3), Direction::West, CellCoord::new(0, 0)),
    ];
    let solution = router.solve(&agents).unwrap();
    assert!(solution
        .statuses
        .iter()
        .any(|s| *s != CommodityStatus::Ok));
}

#[test]
fn crossing_grid_one_commodity_waits_for_the_other() {
    // 3x3 grid with a diamond crossing at the center cell (1,1); the rest
    // of the cross arms are straight track, everything else empty.
    let mut cells = vec![0u16; 9];
    let idx = |r: usize, c: usize| r * 3 + c;

    let mut ns = TransitionMap::new();
    ns.insert(Direction::North, vec![Direction::North]);
    ns.insert(Direction::South, vec![Direction::South]);
    let ns_bits = encode(&ns);

    let mut ew = TransitionMap::new();
    ew.insert(Direction::East, vec![Direction::East]);
    ew.insert(Direction::West, vec![Direction::West]);
    let ew_bits = encode(&ew);

    cells[idx(0, 1)] = ns_bits;
    cells[idx(2, 1)] = ns_bits;
    cells[idx(1, 0)] = ew_bits;
    cells[idx(1, 2)] = ew_bits;

    // A diamond crossing: both the vertical and horizontal moves pass
    // straight through, but they still occupy the same cell at once.
    let mut switch = TransitionMap::new();
    switch.insert(Direction::North, vec![Direction::North]);
    switch.insert(Direction::South, vec![Direction::South]);
    switch.insert(Direction::East, vec![Direction::East]);
    switch.insert(Direction::West, vec![Direction::West]);
    cells[idx(1, 1)] = encode(&switch);

    let grid = Grid::new(3, 3, cells).unwrap();
    let mut config = RouterConfig::default();
    config.horizon = Some(8);
    let router = Router::new(grid, config).unwrap();
    let agents = vec![
        Agent::new(CellCoord::new(0, 1), Direction::South, CellCoord::new(2, 1)),
        Agent::new(CellCoord::new(1, 0), Direction::East, CellCoord::new(1, 2)),
    ];
    let solution = router.solve(&agents).unwrap();
    assert_eq!(solution.statuses, vec![CommodityStatus::Ok, CommodityStatus::Ok]);
    // Both agents cross in 2 hops each (4 total), but one must wait a step
    // at the center cell to avoid the position conflict, for 5 exactly.
    assert_eq!(solution.score, 5.0);
}

#[test]
fn dead_end_u_turn_visits_the_terminal_cell_once() {
    // Row 2 is the bottom of a vertical spur with its only opening to the
    // north (row 1): a train arriving heading South reverses to North.
    let mut map = TransitionMap::new();
    map.insert(Direction::South, vec![Direction::North]);
    let dead_end_bits = encode(&map);

    let mut ns = TransitionMap::new();
    ns.insert(Direction::North, vec![Direction::North]);
    ns.insert(Direction::South, vec![Direction::South]);
    let ns_bits = encode(&ns);

    let grid = Grid::new(3, 1, vec![ns_bits, ns_bits, dead_end_bits]).unwrap();
    let mut config = RouterConfig::default();
    config.horizon = Some(8);
    let router = Router::new(grid, config).unwrap();
    // Starts in the middle of the spur already heading South, into the dead
    // end, with a target back at the open north end: the only way there is
    // through the terminal cell and back.
    let agents = vec![Agent::new(
        CellCoord::new(1, 0),
        Direction::South,
        CellCoord::new(0, 0),
    )];
    let solution = router.solve(&agents).unwrap();
    assert_eq!(solution.statuses[0], CommodityStatus::Ok);
    let path = solution.paths[0].as_ref().unwrap();
    let terminal_visits = path.iter().filter(|&&c| c == CellCoord::new(2, 0)).count();
    assert_eq!(terminal_visits, 1);
    assert_eq!(path.last(), Some(&CellCoord::new(0, 0)));
}

#[test]
fn empty_grid_rejects_every_agent() {
    let grid = Grid::new(2, 2, vec![0, 0, 0, 0]).unwrap();
    let router = Router::new(grid, RouterConfig::default()).unwrap();
    let agents = vec![Agent::new(
        CellCoord::new(0, 0),
        Direction::East,
        CellCoord::new(1, 1),
    )];
    assert!(router.solve(&agents).is_err());
}
