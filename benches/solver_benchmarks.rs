//! Benchmarks for the column-generation solve loop on grids of varying size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
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

fn straight_ew_grid(len: usize) -> Grid {
    let mut map = TransitionMap::new();
    map.insert(Direction::East, vec![Direction::East]);
    map.insert(Direction::West, vec![Direction::West]);
    let bits = encode(&map);
    Grid::new(1, len, vec![bits; len]).unwrap()
}

/// A len x len grid of four-way diamond crossings: every cell connects
/// straight through in all four directions, so any two cells are reachable.
fn open_square_grid(len: usize) -> Grid {
    let mut cross = TransitionMap::new();
    cross.insert(Direction::North, vec![Direction::North]);
    cross.insert(Direction::South, vec![Direction::South]);
    cross.insert(Direction::East, vec![Direction::East]);
    cross.insert(Direction::West, vec![Direction::West]);
    let bits = encode(&cross);
    Grid::new(len, len, vec![bits; len * len]).unwrap()
}

fn bench_single_agent_corridor(c: &mut Criterion) {
    let mut group = c.benchmark_group("SingleAgentCorridor");

    for len in [4usize, 8, 16, 32].iter() {
        let grid = straight_ew_grid(*len);
        let router = Router::new(grid, RouterConfig::default()).unwrap();
        let agents = vec![Agent::new(
            CellCoord::new(0, 0),
            Direction::East,
            CellCoord::new(0, len - 1),
        )];

        group.bench_with_input(BenchmarkId::new("corridor", len), len, |b, _| {
            b.iter(|| router.solve(black_box(&agents)).unwrap())
        });
    }

    group.finish();
}

fn bench_multi_agent_open_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("MultiAgentOpenGrid");

    for num_agents in [2usize, 4, 6].iter() {
        let side = 6;
        let grid = open_square_grid(side);
        let mut config = RouterConfig::default();
        config.horizon = Some((side * 4) as u32);
        let router = Router::new(grid, config).unwrap();

        // Agents enter along the top row heading South and leave along the
        // bottom row, each at a distinct column so they never share a start
        // or target cell.
        let agents: Vec<Agent> = (0..*num_agents)
            .map(|i| {
                let col = i % side;
                Agent::new(
                    CellCoord::new(0, col),
                    Direction::South,
                    CellCoord::new(side - 1, col),
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("agents", num_agents),
            num_agents,
            |b, _| b.iter(|| router.solve(black_box(&agents)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_agent_corridor,
    bench_multi_agent_open_grid,
);
criterion_main!(benches);
