//! Test utilities for Marga integration tests.
//!
//! Grid fixtures and an independent Dijkstra oracle over the same 8-connected
//! move model the planner uses.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use marga::{Cell, DStarLite, OccupancyGrid, edge_cost};

/// Parse an ASCII grid: `.` is free, anything else is an obstacle.
pub fn grid_from_ascii(rows: &[&str]) -> OccupancyGrid {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    OccupancyGrid::from_fn(width, height, |row, col| {
        rows[row].as_bytes()[col] == b'.'
    })
}

/// Fully free grid.
pub fn open_grid(width: usize, height: usize) -> OccupancyGrid {
    OccupancyGrid::filled(width, height, true)
}

/// Free grid with a vertical wall at `wall_col`, open only at `gap_row`.
pub fn wall_with_gap(width: usize, height: usize, wall_col: usize, gap_row: usize) -> OccupancyGrid {
    OccupancyGrid::from_fn(width, height, |row, col| col != wall_col || row == gap_row)
}

/// Planner initialised on `grid` and run to convergence.
pub fn planned(grid: OccupancyGrid, start: Cell, goal: Cell) -> DStarLite {
    let mut planner = DStarLite::new(grid);
    planner
        .initialize(start, goal)
        .expect("endpoints should be free and in bounds");
    planner.compute_shortest_path();
    planner
}

#[derive(Clone, Copy, PartialEq)]
struct OracleEntry {
    cost: f64,
    index: usize,
}

impl Eq for OracleEntry {}

impl Ord for OracleEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for OracleEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Exact cost-to-goal for every cell, infinite where unreachable or blocked.
pub fn dijkstra_from_goal(grid: &OccupancyGrid, goal: Cell) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; grid.len()];
    let Some(goal_index) = grid.index(goal) else {
        return dist;
    };
    if !grid.is_free(goal) {
        return dist;
    }

    let mut heap = BinaryHeap::new();
    dist[goal_index] = 0.0;
    heap.push(OracleEntry {
        cost: 0.0,
        index: goal_index,
    });

    while let Some(OracleEntry { cost, index }) = heap.pop() {
        if cost > dist[index] {
            continue;
        }
        let cell = grid.cell_at(index);
        for next in grid.free_neighbors(cell) {
            let Some(next_index) = grid.index(next) else {
                continue;
            };
            let candidate = cost + edge_cost(cell, next);
            if candidate < dist[next_index] {
                dist[next_index] = candidate;
                heap.push(OracleEntry {
                    cost: candidate,
                    index: next_index,
                });
            }
        }
    }

    dist
}

/// Oracle cost from the planner's start to its goal.
pub fn oracle_cost(planner: &DStarLite) -> f64 {
    let grid = planner.grid();
    let oracle = dijkstra_from_goal(grid, planner.goal());
    grid.index(planner.start())
        .map_or(f64::INFINITY, |i| oracle[i])
}

/// Assert that `g(start)` equals the oracle cost, both possibly infinite.
pub fn assert_start_matches_oracle(planner: &DStarLite) {
    let expected = oracle_cost(planner);
    let g_start = planner.g(planner.start());
    if expected.is_finite() {
        assert!(
            (g_start - expected).abs() < 1e-9,
            "g(start) = {}, oracle = {}",
            g_start,
            expected
        );
    } else {
        assert!(g_start.is_infinite(), "g(start) = {}, expected inf", g_start);
    }
}
