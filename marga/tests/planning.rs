//! Planning integration tests for Marga.
//!
//! These tests check converged D* Lite costs and extracted routes against an
//! independent Dijkstra search, and incremental re-plans against fresh plans.

mod common;

use std::f64::consts::SQRT_2;

use approx::assert_relative_eq;
use common::{
    assert_start_matches_oracle, grid_from_ascii, open_grid, oracle_cost, planned, wall_with_gap,
};
use marga::{
    Cell, CellChange, DStarLite, OccupancyGrid, PathOutcome, extract_path, select_start_goal,
};

fn assert_valid_route(planner: &DStarLite, cells: &[Cell]) {
    let grid = planner.grid();
    assert_eq!(cells.first(), Some(&planner.start()));
    for &cell in cells {
        assert!(grid.is_free(cell), "route crosses obstacle at {}", cell);
    }
    for pair in cells.windows(2) {
        assert!(
            pair[0].is_adjacent(&pair[1]),
            "{} and {} are not adjacent",
            pair[0],
            pair[1]
        );
    }
}

const MAZE: [&str; 8] = [
    "..........",
    ".######.#.",
    ".#....#.#.",
    ".#.##.#.#.",
    ".#.#..#...",
    ".#.#.####.",
    "...#......",
    "####.####.",
];

// ============================================================================
// Optimality
// ============================================================================

#[test]
fn test_open_grid_diagonal_cost() {
    let planner = planned(open_grid(5, 5), Cell::new(0, 0), Cell::new(4, 4));

    assert_relative_eq!(planner.g(Cell::new(0, 0)), 4.0 * SQRT_2, epsilon = 1e-9);

    let outcome = extract_path(&planner).unwrap();
    let PathOutcome::Reached(route) = outcome else {
        panic!("expected a route");
    };
    assert_eq!(route.len(), 5);
    assert_eq!(route.last(), Some(Cell::new(4, 4)));
    assert_relative_eq!(route.cost(), 4.0 * SQRT_2, epsilon = 1e-9);
}

#[test]
fn test_maze_matches_oracle() {
    let grid = grid_from_ascii(&MAZE);
    let endpoints = [
        (Cell::new(0, 0), Cell::new(7, 9)),
        (Cell::new(2, 2), Cell::new(4, 4)),
        (Cell::new(6, 0), Cell::new(0, 9)),
        (Cell::new(7, 4), Cell::new(2, 5)),
    ];

    for (start, goal) in endpoints {
        let planner = planned(grid.clone(), start, goal);
        assert_start_matches_oracle(&planner);
        assert!(planner.is_consistent(start));

        let outcome = extract_path(&planner).unwrap();
        assert!(outcome.is_reached(), "{} -> {} unreachable", start, goal);
        let route = outcome.route();
        assert_valid_route(&planner, route.cells());
        assert_eq!(route.last(), Some(goal));
        assert_relative_eq!(route.cost(), oracle_cost(&planner), epsilon = 1e-9);
    }
}

#[test]
fn test_route_cost_equals_start_estimate() {
    let planner = planned(
        wall_with_gap(12, 9, 6, 2),
        Cell::new(8, 0),
        Cell::new(8, 11),
    );

    let outcome = extract_path(&planner).unwrap();
    assert_relative_eq!(
        outcome.route().cost(),
        planner.g(planner.start()),
        epsilon = 1e-9
    );
}

// ============================================================================
// Obstacles and gaps
// ============================================================================

#[test]
fn test_routes_through_single_gap() {
    let planner = planned(
        wall_with_gap(11, 11, 5, 7),
        Cell::new(0, 0),
        Cell::new(0, 10),
    );

    let outcome = extract_path(&planner).unwrap();
    assert!(outcome.is_reached());
    assert!(outcome.route().contains(Cell::new(7, 5)));
    assert_valid_route(&planner, outcome.route().cells());
    assert_start_matches_oracle(&planner);
}

#[test]
fn test_obstacle_costs_stay_infinite() {
    let planner = planned(grid_from_ascii(&MAZE), Cell::new(0, 0), Cell::new(7, 9));
    let grid = planner.grid();

    for index in 0..grid.len() {
        let cell = grid.cell_at(index);
        if !grid.is_free(cell) {
            assert!(planner.g(cell).is_infinite());
            assert!(planner.rhs(cell).is_infinite());
        }
    }
}

#[test]
fn test_disconnected_regions_unreachable() {
    let grid = grid_from_ascii(&["...#...", "...#...", "...#..."]);
    let planner = planned(grid, Cell::new(1, 0), Cell::new(1, 6));

    assert!(planner.g(Cell::new(1, 0)).is_infinite());
    assert!(planner.is_consistent(Cell::new(1, 0)));

    let outcome = extract_path(&planner).unwrap();
    assert_eq!(
        outcome,
        PathOutcome::Unreachable(marga::Route::new(vec![Cell::new(1, 0)]))
    );
}

#[test]
fn test_rerun_after_convergence_is_noop() {
    let mut planner = planned(grid_from_ascii(&MAZE), Cell::new(0, 0), Cell::new(7, 9));
    let before: Vec<f64> = (0..planner.grid().len())
        .map(|i| planner.g(planner.grid().cell_at(i)))
        .collect();

    let stats = planner.compute_shortest_path();

    assert_eq!(stats.expansions, 0);
    assert!(stats.reachable);
    for (i, &g) in before.iter().enumerate() {
        let cell = planner.grid().cell_at(i);
        assert!(g == planner.g(cell) || (g.is_infinite() && planner.g(cell).is_infinite()));
    }
}

// ============================================================================
// Start/goal selection
// ============================================================================

#[test]
fn test_selection_prefers_larger_region() {
    // 10-cell strip on top, 100-cell block below, separated by a wall row
    let grid = OccupancyGrid::from_fn(10, 12, |row, _| row == 0 || row >= 2);
    let (start, goal) = select_start_goal(&grid).unwrap();

    assert_eq!(start, Cell::new(2, 0));
    assert_eq!(goal, Cell::new(11, 9));

    let planner = planned(grid, start, goal);
    assert_relative_eq!(planner.g(start), 9.0 * SQRT_2, epsilon = 1e-9);
}

#[test]
fn test_selected_endpoints_always_reachable() {
    let grid = grid_from_ascii(&MAZE);
    let (start, goal) = select_start_goal(&grid).unwrap();

    let planner = planned(grid, start, goal);
    let outcome = extract_path(&planner).unwrap();
    assert!(outcome.is_reached());
}

// ============================================================================
// Incremental re-planning
// ============================================================================

#[test]
fn test_blocking_route_matches_fresh_plan() {
    let start = Cell::new(5, 0);
    let goal = Cell::new(5, 14);
    let mut planner = planned(open_grid(15, 11), start, goal);
    assert_relative_eq!(planner.g(start), 14.0, epsilon = 1e-9);

    // Wall across column 7 leaving row 0 open
    let changes: Vec<CellChange> = (1..11).map(|r| CellChange::blocked(Cell::new(r, 7))).collect();
    let stats = planner.apply_edge_cost_change(&changes);
    assert!(stats.reachable);

    let fresh = planned(planner.grid().clone(), start, goal);
    assert_relative_eq!(planner.g(start), fresh.g(start), epsilon = 1e-9);
    assert_start_matches_oracle(&planner);

    let outcome = extract_path(&planner).unwrap();
    assert!(outcome.route().contains(Cell::new(0, 7)));
    assert_valid_route(&planner, outcome.route().cells());
}

#[test]
fn test_clearing_restores_shorter_route() {
    let start = Cell::new(0, 0);
    let goal = Cell::new(0, 10);
    let mut planner = planned(wall_with_gap(11, 11, 5, 10), start, goal);
    let detour = planner.g(start);

    let stats = planner.apply_edge_cost_change(&[CellChange::cleared(Cell::new(0, 5))]);

    assert!(stats.reachable);
    assert_relative_eq!(planner.g(start), 10.0, epsilon = 1e-9);
    assert!(planner.g(start) < detour);
    assert_start_matches_oracle(&planner);
}

#[test]
fn test_sealing_goal_makes_it_unreachable() {
    let start = Cell::new(0, 0);
    let goal = Cell::new(4, 4);
    let mut planner = planned(open_grid(5, 5), start, goal);

    let ring: Vec<CellChange> = [(3, 3), (3, 4), (4, 3)]
        .into_iter()
        .map(|(r, c)| CellChange::blocked(Cell::new(r, c)))
        .collect();
    let stats = planner.apply_edge_cost_change(&ring);

    assert!(!stats.reachable);
    assert!(planner.g(start).is_infinite());
    assert!(!extract_path(&planner).unwrap().is_reached());
}

#[test]
fn test_move_then_replan_matches_fresh_plan() {
    let goal = Cell::new(9, 9);
    let grid = grid_from_ascii(&[
        "..........",
        "..........",
        "..........",
        "...####...",
        "..........",
        "..........",
        "......#...",
        "......#...",
        "......#...",
        "..........",
    ]);
    let mut planner = planned(grid, Cell::new(0, 0), goal);

    // Walk two steps along the current route, then see new obstacles
    let route = extract_path(&planner).unwrap().route().clone();
    let next = route.cells()[2];
    planner.move_start(next).unwrap();
    assert!(planner.k_m() > 0.0);

    let changes = [
        CellChange::blocked(Cell::new(4, 4)),
        CellChange::blocked(Cell::new(5, 5)),
        CellChange::blocked(Cell::new(9, 6)),
    ];
    planner.apply_edge_cost_change(&changes);

    let fresh = planned(planner.grid().clone(), next, goal);
    assert_relative_eq!(planner.g(next), fresh.g(next), epsilon = 1e-9);
    assert_start_matches_oracle(&planner);

    let outcome = extract_path(&planner).unwrap();
    assert!(outcome.is_reached());
    assert_valid_route(&planner, outcome.route().cells());
    assert_relative_eq!(outcome.route().cost(), fresh.g(next), epsilon = 1e-9);
}
