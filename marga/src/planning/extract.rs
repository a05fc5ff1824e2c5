//! Route extraction from converged cost estimates.
//!
//! Starting at the start cell, the walk repeatedly steps to the free
//! neighbour minimising `g[s'] + c(current, s')`. It reads `g` values only and
//! never triggers further planning.

use tracing::{debug, warn};

use super::dstar_lite::DStarLite;
use crate::core::{Cell, edge_cost, route_cost};
use crate::error::{MargaError, Result};

/// Ordered list of cells, start first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    cells: Vec<Cell>,
}

impl Route {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells, endpoints included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Sum of edge costs along the route
    pub fn cost(&self) -> f64 {
        route_cost(&self.cells)
    }
}

/// Result of walking the cost field.
#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
    /// Route from start to goal
    Reached(Route),
    /// Goal not reachable; route ends at the last cell the walk could reach
    Unreachable(Route),
}

impl PathOutcome {
    pub fn route(&self) -> &Route {
        match self {
            PathOutcome::Reached(route) | PathOutcome::Unreachable(route) => route,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, PathOutcome::Reached(_))
    }
}

/// Walk the converged cost field of `planner` from start to goal.
///
/// Returns [`MargaError::PathExtraction`] if the walk grows longer than the
/// number of grid cells, which means the cost field is not consistent.
pub fn extract_path(planner: &DStarLite) -> Result<PathOutcome> {
    let grid = planner.grid();
    let goal = planner.goal();
    let max_len = grid.len();

    let mut current = planner.start();
    if !grid.is_free(current) {
        warn!("Start {} is blocked", current);
        return Ok(PathOutcome::Unreachable(Route::default()));
    }
    let mut cells = vec![current];

    while current != goal {
        let next = grid
            .free_neighbors(current)
            .map(|s| (s, planner.g(s) + edge_cost(current, s)))
            .filter(|(_, cost)| cost.is_finite())
            .fold(None, |best: Option<(Cell, f64)>, (s, cost)| match best {
                Some((_, best_cost)) if best_cost <= cost => best,
                _ => Some((s, cost)),
            });

        let Some((next, _)) = next else {
            warn!(
                "No path from {} to {}: stuck at {} after {} cells",
                planner.start(),
                goal,
                current,
                cells.len()
            );
            return Ok(PathOutcome::Unreachable(Route::new(cells)));
        };

        cells.push(next);
        current = next;

        if cells.len() > max_len {
            return Err(MargaError::PathExtraction { steps: cells.len() });
        }
    }

    let route = Route::new(cells);
    debug!(
        "Extracted route: {} cells, cost {:.3}",
        route.len(),
        route.cost()
    );
    Ok(PathOutcome::Reached(route))
}
