//! D* Lite incremental planner.
//!
//! The search runs backwards from the goal. Each cell carries two cost
//! estimates:
//!
//! - `g`: committed cost-to-goal
//! - `rhs`: one-step lookahead, `min(g[s'] + c(u, s'))` over free neighbours
//!
//! A cell is consistent when `g == rhs`. Inconsistent cells wait in the open
//! queue ordered by [`Key`]. The queue never updates entries in place: a cell
//! is pushed again whenever its key changes and outdated entries are
//! recognised and dropped when they reach the top.
//!
//! ```text
//! initialize(start, goal)        rhs[goal] = 0, push goal
//! compute_shortest_path()        pop/expand until start is consistent
//!                                and no queued key is below key(start)
//! move_start(cell)               k_m += h(old_start, cell)
//! apply_edge_cost_change(..)     edit grid, update touched cells, re-plan
//! ```
//!
//! All state is owned by one [`DStarLite`] value. Independent planners
//! share nothing and can run on separate threads.

use std::collections::BinaryHeap;

use tracing::{debug, info, trace, warn};

use super::key::{Key, QueueEntry};
use crate::core::{Cell, edge_cost, heuristic};
use crate::error::{MargaError, Result};
use crate::grid::OccupancyGrid;

/// Counters for one `compute_shortest_path` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Cells popped with a current key and expanded
    pub expansions: usize,
    /// `update_vertex` calls made during the run
    pub vertex_updates: usize,
    /// Entries dropped or re-queued because their key was outdated
    pub stale_pops: usize,
    /// Whether the start cell has a finite cost-to-goal afterwards
    pub reachable: bool,
}

/// A change of occupancy for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub cell: Cell,
    /// New state: `true` = free, `false` = obstacle
    pub free: bool,
}

impl CellChange {
    pub fn blocked(cell: Cell) -> Self {
        Self { cell, free: false }
    }

    pub fn cleared(cell: Cell) -> Self {
        Self { cell, free: true }
    }
}

/// D* Lite planning session over an owned occupancy grid.
#[derive(Clone, Debug)]
pub struct DStarLite {
    grid: OccupancyGrid,
    g: Vec<f64>,
    rhs: Vec<f64>,
    open: BinaryHeap<QueueEntry>,
    start: Cell,
    goal: Cell,
    k_m: f64,
    /// Running count of `update_vertex` calls
    vertex_updates: usize,
}

impl DStarLite {
    /// Create a planner over `grid`. Call [`initialize`](Self::initialize)
    /// before planning.
    pub fn new(grid: OccupancyGrid) -> Self {
        let size = grid.len();
        Self {
            grid,
            g: vec![f64::INFINITY; size],
            rhs: vec![f64::INFINITY; size],
            open: BinaryHeap::new(),
            start: Cell::default(),
            goal: Cell::default(),
            k_m: 0.0,
            vertex_updates: 0,
        }
    }

    /// Reset all planning state for a new `(start, goal)` pair.
    ///
    /// Both cells must be in bounds and free.
    pub fn initialize(&mut self, start: Cell, goal: Cell) -> Result<()> {
        self.validate_endpoint(start)?;
        self.validate_endpoint(goal)?;

        let size = self.grid.len();
        self.g.clear();
        self.g.resize(size, f64::INFINITY);
        self.rhs.clear();
        self.rhs.resize(size, f64::INFINITY);
        self.open.clear();
        self.start = start;
        self.goal = goal;
        self.k_m = 0.0;

        if let Some(idx) = self.grid.index(goal) {
            self.rhs[idx] = 0.0;
        }
        self.push(goal);

        info!("Initialized D* Lite: start {} goal {}", start, goal);
        Ok(())
    }

    fn validate_endpoint(&self, cell: Cell) -> Result<()> {
        if !self.grid.in_bounds(cell) {
            return Err(MargaError::InvalidCell {
                row: cell.row,
                col: cell.col,
                reason: "outside the map",
            });
        }
        if !self.grid.is_free(cell) {
            return Err(MargaError::InvalidCell {
                row: cell.row,
                col: cell.col,
                reason: "cell is an obstacle",
            });
        }
        Ok(())
    }

    // === Accessors ===

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Current key modifier
    pub fn k_m(&self) -> f64 {
        self.k_m
    }

    /// Committed cost-to-goal (`+inf` when unknown or out of bounds)
    #[inline]
    pub fn g(&self, cell: Cell) -> f64 {
        self.grid
            .index(cell)
            .map_or(f64::INFINITY, |i| self.g[i])
    }

    /// One-step lookahead cost (`+inf` when unknown or out of bounds)
    #[inline]
    pub fn rhs(&self, cell: Cell) -> f64 {
        self.grid
            .index(cell)
            .map_or(f64::INFINITY, |i| self.rhs[i])
    }

    /// Whether `g == rhs` for a cell
    #[inline]
    pub fn is_consistent(&self, cell: Cell) -> bool {
        self.g(cell) == self.rhs(cell)
    }

    /// Overwrite a committed cost (for unit tests only)
    #[cfg(test)]
    pub(crate) fn set_g_for_test(&mut self, cell: Cell, value: f64) {
        if let Some(idx) = self.grid.index(cell) {
            self.g[idx] = value;
        }
    }

    /// Number of queue entries, stale duplicates included
    pub fn queue_len(&self) -> usize {
        self.open.len()
    }

    // === Core algorithm ===

    /// Euclidean distance between two cells.
    #[inline]
    pub fn heuristic(a: Cell, b: Cell) -> f64 {
        heuristic(a, b)
    }

    /// Priority of `cell` given the current start and key modifier.
    pub fn compute_key(&self, cell: Cell) -> Key {
        let m = self.g(cell).min(self.rhs(cell));
        Key::new(m + heuristic(self.start, cell) + self.k_m, m)
    }

    fn push(&mut self, cell: Cell) {
        let key = self.compute_key(cell);
        self.open.push(QueueEntry { key, cell });
    }

    /// Recompute `rhs[u]` from its free neighbours and queue it if it is now
    /// inconsistent.
    ///
    /// The goal keeps `rhs = 0`. Obstacle cells are reset to `+inf` and never
    /// queued.
    pub fn update_vertex(&mut self, u: Cell) {
        let Some(idx) = self.grid.index(u) else {
            return;
        };
        self.vertex_updates += 1;

        if u != self.goal {
            if !self.grid.is_free(u) {
                self.g[idx] = f64::INFINITY;
                self.rhs[idx] = f64::INFINITY;
                return;
            }

            let best = self
                .grid
                .free_neighbors(u)
                .map(|s| self.g(s) + edge_cost(u, s))
                .fold(f64::INFINITY, f64::min);
            self.rhs[idx] = best;
        }

        if self.g[idx] != self.rhs[idx] {
            self.push(u);
        }
    }

    fn update_free_neighbors(&mut self, u: Cell) {
        for s in u.neighbors_8() {
            if self.grid.is_free(s) {
                self.update_vertex(s);
            }
        }
    }

    fn should_continue(&self) -> bool {
        let Some(top) = self.open.peek() else {
            return false;
        };
        top.key < self.compute_key(self.start) || !self.is_consistent(self.start)
    }

    /// Expand inconsistent cells until the start cell is settled.
    ///
    /// Runs to completion. An unreachable start is reported through
    /// [`PlanStats::reachable`], not as an error.
    pub fn compute_shortest_path(&mut self) -> PlanStats {
        let updates_before = self.vertex_updates;
        let mut stats = PlanStats::default();

        while self.should_continue() {
            let Some(entry) = self.open.pop() else {
                break;
            };
            let u = entry.cell;

            // Consistent or blocked cells are duplicates left behind by
            // earlier pushes.
            if self.is_consistent(u) || !self.grid.is_free(u) {
                stats.stale_pops += 1;
                continue;
            }

            let k_new = self.compute_key(u);
            if entry.key < k_new {
                stats.stale_pops += 1;
                self.open.push(QueueEntry { key: k_new, cell: u });
                continue;
            }

            stats.expansions += 1;
            let Some(idx) = self.grid.index(u) else {
                continue;
            };

            if self.g[idx] > self.rhs[idx] {
                self.g[idx] = self.rhs[idx];
                trace!("settle {} g={:.3}", u, self.g[idx]);
                self.update_free_neighbors(u);
            } else {
                self.g[idx] = f64::INFINITY;
                trace!("raise {}", u);
                self.update_free_neighbors(u);
                self.update_vertex(u);
            }
        }

        stats.vertex_updates = self.vertex_updates - updates_before;
        stats.reachable = self.g(self.start).is_finite();

        debug!(
            "compute_shortest_path: {} expansions, {} vertex updates, {} stale pops, g(start)={:.3}",
            stats.expansions,
            stats.vertex_updates,
            stats.stale_pops,
            self.g(self.start)
        );

        stats
    }

    // === Re-planning ===

    /// Move the agent to `cell` and bump `k_m` by the distance travelled.
    ///
    /// Keys already in the queue stay valid lower bounds.
    pub fn move_start(&mut self, cell: Cell) -> Result<()> {
        self.validate_endpoint(cell)?;
        self.k_m += heuristic(self.start, cell);
        self.start = cell;
        debug!("Start moved to {} (k_m={:.3})", cell, self.k_m);
        Ok(())
    }

    /// Apply occupancy changes and re-plan incrementally.
    ///
    /// Cells whose state actually changes are updated first, then their free
    /// neighbours. Changes that leave a cell as it was are ignored, and so is
    /// any attempt to block the goal.
    pub fn apply_edge_cost_change(&mut self, changes: &[CellChange]) -> PlanStats {
        let goal = self.goal;
        let changed: Vec<Cell> = changes
            .iter()
            .filter(|c| {
                if c.cell == goal && !c.free {
                    warn!("Ignoring request to block goal {}", goal);
                    return false;
                }
                true
            })
            .filter(|c| self.grid.set_free(c.cell, c.free))
            .map(|c| c.cell)
            .collect();

        info!(
            "Applying {} cell changes ({} effective)",
            changes.len(),
            changed.len()
        );

        let updates_before = self.vertex_updates;
        for &cell in &changed {
            self.update_vertex(cell);
        }
        for &cell in &changed {
            self.update_free_neighbors(cell);
        }
        let seeded = self.vertex_updates - updates_before;

        let mut stats = self.compute_shortest_path();
        stats.vertex_updates += seeded;
        stats
    }
}
