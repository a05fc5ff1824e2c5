//! Free-space region detection and default endpoint selection.
//!
//! Free cells are grouped into 8-connected components with a flood fill.
//! Components are labelled in the order their first cell appears in a
//! row-major scan, so labelling is deterministic for a given grid.
//!
//! The default route runs from the first to the last cell (row-major) of the
//! largest component. Both endpoints are guaranteed to share a component, not
//! to be far apart.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::core::Cell;
use crate::error::{MargaError, Result};
use crate::grid::OccupancyGrid;

/// A connected component of free cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeRegion {
    /// Label, in order of discovery
    pub label: usize,
    /// Number of member cells
    pub size: usize,
    /// First member in row-major order
    pub first: Cell,
    /// Last member in row-major order
    pub last: Cell,
}

/// Component labelling of an occupancy grid.
#[derive(Clone, Debug)]
pub struct RegionMap {
    width: usize,
    /// Label per cell, `None` for obstacles
    labels: Vec<Option<usize>>,
    regions: Vec<FreeRegion>,
}

impl RegionMap {
    /// Label every 8-connected free component of `grid`.
    pub fn build(grid: &OccupancyGrid) -> Self {
        let mut labels: Vec<Option<usize>> = vec![None; grid.len()];
        let mut regions = Vec::new();
        let mut queue = VecDeque::new();

        for seed_idx in 0..grid.len() {
            if !grid.as_slice()[seed_idx] || labels[seed_idx].is_some() {
                continue;
            }

            let label = regions.len();
            let seed = grid.cell_at(seed_idx);
            labels[seed_idx] = Some(label);
            queue.push_back(seed);

            let mut size = 0;
            let mut last_idx = seed_idx;

            while let Some(cell) = queue.pop_front() {
                size += 1;
                for neighbor in grid.free_neighbors(cell) {
                    let Some(idx) = grid.index(neighbor) else {
                        continue;
                    };
                    if labels[idx].is_none() {
                        labels[idx] = Some(label);
                        last_idx = last_idx.max(idx);
                        queue.push_back(neighbor);
                    }
                }
            }

            regions.push(FreeRegion {
                label,
                size,
                first: seed,
                last: grid.cell_at(last_idx),
            });
        }

        debug!("Found {} free regions", regions.len());

        Self {
            width: grid.width(),
            labels,
            regions,
        }
    }

    /// All regions in discovery order
    pub fn regions(&self) -> &[FreeRegion] {
        &self.regions
    }

    /// Label of the region containing `cell`, if it is a free in-bounds cell
    pub fn label_of(&self, cell: Cell) -> Option<usize> {
        if cell.row < 0 || cell.col < 0 || cell.col as usize >= self.width {
            return None;
        }
        let idx = cell.row as usize * self.width + cell.col as usize;
        self.labels.get(idx).copied().flatten()
    }

    /// Whether two cells lie in the same free region
    pub fn connected(&self, a: Cell, b: Cell) -> bool {
        matches!((self.label_of(a), self.label_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Largest region; ties go to the region discovered first.
    pub fn largest(&self) -> Option<&FreeRegion> {
        self.regions
            .iter()
            .fold(None, |best: Option<&FreeRegion>, r| match best {
                Some(b) if b.size >= r.size => Some(b),
                _ => Some(r),
            })
    }
}

/// Pick default start and goal cells from the largest free region.
///
/// Returns `(start, goal)` as the first and last member cells of that region
/// in row-major order. Fails with [`MargaError::NoFreeSpace`] when the grid
/// has no free cell.
pub fn select_start_goal(grid: &OccupancyGrid) -> Result<(Cell, Cell)> {
    let regions = RegionMap::build(grid);
    let largest = regions.largest().ok_or(MargaError::NoFreeSpace)?;

    info!(
        "Largest free region: {} cells (of {} regions), start {} goal {}",
        largest.size,
        regions.regions().len(),
        largest.first,
        largest.last
    );

    Ok((largest.first, largest.last))
}
