//! Occupancy grid derived from a map image.
//!
//! The grid is a dense row-major array of free/obstacle flags with the same
//! dimensions as the source image. Row 0 is the top image row.
//!
//! ```text
//!   col → 0 1 2 3
//! row 0   . . # .
//!     1   . # # .      . = free, # = obstacle
//!     2   . . . .
//! ```
//!
//! Cells outside the grid are treated as obstacles by every query.

mod builder;

pub use builder::{DEFAULT_FREE_THRESHOLD, GridBuilder};

use crate::core::Cell;

/// Binary occupancy grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    /// `true` = free, row-major
    free: Vec<bool>,
}

impl OccupancyGrid {
    /// Create a grid with every cell set to `free`.
    pub fn filled(width: usize, height: usize, free: bool) -> Self {
        Self {
            width,
            height,
            free: vec![free; width * height],
        }
    }

    /// Create a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut free = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                free.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            free,
        }
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Check whether a cell lies inside the grid
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.height
            && (cell.col as usize) < self.width
    }

    /// Row-major index of a cell, `None` when out of bounds
    #[inline]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if self.in_bounds(cell) {
            Some(cell.row as usize * self.width + cell.col as usize)
        } else {
            None
        }
    }

    /// Cell at a row-major index
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new((index / self.width) as i32, (index % self.width) as i32)
    }

    /// Check if a cell is traversable (out of bounds = obstacle)
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.free[i])
    }

    /// Mark a cell free or blocked.
    ///
    /// Returns `true` if the cell existed and its state changed.
    pub fn set_free(&mut self, cell: Cell, free: bool) -> bool {
        match self.index(cell) {
            Some(i) if self.free[i] != free => {
                self.free[i] = free;
                true
            }
            _ => false,
        }
    }

    /// In-bounds free cells among the 8 neighbours of `cell`.
    pub fn free_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors_8()
            .into_iter()
            .filter(move |n| self.is_free(*n))
    }

    /// Number of free cells
    pub fn count_free(&self) -> usize {
        self.free.iter().filter(|&&f| f).count()
    }

    /// Raw row-major free flags
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.free
    }
}
