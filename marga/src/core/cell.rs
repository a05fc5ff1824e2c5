//! Cell coordinates and 8-connected step geometry.

use std::f64::consts::SQRT_2;
use std::fmt;

/// 8-connected neighbour offsets as `(d_row, d_col)`.
///
/// Axis-aligned moves come first, then diagonals. Route extraction breaks
/// ties between equal-cost neighbours by this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Grid cell addressed by row and column.
///
/// Ordering is lexicographic on `(row, col)`, i.e. row-major scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    /// Row index (image y)
    pub row: i32,
    /// Column index (image x)
    pub col: i32,
}

impl Cell {
    /// Create a new cell
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Cell shifted by a `(d_row, d_col)` offset
    #[inline]
    pub fn offset(&self, d_row: i32, d_col: i32) -> Cell {
        Cell::new(self.row + d_row, self.col + d_col)
    }

    /// All 8 surrounding cells, in [`NEIGHBOR_OFFSETS`] order.
    ///
    /// No bounds or occupancy filtering is applied.
    #[inline]
    pub fn neighbors_8(&self) -> [Cell; 8] {
        NEIGHBOR_OFFSETS.map(|(dr, dc)| self.offset(dr, dc))
    }

    /// Euclidean distance between cell centres
    #[inline]
    pub fn distance(&self, other: &Cell) -> f64 {
        let dr = f64::from(self.row - other.row);
        let dc = f64::from(self.col - other.col);
        dr.hypot(dc)
    }

    /// Chebyshev distance (max of row and column distance)
    #[inline]
    pub fn chebyshev_distance(&self, other: &Cell) -> i32 {
        (self.row - other.row)
            .abs()
            .max((self.col - other.col).abs())
    }

    /// Whether `other` is one of the 8 surrounding cells
    #[inline]
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cost of a single step between adjacent cells.
///
/// 1.0 for axis-aligned moves, √2 for diagonal moves. Callers only pass
/// 8-connected pairs.
#[inline]
pub fn edge_cost(from: Cell, to: Cell) -> f64 {
    if from.row != to.row && from.col != to.col {
        SQRT_2
    } else {
        1.0
    }
}

/// Euclidean distance heuristic.
///
/// Admissible and consistent for the uniform-cost 8-connected grid.
#[inline]
pub fn heuristic(a: Cell, b: Cell) -> f64 {
    a.distance(&b)
}

/// Sum of edge costs along a route.
pub fn route_cost(route: &[Cell]) -> f64 {
    route.windows(2).map(|w| edge_cost(w[0], w[1])).sum()
}
