//! Core types shared by every planning stage.
//!
//! - [`Cell`]: integer row/column address of a grid cell
//! - [`edge_cost`]: 1.0 for axis-aligned steps, √2 for diagonal steps
//! - [`heuristic`]: Euclidean distance between cell centres

mod cell;

pub use cell::{Cell, NEIGHBOR_OFFSETS, edge_cost, heuristic, route_cost};
