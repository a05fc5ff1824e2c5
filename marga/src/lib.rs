//! # Marga
//!
//! Incremental route planning over occupancy grids built from map images.
//!
//! ## Pipeline
//!
//! ```text
//! map image ──► GridBuilder ──► OccupancyGrid
//!                                   │
//!                    select_start_goal (largest free region)
//!                                   │
//!                                   ▼
//!                      DStarLite::initialize(start, goal)
//!                      DStarLite::compute_shortest_path()
//!                                   │
//!                                   ▼
//!                      extract_path ──► PathOutcome ──► PathRenderer
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::{DStarLite, GridBuilder, PathOutcome, extract_path, select_start_goal};
//!
//! let (image, grid) = GridBuilder::default().load("map.png")?;
//! let (start, goal) = select_start_goal(&grid)?;
//!
//! let mut planner = DStarLite::new(grid);
//! planner.initialize(start, goal)?;
//! planner.compute_shortest_path();
//!
//! match extract_path(&planner)? {
//!     PathOutcome::Reached(route) => println!("{} cells", route.len()),
//!     PathOutcome::Unreachable(_) => println!("No path found."),
//! }
//! ```
//!
//! ## Re-planning
//!
//! When cells change after the first plan, pass the changes to
//! [`DStarLite::apply_edge_cost_change`]. If the agent has moved, call
//! [`DStarLite::move_start`] first so queued keys stay comparable.
//!
//! ## Coordinate System
//!
//! Cells are `(row, col)` with row 0 at the top of the image and column 0 at
//! the left. Moves are 8-connected: axis-aligned steps cost 1, diagonal
//! steps cost √2.

pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod planning;
pub mod region;
pub mod render;

pub use config::MargaConfig;
pub use crate::core::{Cell, edge_cost, heuristic, route_cost};
pub use error::{MargaError, Result};
pub use grid::{DEFAULT_FREE_THRESHOLD, GridBuilder, OccupancyGrid};
pub use planning::{CellChange, DStarLite, Key, PathOutcome, PlanStats, Route, extract_path};
pub use region::{FreeRegion, RegionMap, select_start_goal};
pub use render::{PathRenderer, RenderStyle};
