//! Route planning on the occupancy grid.
//!
//! This module provides:
//! - D* Lite incremental planner with lazily invalidated queue entries
//! - Route extraction from the converged cost field

mod dstar_lite;
mod extract;
mod key;

pub use dstar_lite::{CellChange, DStarLite, PlanStats};
pub use extract::{PathOutcome, Route, extract_path};
pub use key::Key;
