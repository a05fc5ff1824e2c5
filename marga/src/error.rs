//! Error types for Marga

use thiserror::Error;

/// Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    /// Map image could not be read, decoded, or has no pixels
    #[error("Map load error: {0}")]
    MapLoad(String),

    /// The occupancy grid contains no free cell at all
    #[error("No free space found in map")]
    NoFreeSpace,

    /// Route walk exceeded the number of grid cells
    #[error("Path extraction exceeded {steps} steps without reaching the goal")]
    PathExtraction {
        /// Number of cells in the route when the guard tripped
        steps: usize,
    },

    /// Caller supplied an endpoint the planner cannot use
    #[error("Invalid cell ({row}, {col}): {reason}")]
    InvalidCell {
        /// Row index
        row: i32,
        /// Column index
        col: i32,
        /// Why the cell was rejected
        reason: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
