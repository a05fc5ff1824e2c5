//! Map image loading and binarization.
//!
//! Any format the `image` crate can decode is accepted; colour images are
//! converted to 8-bit luma first. Bright pixels are free space, dark pixels
//! are obstacles.

use std::path::Path;

use image::GrayImage;
use tracing::debug;

use super::OccupancyGrid;
use crate::error::{MargaError, Result};

/// Pixels strictly brighter than this are free.
pub const DEFAULT_FREE_THRESHOLD: u8 = 200;

/// Builds occupancy grids from grayscale map images.
#[derive(Clone, Copy, Debug)]
pub struct GridBuilder {
    free_threshold: u8,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_THRESHOLD)
    }
}

impl GridBuilder {
    /// Create a builder with a custom free-space threshold.
    pub fn new(free_threshold: u8) -> Self {
        Self { free_threshold }
    }

    /// Read a map image from disk as 8-bit grayscale.
    pub fn load_image<P: AsRef<Path>>(&self, path: P) -> Result<GrayImage> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| {
                MargaError::MapLoad(format!("Failed to load map image {}: {}", path.display(), e))
            })?
            .into_luma8();

        if img.width() == 0 || img.height() == 0 {
            return Err(MargaError::MapLoad(format!(
                "Map image {} is empty",
                path.display()
            )));
        }

        debug!(
            "Loaded map {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(img)
    }

    /// Binarize an intensity image into an occupancy grid of the same size.
    pub fn build(&self, img: &GrayImage) -> Result<OccupancyGrid> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(MargaError::MapLoad("Map image is empty".to_string()));
        }

        let grid = OccupancyGrid::from_fn(width as usize, height as usize, |row, col| {
            img.get_pixel(col as u32, row as u32).0[0] > self.free_threshold
        });

        debug!(
            "Built {}x{} grid: {} free cells (threshold {})",
            width,
            height,
            grid.count_free(),
            self.free_threshold
        );
        Ok(grid)
    }

    /// Load an image and binarize it. The source image is returned alongside
    /// the grid for rendering.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<(GrayImage, OccupancyGrid)> {
        let img = self.load_image(path)?;
        let grid = self.build(&img)?;
        Ok((img, grid))
    }
}
