//! Route visualization on top of the source map image.
//!
//! Renders:
//! - The grayscale map, converted to RGB
//! - Filled start (green) and goal (red) markers
//! - A connected polyline through the route cells (blue)
//!
//! Output format follows the file extension of the target path.

use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};
use tracing::info;

use crate::core::Cell;
use crate::error::{MargaError, Result};

/// Colours and sizes used when drawing a route.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    /// Marker radius in pixels
    pub marker_radius: u32,
    /// Route line width in pixels
    pub line_thickness: u32,
    pub start_color: [u8; 3],
    pub goal_color: [u8; 3],
    pub path_color: [u8; 3],
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            marker_radius: 5,
            line_thickness: 2,
            start_color: [0, 255, 0],
            goal_color: [255, 0, 0],
            path_color: [0, 0, 255],
        }
    }
}

/// Bresenham line between two cells, endpoints included.
pub struct BresenhamLine {
    row: i32,
    col: i32,
    d_row: i32,
    d_col: i32,
    row_inc: i32,
    col_inc: i32,
    error: i32,
    end: Cell,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: Cell, end: Cell) -> Self {
        let d_col = (end.col - start.col).abs();
        let d_row = -(end.row - start.row).abs();
        Self {
            row: start.row,
            col: start.col,
            d_row,
            d_col,
            row_inc: if end.row > start.row { 1 } else { -1 },
            col_inc: if end.col > start.col { 1 } else { -1 },
            error: d_col + d_row,
            end,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = Cell::new(self.row, self.col);
        if result == self.end {
            self.done = true;
            return Some(result);
        }

        let e2 = 2 * self.error;
        if e2 >= self.d_row {
            self.error += self.d_row;
            self.col += self.col_inc;
        }
        if e2 <= self.d_col {
            self.error += self.d_col;
            self.row += self.row_inc;
        }

        Some(result)
    }
}

/// Draws routes onto map images.
#[derive(Clone, Debug, Default)]
pub struct PathRenderer {
    style: RenderStyle,
}

impl PathRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Draw markers and the route onto an RGB copy of `map`.
    pub fn render(&self, map: &GrayImage, route: &[Cell], start: Cell, goal: Cell) -> RgbImage {
        let mut canvas = RgbImage::from_fn(map.width(), map.height(), |x, y| {
            let v = map.get_pixel(x, y).0[0];
            Rgb([v, v, v])
        });

        let radius = self.style.marker_radius;
        fill_disc(&mut canvas, start, radius, Rgb(self.style.start_color));
        fill_disc(&mut canvas, goal, radius, Rgb(self.style.goal_color));

        let half_width = self.style.line_thickness / 2;
        let color = Rgb(self.style.path_color);
        for pair in route.windows(2) {
            for cell in BresenhamLine::new(pair[0], pair[1]) {
                fill_disc(&mut canvas, cell, half_width, color);
            }
        }
        if let [only] = route {
            fill_disc(&mut canvas, *only, half_width, color);
        }

        canvas
    }

    /// Render and write the image to `path`, creating parent directories.
    pub fn save<P: AsRef<Path>>(
        &self,
        map: &GrayImage,
        route: &[Cell],
        start: Cell,
        goal: Cell,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let canvas = self.render(map, route, start, goal);
        canvas.save(path).map_err(|e| {
            MargaError::Render(format!("Failed to save {}: {}", path.display(), e))
        })?;

        info!("Route image saved to {}", path.display());
        Ok(())
    }
}

/// Fill a disc of `radius` pixels centred on `center`, clipped to the image.
///
/// Radii are clamped to `width + height`, which already reaches every pixel
/// from any centre on the canvas.
fn fill_disc(canvas: &mut RgbImage, center: Cell, radius: u32, color: Rgb<u8>) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let radius = radius.min(canvas.width().saturating_add(canvas.height())) as i64;
    let r2 = radius * radius;
    let (row, col) = (center.row as i64, center.col as i64);

    let rows = (row - radius).max(0)..=(row + radius).min(height - 1);
    for y in rows {
        let dr = y - row;
        for x in (col - radius).max(0)..=(col + radius).min(width - 1) {
            let dc = x - col;
            if dr * dr + dc * dc <= r2 {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
