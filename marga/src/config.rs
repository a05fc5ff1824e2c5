//! Configuration loading for Marga

use std::path::Path;

use serde::Deserialize;

use crate::error::{MargaError, Result};
use crate::grid::DEFAULT_FREE_THRESHOLD;
use crate::render::RenderStyle;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Map binarization settings
#[derive(Clone, Debug, Deserialize)]
pub struct MapConfig {
    /// Pixels brighter than this are free space (default: 200)
    #[serde(default = "default_free_threshold")]
    pub free_threshold: u8,
}

/// Route image appearance
#[derive(Clone, Debug, Deserialize)]
pub struct RenderConfig {
    /// Start/goal marker radius in pixels (default: 5)
    #[serde(default = "default_marker_radius")]
    pub marker_radius: u32,

    /// Route line width in pixels (default: 2)
    #[serde(default = "default_line_thickness")]
    pub line_thickness: u32,

    #[serde(default = "default_start_color")]
    pub start_color: [u8; 3],

    #[serde(default = "default_goal_color")]
    pub goal_color: [u8; 3],

    #[serde(default = "default_path_color")]
    pub path_color: [u8; 3],
}

/// Output configuration
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Path of the rendered route image
    #[serde(default = "default_image_path")]
    pub image_path: String,
}

fn default_free_threshold() -> u8 {
    DEFAULT_FREE_THRESHOLD
}
fn default_marker_radius() -> u32 {
    5
}
fn default_line_thickness() -> u32 {
    2
}
fn default_start_color() -> [u8; 3] {
    [0, 255, 0]
}
fn default_goal_color() -> [u8; 3] {
    [255, 0, 0]
}
fn default_path_color() -> [u8; 3] {
    [0, 0, 255]
}
fn default_image_path() -> String {
    "output/path_result.png".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            free_threshold: default_free_threshold(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_radius: default_marker_radius(),
            line_thickness: default_line_thickness(),
            start_color: default_start_color(),
            goal_color: default_goal_color(),
            path_color: default_path_color(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_path: default_image_path(),
        }
    }
}

impl RenderConfig {
    /// Convert to the renderer's style
    pub fn style(&self) -> RenderStyle {
        RenderStyle {
            marker_radius: self.marker_radius,
            line_thickness: self.line_thickness,
            start_color: self.start_color,
            goal_color: self.goal_color,
            path_color: self.path_color,
        }
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        Ok(config)
    }
}
