//! Marga - route planner for image maps
//!
//! Loads a grayscale map, picks start and goal cells (explicitly or from the
//! largest free region), plans with D* Lite and writes the route on top of the
//! map image.
//!
//! Usage:
//!   marga map.png
//!   marga map.png --start 10,12 --goal 240,310 --output out/route.png
//!   marga map.png --block 50,60 --block 50,61   # re-plan around new obstacles

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use marga::{
    Cell, CellChange, DStarLite, GridBuilder, MargaConfig, MargaError, PathOutcome, PathRenderer,
    PlanStats, Result, extract_path, select_start_goal,
};

/// Plan a route across an image-derived occupancy grid
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map image (bright pixels are free space)
    map: PathBuf,

    /// Configuration file path (defaults to ./marga.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start cell as ROW,COL
    #[arg(short, long, value_parser = parse_cell)]
    start: Option<Cell>,

    /// Goal cell as ROW,COL
    #[arg(short, long, value_parser = parse_cell)]
    goal: Option<Cell>,

    /// Output image path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Free-space threshold (0-255)
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Cells to turn into obstacles after the first plan, as ROW,COL
    #[arg(short, long, value_parser = parse_cell)]
    block: Vec<Cell>,
}

fn parse_cell(s: &str) -> std::result::Result<Cell, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad row '{}': {}", row, e))?;
    let col = col
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad column '{}': {}", col, e))?;
    Ok(Cell::new(row, col))
}

fn main() -> Result<()> {
    // Initialize logging
    let directive: Directive = "marga=info"
        .parse()
        .map_err(|e| MargaError::Config(format!("Invalid log directive: {}", e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    info!("Marga v{}", env!("CARGO_PKG_VERSION"));

    if run(&args, &config)?.is_none() {
        warn!("No path found.");
    }

    info!("Marga finished");
    Ok(())
}

/// Plan on the map named in `args` and render the route.
///
/// Returns the written image path, or `None` when the goal is unreachable.
fn run(args: &Args, config: &MargaConfig) -> Result<Option<PathBuf>> {
    let threshold = args.threshold.unwrap_or(config.map.free_threshold);
    let (image, grid) = GridBuilder::new(threshold).load(&args.map)?;
    info!(
        "Map {}: {}x{}, {} free cells (threshold {})",
        args.map.display(),
        grid.width(),
        grid.height(),
        grid.count_free(),
        threshold
    );

    let (start, goal) = match (args.start, args.goal) {
        (Some(start), Some(goal)) => (start, goal),
        (start, goal) => {
            let (auto_start, auto_goal) = select_start_goal(&grid)?;
            info!("Auto-selected valid points in largest component");
            (start.unwrap_or(auto_start), goal.unwrap_or(auto_goal))
        }
    };
    info!("Planning from {} to {}", start, goal);

    let mut planner = DStarLite::new(grid);
    planner.initialize(start, goal)?;
    let stats = planner.compute_shortest_path();
    let mut outcome = report(&planner, &stats)?;

    if !args.block.is_empty() {
        let changes: Vec<CellChange> = args.block.iter().map(|&c| CellChange::blocked(c)).collect();
        let stats = planner.apply_edge_cost_change(&changes);
        info!("Re-planned after blocking {} cells", changes.len());
        outcome = report(&planner, &stats)?;
    }

    let PathOutcome::Reached(route) = outcome else {
        return Ok(None);
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.image_path));
    PathRenderer::new(config.render.style()).save(&image, route.cells(), start, goal, &output)?;
    Ok(Some(output))
}

/// Load config from an explicit path, ./marga.toml, or defaults.
fn load_config(path: Option<&Path>) -> Result<MargaConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            MargaConfig::load(path)
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            MargaConfig::load(Path::new("marga.toml"))
        }
        None => {
            info!("Using default configuration");
            Ok(MargaConfig::default())
        }
    }
}

/// Extract the route and log a summary.
fn report(planner: &DStarLite, stats: &PlanStats) -> Result<PathOutcome> {
    info!(
        "Search: {} expansions, {} vertex updates, {} stale entries",
        stats.expansions, stats.vertex_updates, stats.stale_pops
    );

    let outcome = extract_path(planner)?;
    if let PathOutcome::Reached(route) = &outcome {
        info!(
            "Path found with {} steps (cost {:.2})",
            route.len(),
            route.cost()
        );
    }
    Ok(outcome)
}
