//! Zoning runner: derive population-balanced zones from a scenario
//! file and write the zone and tree layers as JSON.
//!
//! The scenario bundles the run configuration, the base region
//! polygons, the population raster window, and an optional land-use
//! layer. All geometry goes through the bundled planar backend.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};

use zoning_core::geom::planar::PlanarBackend;
use zoning_core::stats::RegionStats;
use zoning_core::{
    best_neighbor, solve, tabulate, zonal_sum, AffineTransform, LandUseFeature, Polygon,
    RasterWindow, TreeLayer, ZoneLayer, ZoneTree, ZoningConfig,
};

#[derive(Parser, Debug)]
#[command(name = "zoner", about = "Population-balanced zone derivation runner")]
struct Args {
    /// Scenario JSON file (config, regions, raster, land use).
    #[arg(short, long)]
    scenario: PathBuf,

    /// Directory the zone and tree layers are written to.
    #[arg(short, long, default_value = "out")]
    output: PathBuf,
}

#[derive(Deserialize)]
struct Scenario {
    #[serde(default)]
    config: ZoningConfig,
    regions: Vec<Polygon>,
    raster: RasterInput,
    #[serde(default)]
    land_use: Vec<LandUseFeature>,
    /// Region id per base region, aligned with `regions`. Optional;
    /// enables the statistics cross-check.
    #[serde(default)]
    region_ids: Vec<u64>,
    /// External per-region population table for the cross-check.
    #[serde(default)]
    region_stats: RegionStats,
}

/// Raster window plus the world position of its top-left corner; the
/// cell size comes from the configured resolution.
#[derive(Deserialize)]
struct RasterInput {
    width: usize,
    height: usize,
    origin_x: f64,
    origin_y: f64,
    values: Vec<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let raw = fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw).context("parsing scenario JSON")?;

    anyhow::ensure!(
        scenario.raster.values.len() == scenario.raster.width * scenario.raster.height,
        "raster values length {} does not match {}x{}",
        scenario.raster.values.len(),
        scenario.raster.width,
        scenario.raster.height,
    );

    let config = scenario.config;
    let window = RasterWindow {
        data: scenario.raster.values,
        width: scenario.raster.width,
        height: scenario.raster.height,
    };
    let transform = AffineTransform::north_up(
        scenario.raster.origin_x,
        scenario.raster.origin_y,
        config.resolution,
    );

    let backend = PlanarBackend::new();
    let base = ZoneTree::build_root(&scenario.regions, config.working_crs, &backend)?;
    info!(
        regions = scenario.regions.len(),
        target = config.solver.target_zone_count,
        "solving for threshold"
    );

    let solution = solve(&config.solver, |threshold| {
        base.grow(&window, &transform, threshold as f64, &backend)
    })?;
    info!(
        threshold = solution.threshold,
        zones = solution.zone_count,
        iterations = solution.iterations,
        "converged"
    );

    // Flag empty zones and their merge candidates; merging itself is a
    // downstream decision.
    let leaves: Vec<_> = solution.tree.leaves().collect();
    for leaf in leaves.iter().filter(|l| l.population_or_zero() <= 0.0) {
        match best_neighbor(*leaf, leaves.iter().copied(), &backend) {
            Some(neighbor) => {
                info!(zone = leaf.id.0, neighbor = neighbor.0, "empty zone, merge candidate found");
            }
            None => warn!(zone = leaf.id.0, "empty zone with no positive-length neighbor"),
        }
    }

    // Cross-check raster sums against the external statistics table
    // per base region, zero-filling ids the table does not cover.
    if !scenario.region_ids.is_empty() {
        anyhow::ensure!(
            scenario.region_ids.len() == scenario.regions.len(),
            "{} region ids for {} regions",
            scenario.region_ids.len(),
            scenario.regions.len(),
        );
        let mut sq_error = 0.0;
        for (region, &id) in scenario.regions.iter().zip(&scenario.region_ids) {
            let expected = scenario.region_stats.population(id).or_zero(id);
            let actual = zonal_sum(region, &window, &transform)?;
            info!(region = id, expected, actual, "region population check");
            sq_error += (expected - actual).powi(2);
        }
        let rmse = (sq_error / scenario.regions.len() as f64).sqrt();
        info!(rmse, "region statistics cross-check done");
    }

    let land_use = tabulate(&solution.tree, &scenario.land_use, &backend)?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_json(&args.output.join("zones.json"), &ZoneLayer::from_tree(&solution.tree, &land_use))?;
    write_json(&args.output.join("tree.json"), &TreeLayer::from_tree(&solution.tree))?;
    info!(output = %args.output.display(), "layers written");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
