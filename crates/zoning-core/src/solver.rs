//! Bisection search for the population threshold producing a target
//! zone count.
//!
//! Each candidate threshold triggers a full tree rebuild; candidates
//! depend on the previous trial's outcome, so trials are strictly
//! sequential. Unlike the unguarded loop this replaces, the search
//! fails explicitly when the integer bounds collapse or the iteration
//! cap is hit.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::tree::{TreeError, ZoneTree};

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(
        "threshold bounds collapsed to [{lower}, {upper}] without reaching \
         {target} zones within tolerance (last count {last_count})"
    )]
    BoundsCollapsed { lower: i64, upper: i64, target: usize, last_count: usize },
    #[error("no convergence after {iterations} iterations (last count {last_count})")]
    IterationCapExceeded { iterations: u32, last_count: usize },
    #[error(transparent)]
    Build(#[from] TreeError),
}

/// Solver parameters. `lower_threshold` and `upper_threshold` bracket
/// the integer threshold search; `tolerance` is relative to
/// `target_zone_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub target_zone_count: usize,
    pub lower_threshold: i64,
    pub upper_threshold: i64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            target_zone_count: 100,
            lower_threshold: 1,
            upper_threshold: 1_000_000,
            tolerance: 0.1,
            max_iterations: 64,
        }
    }
}

/// A converged solve: the tree, the threshold that produced it, and
/// how the search went.
pub struct Solution {
    pub tree: ZoneTree,
    pub threshold: i64,
    pub zone_count: usize,
    pub iterations: u32,
}

/// Bisect thresholds until the populated-leaf count lands within the
/// relative tolerance of the target.
///
/// `build` performs one full rebuild at the candidate threshold. The
/// bracket tightens assuming the populated-leaf count is monotonically
/// non-increasing in the threshold: too many zones means the threshold
/// was too low, too few means too high.
pub fn solve<F>(config: &SolverConfig, mut build: F) -> Result<Solution, SolveError>
where
    F: FnMut(i64) -> Result<ZoneTree, TreeError>,
{
    let target = config.target_zone_count;
    let mut lower = config.lower_threshold;
    let mut upper = config.upper_threshold;
    let mut last_count = 0usize;

    for iteration in 1..=config.max_iterations {
        let candidate = (lower + upper).div_euclid(2);
        let tree = build(candidate)?;
        let count = tree.count_populated();
        last_count = count;
        info!(iteration, candidate, count, target, "solver step");

        let deviation = count.abs_diff(target) as f64 / target as f64;
        if deviation < config.tolerance {
            info!(threshold = candidate, zones = count, "solver converged");
            return Ok(Solution { tree, threshold: candidate, zone_count: count, iterations: iteration });
        }

        if count > target {
            // Tree too fine: the threshold sits too low.
            lower = lower.max(candidate);
        } else {
            // Tree too coarse: the threshold sits too high.
            upper = upper.min(candidate);
        }

        // Integer granularity can be coarser than the tolerance window;
        // adjacent bounds mean no untried candidate remains.
        if upper - lower <= 1 {
            return Err(SolveError::BoundsCollapsed { lower, upper, target, last_count });
        }
    }

    Err(SolveError::IterationCapExceeded { iterations: config.max_iterations, last_count })
}
