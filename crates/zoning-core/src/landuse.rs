//! Land-use overlay tabulator.
//!
//! Overlays a classified polygon layer on the converged tree's leaves
//! and accumulates per-class coverage percentages. Percentages are
//! leaf-area shares: a leaf fully covered by land-use features ends up
//! with class percentages summing to 100, which is the normalization
//! invariant the tests pin down.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::geom::{Crs, GeomError, GeometryOps, Polygon, GEOM_EPS};
use crate::tree::{NodeId, ZoneTree};

/// Maximum stored length of a land-use class code.
const CLASS_CODE_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum TabulateError {
    #[error(transparent)]
    Geom(#[from] GeomError),
}

/// A land-use class label, truncated to 8 characters on ingest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassCode(String);

impl ClassCode {
    pub fn new(label: &str) -> Self {
        Self(label.chars().take(CLASS_CODE_LEN).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One feature of the classified land-use layer, in its own CRS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUseFeature {
    pub polygon: Polygon,
    pub class_code: ClassCode,
    pub crs: Crs,
}

/// Accumulated (leaf, class) coverage percentages. Every cell for the
/// cross product of leaves and distinct classes is initialized to zero
/// before accumulation, so lookups never fail.
#[derive(Debug, Clone)]
pub struct LandUseAccumulator {
    classes: Vec<ClassCode>,
    cells: BTreeMap<(NodeId, ClassCode), f64>,
}

impl LandUseAccumulator {
    fn zeroed(leaves: &[NodeId], classes: &BTreeSet<ClassCode>) -> Self {
        let mut cells = BTreeMap::new();
        for &leaf in leaves {
            for class in classes {
                cells.insert((leaf, class.clone()), 0.0);
            }
        }
        Self { classes: classes.iter().cloned().collect(), cells }
    }

    fn add(&mut self, leaf: NodeId, class: &ClassCode, percentage: f64) {
        *self.cells.entry((leaf, class.clone())).or_insert(0.0) += percentage;
    }

    /// Distinct class codes of the tabulated layer, sorted.
    pub fn classes(&self) -> &[ClassCode] {
        &self.classes
    }

    /// Accumulated percentage for a (leaf, class) cell; zero for cells
    /// nothing accumulated into.
    pub fn percentage(&self, leaf: NodeId, class: &ClassCode) -> f64 {
        self.cells.get(&(leaf, class.clone())).copied().unwrap_or(0.0)
    }

    /// Per-class percentages of one leaf, sorted by class.
    pub fn leaf_classes(&self, leaf: NodeId) -> Vec<(ClassCode, f64)> {
        self.classes
            .iter()
            .map(|c| (c.clone(), self.percentage(leaf, c)))
            .collect()
    }
}

/// Overlay the land-use layer on the tree's leaves.
///
/// Each feature is reprojected into the tree's working CRS, matched
/// against every leaf it intersects, and its leaf-area share added to
/// the (leaf, class) cell. With the `threading` feature, per-feature
/// matching runs on a rayon pool and the task-local results are merged
/// by a final sequential reduction.
pub fn tabulate<B: GeometryOps + Sync>(
    tree: &ZoneTree,
    layer: &[LandUseFeature],
    backend: &B,
) -> Result<LandUseAccumulator, TabulateError> {
    let classes: BTreeSet<ClassCode> = layer.iter().map(|f| f.class_code.clone()).collect();
    let leaves: Vec<NodeId> = tree.leaves().map(|n| n.id).collect();
    let mut acc = LandUseAccumulator::zeroed(&leaves, &classes);

    let match_feature = |feature: &LandUseFeature| -> Result<Vec<(NodeId, f64)>, TabulateError> {
        let polygon = backend.transform(&feature.polygon, feature.crs, tree.crs())?;
        let env = polygon.envelope();
        let mut matches = Vec::new();
        for leaf in tree.leaves() {
            if !leaf.polygon.envelope().intersects(&env) {
                continue;
            }
            let overlap = backend.intersection(&leaf.polygon, &polygon).area();
            if overlap > GEOM_EPS {
                matches.push((leaf.id, 100.0 * overlap / leaf.polygon.area()));
            }
        }
        Ok(matches)
    };

    #[cfg(feature = "threading")]
    let per_feature: Vec<Vec<(NodeId, f64)>> = layer
        .par_iter()
        .map(match_feature)
        .collect::<Result<_, _>>()?;
    #[cfg(not(feature = "threading"))]
    let per_feature: Vec<Vec<(NodeId, f64)>> = layer
        .iter()
        .map(match_feature)
        .collect::<Result<_, _>>()?;

    for (feature, matches) in layer.iter().zip(per_feature) {
        for (leaf, percentage) in matches {
            acc.add(leaf, &feature.class_code, percentage);
        }
    }
    Ok(acc)
}
