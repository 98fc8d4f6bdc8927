//! Serializable output layers.
//!
//! The engine's produced artifacts: a polygon layer of the converged
//! tree's leaves carrying population and per-class land-use fields,
//! and a layer of the full tree structure. Writing these to disk (or a
//! real GIS sink) is the caller's job; here they are plain serde data.

use serde::Serialize;

use crate::geom::Polygon;
use crate::landuse::LandUseAccumulator;
use crate::tree::ZoneTree;

/// One output zone record.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneRecord {
    pub fid: usize,
    #[serde(rename = "Population")]
    pub population: f64,
    pub polygon: Polygon,
    /// (class code, percentage) pairs, one per land-use class of the
    /// tabulated layer.
    pub land_use: Vec<(String, f64)>,
}

/// Polygon layer of the converged tree's populated leaves with their
/// land-use composition.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneLayer {
    pub zones: Vec<ZoneRecord>,
}

impl ZoneLayer {
    /// Build the leaf layer from a converged tree and its tabulation.
    /// Degenerate leaf geometries are filtered here, at the output
    /// boundary, the same way non-polygon features are filtered on
    /// ingest.
    pub fn from_tree(tree: &ZoneTree, land_use: &LandUseAccumulator) -> Self {
        let zones = tree
            .leaves()
            .filter(|leaf| !leaf.polygon.is_degenerate(crate::geom::GEOM_EPS))
            .map(|leaf| ZoneRecord {
                fid: leaf.id.0,
                population: leaf.population_or_zero(),
                polygon: leaf.polygon.clone(),
                land_use: land_use
                    .leaf_classes(leaf.id)
                    .into_iter()
                    .map(|(class, pct)| (class.as_str().to_owned(), pct))
                    .collect(),
            })
            .collect();
        Self { zones }
    }
}

/// One node of the tree-structure layer.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRecord {
    pub fid: usize,
    #[serde(rename = "Population")]
    pub population: f64,
    pub is_leaf: bool,
    pub polygon: Polygon,
}

/// Polygon layer of the whole tree structure, interior nodes included.
#[derive(Debug, Clone, Serialize)]
pub struct TreeLayer {
    pub nodes: Vec<TreeRecord>,
}

impl TreeLayer {
    pub fn from_tree(tree: &ZoneTree) -> Self {
        let nodes = tree
            .iter()
            .map(|node| TreeRecord {
                fid: node.id.0,
                population: node.population_or_zero(),
                is_leaf: node.is_leaf(),
                polygon: node.polygon.clone(),
            })
            .collect();
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{planar::PlanarBackend, Crs};
    use crate::landuse::{tabulate, ClassCode, LandUseFeature};
    use crate::raster::{AffineTransform, RasterWindow};

    #[test]
    fn zone_layer_carries_population_and_classes() {
        let backend = PlanarBackend::new();
        let regions = vec![
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(1.0, 0.0, 2.0, 1.0),
            Polygon::rect(0.0, 1.0, 1.0, 2.0),
            Polygon::rect(1.0, 1.0, 2.0, 2.0),
        ];
        let window = RasterWindow::new(8, 8, 6.25);
        let transform = AffineTransform::north_up(0.0, 2.0, 0.25);
        let base = ZoneTree::build_root(&regions, Crs(3035), &backend).unwrap();
        let tree = base.grow(&window, &transform, 250.0, &backend).unwrap();

        let layer = vec![LandUseFeature {
            polygon: Polygon::rect(0.0, 0.0, 2.0, 2.0),
            class_code: ClassCode::new("mixed"),
            crs: Crs(3035),
        }];
        let acc = tabulate(&tree, &layer, &backend).unwrap();

        let zones = ZoneLayer::from_tree(&tree, &acc);
        assert_eq!(zones.zones.len(), 4);
        for record in &zones.zones {
            assert_eq!(record.population, 100.0);
            assert_eq!(record.land_use, vec![("mixed".to_owned(), 100.0)]);
        }

        let structure = TreeLayer::from_tree(&tree);
        assert_eq!(structure.nodes.len(), 5);
        assert_eq!(structure.nodes.iter().filter(|n| !n.is_leaf).count(), 1);
    }
}
