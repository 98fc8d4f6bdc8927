//! Adaptive quadrant zone tree.
//!
//! Nodes live in an arena addressed by stable [`NodeId`]; a node owns
//! its children by id and holds a non-owning parent id for traversal.
//! Trees are immutable once grown: a changed threshold produces a
//! fresh tree from the same base regions, never a patched one.

pub mod quadrant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::geom::{Crs, GeomError, GeometryOps, Polygon, GEOM_EPS};
use crate::raster::{zonal_sum, AffineTransform, RasterError, RasterWindow};
use quadrant::split_quadrants;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("cannot build a zone tree from an empty region set")]
    NoRegions,
    #[error("region {index} has a degenerate (zero-area) polygon")]
    DegenerateRegion { index: usize },
    #[error(transparent)]
    Geom(#[from] GeomError),
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Stable arena index of a zone node. Ids are assigned at creation and
/// never reused within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// One quadrant region of the zone tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneNode {
    pub id: NodeId,
    /// Boundary in the tree's working coordinate reference; immutable
    /// after creation.
    pub polygon: Polygon,
    /// Aggregate raster population; `None` until the node has been
    /// through a grow pass.
    pub population: Option<f64>,
    /// Owned children; empty means leaf.
    pub children: Vec<NodeId>,
    /// Non-owning back-reference for traversal.
    pub parent: Option<NodeId>,
}

impl ZoneNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn population_or_zero(&self) -> f64 {
        self.population.unwrap_or(0.0)
    }
}

/// The zone tree: node arena plus the base regions it was dissolved
/// from, kept so every grow pass is a full rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTree {
    nodes: Vec<ZoneNode>,
    root: NodeId,
    base_regions: Vec<Polygon>,
    crs: Crs,
}

impl ZoneTree {
    /// Dissolve the base regions into the root boundary and attach one
    /// leaf child per base region, populations unset.
    pub fn build_root(
        regions: &[Polygon],
        crs: Crs,
        backend: &impl GeometryOps,
    ) -> Result<Self, TreeError> {
        if regions.is_empty() {
            return Err(TreeError::NoRegions);
        }
        if let Some(index) = regions.iter().position(|r| r.is_degenerate(GEOM_EPS)) {
            return Err(TreeError::DegenerateRegion { index });
        }

        let boundary = backend.dissolve(regions)?;
        let root = NodeId(0);
        let mut nodes = vec![ZoneNode {
            id: root,
            polygon: boundary,
            population: None,
            children: Vec::new(),
            parent: None,
        }];
        for region in regions {
            let id = NodeId(nodes.len());
            nodes.push(ZoneNode {
                id,
                polygon: region.clone(),
                population: None,
                children: Vec::new(),
                parent: Some(root),
            });
            nodes[root.0].children.push(id);
        }

        Ok(Self { nodes, root, base_regions: regions.to_vec(), crs })
    }

    /// Grow a fresh tree to the given population threshold.
    ///
    /// This is a full rebuild from the base regions: frontier nodes
    /// whose population exceeds the threshold are quadrant-split and
    /// their children recursed on, level by level, until no node
    /// exceeds the threshold or splitting cannot produce at least two
    /// non-degenerate parts (the node then stays a leaf). Deterministic
    /// for identical inputs. With the `threading` feature, siblings of
    /// one level are scanned by a rayon pool, joined before the next
    /// level starts.
    pub fn grow<B: GeometryOps + Sync>(
        &self,
        window: &RasterWindow,
        transform: &AffineTransform,
        threshold: f64,
        backend: &B,
    ) -> Result<ZoneTree, TreeError> {
        let mut tree = ZoneTree::build_root(&self.base_regions, self.crs, backend)?;
        let root_pop = zonal_sum(&tree.nodes[tree.root.0].polygon, window, transform)?;
        tree.nodes[tree.root.0].population = Some(root_pop);

        let mut frontier: Vec<NodeId> = tree.nodes[tree.root.0].children.clone();
        let mut depth = 0usize;
        while !frontier.is_empty() {
            let scans = scan_frontier(&tree, &frontier, window, transform, threshold, backend)?;

            let mut next = Vec::new();
            for (&id, (population, parts)) in frontier.iter().zip(scans) {
                tree.nodes[id.0].population = Some(population);
                // Fewer than two surviving parts means subdivision made
                // no progress; the node stays a leaf.
                if parts.len() < 2 {
                    continue;
                }
                for part in parts {
                    let child = NodeId(tree.nodes.len());
                    tree.nodes.push(ZoneNode {
                        id: child,
                        polygon: part,
                        population: None,
                        children: Vec::new(),
                        parent: Some(id),
                    });
                    tree.nodes[id.0].children.push(child);
                    next.push(child);
                }
            }
            debug!(depth, frontier = frontier.len(), split_children = next.len(), "grow level");
            frontier = next;
            depth += 1;
        }
        Ok(tree)
    }

    pub fn root(&self) -> &ZoneNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: NodeId) -> &ZoneNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn base_regions(&self) -> &[Polygon] {
        &self.base_regions
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ZoneNode> {
        self.nodes.iter()
    }

    /// The current cut: all leaf nodes.
    pub fn leaves(&self) -> impl Iterator<Item = &ZoneNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Number of leaves with a strictly positive population.
    pub fn count_populated(&self) -> usize {
        self.leaves().filter(|n| n.population_or_zero() > 0.0).count()
    }

    /// Sum of leaf populations across the current cut.
    pub fn leaf_population_total(&self) -> f64 {
        self.leaves().map(ZoneNode::population_or_zero).sum()
    }

    /// Sum of leaf areas across the current cut.
    pub fn leaf_area_total(&self) -> f64 {
        self.leaves().map(|n| n.polygon.area()).sum()
    }
}

/// Per-node frontier scan: population plus, where the threshold is
/// exceeded, the quadrant parts to attach. Pure per node, so the
/// threaded build fans it out across a worker pool.
fn scan_frontier<B: GeometryOps + Sync>(
    tree: &ZoneTree,
    frontier: &[NodeId],
    window: &RasterWindow,
    transform: &AffineTransform,
    threshold: f64,
    backend: &B,
) -> Result<Vec<(f64, Vec<Polygon>)>, TreeError> {
    let scan_one = |id: &NodeId| -> Result<(f64, Vec<Polygon>), TreeError> {
        let polygon = &tree.nodes[id.0].polygon;
        let population = zonal_sum(polygon, window, transform)?;
        let parts = if population > threshold && !polygon.is_degenerate(GEOM_EPS) {
            split_quadrants(polygon, backend, GEOM_EPS)
        } else {
            Vec::new()
        };
        Ok((population, parts))
    };

    #[cfg(feature = "threading")]
    {
        frontier.par_iter().map(scan_one).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        frontier.iter().map(scan_one).collect()
    }
}
