//! Population-balanced statistical zone derivation.
//!
//! The engine grows a recursively subdividing quadrant tree over a
//! population raster, bisects for the subdivision threshold that hits
//! a target zone count, finds best-connected neighbors by shared
//! boundary length, and tabulates land-use composition per zone.
//!
//! Heavy GIS primitives are consumed through the
//! [`geom::GeometryOps`] capability trait; the bundled
//! [`geom::planar::PlanarBackend`] covers the rectilinear planar
//! workloads of the quadrant engine, so everything here is testable
//! without a GIS library.

pub mod config;
pub mod geom;
pub mod landuse;
pub mod layer;
pub mod neighbor;
pub mod raster;
pub mod solver;
pub mod stats;
pub mod tree;

pub use config::ZoningConfig;
pub use geom::{Crs, Envelope, Geometry, GeometryOps, Point, Polygon};
pub use landuse::{tabulate, ClassCode, LandUseAccumulator, LandUseFeature};
pub use layer::{TreeLayer, ZoneLayer};
pub use neighbor::{best_neighbor, shared_boundary_length};
pub use raster::{zonal_sum, AffineTransform, RasterWindow};
pub use solver::{solve, Solution, SolverConfig};
pub use tree::{NodeId, ZoneNode, ZoneTree};
