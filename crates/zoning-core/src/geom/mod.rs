//! Planar geometry model for the zoning engine.
//!
//! Polygons are plain ring lists in a working coordinate reference.
//! Anything heavier (dissolve, clipping, touches, reprojection) is
//! consumed through the [`GeometryOps`] capability trait, so the engine
//! runs unchanged against the bundled [`planar::PlanarBackend`] or a
//! real GIS backend.

pub mod planar;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance below which lengths and areas are treated as zero.
pub const GEOM_EPS: f64 = 1e-9;

// ── Points and envelopes ──────────────────────────────────────────────────────

/// A point in the working (projected, planar) coordinate reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Smallest envelope containing every point of `points`.
    /// Returns a degenerate zero envelope for an empty slice.
    pub fn of_points(points: &[Point]) -> Self {
        let mut env = Envelope::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            env.min_x = env.min_x.min(p.x);
            env.min_y = env.min_y.min(p.y);
            env.max_x = env.max_x.max(p.x);
            env.max_y = env.max_y.max(p.y);
        }
        if points.is_empty() {
            Envelope::new(0.0, 0.0, 0.0, 0.0)
        } else {
            env
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// True when the rectangles overlap or share boundary (closed test).
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Counter-clockwise rectangle polygon over this envelope.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(vec![
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ])
    }
}

/// EPSG code of a coordinate reference system. The engine never
/// interprets the code; it only checks equality and hands transform
/// requests to the geometry capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(pub u32);

// ── Polygons ──────────────────────────────────────────────────────────────────

/// A simple polygon: one exterior ring plus zero or more hole rings.
/// Rings are stored open (the first vertex is not repeated at the end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Self {
        Self { exterior, holes: Vec::new() }
    }

    pub fn with_holes(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { exterior, holes }
    }

    /// Axis-aligned rectangle polygon.
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Envelope::new(min_x, min_y, max_x, max_y).to_polygon()
    }

    /// Unsigned area: exterior shoelace area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| ring_area(h).abs()).sum();
        (ring_area(&self.exterior).abs() - holes).max(0.0)
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::of_points(&self.exterior)
    }

    /// Ordered exterior boundary vertices.
    pub fn exterior_vertices(&self) -> &[Point] {
        &self.exterior
    }

    /// Exterior boundary edges, including the closing edge.
    pub fn exterior_edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        ring_edges(&self.exterior)
    }

    /// True when the polygon cannot enclose any area (fewer than three
    /// vertices, or area below `eps` after clipping collapsed it).
    pub fn is_degenerate(&self, eps: f64) -> bool {
        self.exterior.len() < 3 || self.area() < eps
    }

    /// Even-odd point-in-polygon test; hole interiors count as outside.
    /// Points exactly on the boundary follow the half-open crossing
    /// convention, so a point on an edge shared by two tiling polygons
    /// is attributed to exactly one of them.
    pub fn contains_point(&self, p: Point) -> bool {
        if !ring_contains(&self.exterior, p) {
            return false;
        }
        !self.holes.iter().any(|h| ring_contains(h, p))
    }
}

/// Signed shoelace area of an open ring (positive = counter-clockwise).
pub fn ring_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (a, b) in ring_edges(ring) {
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Edges of an open ring, closing edge included.
pub fn ring_edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
}

pub(crate) fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

// ── Geometry variant ──────────────────────────────────────────────────────────

/// Tagged geometry variant covering the shapes a clipping or overlay
/// operation can produce. One flattening function turns any of them
/// into simple polygons; point and line remnants never survive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Flatten into simple polygons, dropping parts whose area falls
    /// below `eps` (degenerate clip remnants).
    pub fn flatten_polygons(self, eps: f64) -> Vec<Polygon> {
        let mut out = Vec::new();
        self.collect_polygons(eps, &mut out);
        out
    }

    fn collect_polygons(self, eps: f64, out: &mut Vec<Polygon>) {
        match self {
            Geometry::Polygon(p) => {
                if !p.is_degenerate(eps) {
                    out.push(p);
                }
            }
            Geometry::MultiPolygon(parts) => {
                for p in parts {
                    if !p.is_degenerate(eps) {
                        out.push(p);
                    }
                }
            }
            Geometry::Collection(items) => {
                for g in items {
                    g.collect_polygons(eps, out);
                }
            }
        }
    }

    /// Total area across all polygon parts.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(parts) => parts.iter().map(Polygon::area).sum(),
            Geometry::Collection(items) => items.iter().map(Geometry::area).sum(),
        }
    }
}

// ── Capability trait ──────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum GeomError {
    #[error("cannot dissolve an empty polygon set")]
    EmptyDissolve,
    #[error("dissolve input is not an edge-connected coverage")]
    DisjointCoverage,
    #[error("unsupported transform EPSG:{} -> EPSG:{}", .from.0, .to.0)]
    UnsupportedTransform { from: Crs, to: Crs },
}

/// Injected geometry capability (external GIS primitives). The engine
/// only ever calls these five operations; their internals are assumed
/// correct. [`planar::PlanarBackend`] is the bundled rectilinear
/// implementation used by tests and the CLI.
pub trait GeometryOps {
    /// Cascaded union of the polygons into one boundary.
    fn dissolve(&self, polygons: &[Polygon]) -> Result<Polygon, GeomError>;

    /// Intersection of a polygon with an axis-aligned rectangle.
    fn clip_rect(&self, polygon: &Polygon, rect: &Envelope) -> Geometry;

    /// Intersection of two polygons.
    fn intersection(&self, a: &Polygon, b: &Polygon) -> Geometry;

    /// Boundary contact without interior overlap.
    fn touches(&self, a: &Polygon, b: &Polygon) -> bool;

    /// Reproject a polygon between coordinate references.
    fn transform(&self, polygon: &Polygon, from: Crs, to: Crs) -> Result<Polygon, GeomError>;
}

// ── Unit tests ────────────────────────────────────────────────────────────────
