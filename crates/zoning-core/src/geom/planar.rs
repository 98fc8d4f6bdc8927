//! Bundled in-memory geometry backend.
//!
//! Exact for the rectilinear planar workloads the quadrant engine
//! produces: axis-aligned clipping via Sutherland–Hodgman, a vertex
//! grid overlay for non-convex intersections, rectilinear coverage
//! dissolve via boundary-edge cancellation, and a boundary-contact
//! `touches` test. Reprojection is pass-through only; a real GIS
//! backend can be swapped in through [`GeometryOps`] when arbitrary
//! geometry or CRS support is needed.

use std::collections::BTreeMap;

use tracing::warn;

use super::{
    ring_area, ring_contains, ring_edges, Crs, Envelope, GeomError, Geometry, GeometryOps, Point,
    Polygon, GEOM_EPS,
};

/// Quantization scale used to key vertices during dissolve stitching.
const KEY_SCALE: f64 = 1e6;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarBackend;

impl PlanarBackend {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryOps for PlanarBackend {
    fn dissolve(&self, polygons: &[Polygon]) -> Result<Polygon, GeomError> {
        if polygons.is_empty() {
            return Err(GeomError::EmptyDissolve);
        }
        if polygons.len() == 1 {
            return Ok(polygons[0].clone());
        }
        dissolve_coverage(polygons)
    }

    fn clip_rect(&self, polygon: &Polygon, rect: &Envelope) -> Geometry {
        let clip = rect.to_polygon();
        clip_against_convex(polygon, &clip.exterior)
    }

    fn intersection(&self, a: &Polygon, b: &Polygon) -> Geometry {
        // Sutherland–Hodgman needs a convex clip region; pick whichever
        // operand is convex. Two non-convex operands go through the
        // vertex grid overlay instead.
        if is_convex(&b.exterior) {
            clip_against_convex(a, &ccw(&b.exterior))
        } else if is_convex(&a.exterior) {
            clip_against_convex(b, &ccw(&a.exterior))
        } else {
            rectilinear_overlay(a, b)
        }
    }

    fn touches(&self, a: &Polygon, b: &Polygon) -> bool {
        if !a.envelope().intersects(&b.envelope()) {
            return false;
        }
        if interiors_overlap(a, b) {
            return false;
        }
        boundary_contact(a, b)
    }

    fn transform(&self, polygon: &Polygon, from: Crs, to: Crs) -> Result<Polygon, GeomError> {
        if from == to {
            Ok(polygon.clone())
        } else {
            Err(GeomError::UnsupportedTransform { from, to })
        }
    }
}

// ── Sutherland–Hodgman clipping ───────────────────────────────────────────────

/// Clip every ring of `polygon` against a convex counter-clockwise
/// ring. Hole rings of the clip operand are ignored.
///
/// A disconnected intersection leaves the Sutherland–Hodgman output as
/// one self-touching ring whose components are bridged by coincident
/// opposite edges along the clip boundary. Cancelling those bridges
/// and restitching splits the ring back into its simple components,
/// so callers see a proper multi-part result.
fn clip_against_convex(polygon: &Polygon, clip: &[Point]) -> Geometry {
    let ring = clip_ring(&ccw(&polygon.exterior), clip);
    if ring.len() < 3 || ring_area(&ring).abs() < GEOM_EPS {
        return Geometry::MultiPolygon(Vec::new());
    }
    let exteriors: Vec<Vec<Point>> = match cancel_and_stitch(std::slice::from_ref(&ring)) {
        Ok(rings) => rings
            .into_iter()
            .filter(|r| ring_area(r) > GEOM_EPS)
            .collect(),
        Err(_) => {
            warn!("clipped ring could not be split into simple components");
            vec![ring]
        }
    };
    let holes: Vec<Vec<Point>> = polygon
        .holes
        .iter()
        .map(|h| clip_ring(h, clip))
        .filter(|h| ring_area(h).abs() >= GEOM_EPS)
        .collect();
    let mut parts: Vec<Polygon> = exteriors
        .into_iter()
        .map(|exterior| {
            let part_holes = holes
                .iter()
                .filter(|h| ring_contains(&exterior, h[0]))
                .cloned()
                .collect();
            Polygon::with_holes(exterior, part_holes)
        })
        .collect();
    match parts.len() {
        0 => Geometry::MultiPolygon(Vec::new()),
        1 => Geometry::Polygon(parts.pop().unwrap()),
        _ => Geometry::MultiPolygon(parts),
    }
}

/// One subject ring clipped against a convex CCW ring.
fn clip_ring(ring: &[Point], clip: &[Point]) -> Vec<Point> {
    let mut output = ring.to_vec();
    for (c1, c2) in ring_edges(clip) {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        for i in 0..input.len() {
            let prev = input[(i + input.len() - 1) % input.len()];
            let cur = input[i];
            let prev_in = inside_edge(c1, c2, prev);
            let cur_in = inside_edge(c1, c2, cur);
            if cur_in {
                if !prev_in {
                    output.push(edge_line_intersection(prev, cur, c1, c2));
                }
                output.push(cur);
            } else if prev_in {
                output.push(edge_line_intersection(prev, cur, c1, c2));
            }
        }
    }
    dedup_ring(output)
}

/// Half-plane test: on or to the left of the directed clip edge.
fn inside_edge(c1: Point, c2: Point, p: Point) -> bool {
    cross(c1, c2, p) >= -GEOM_EPS
}

fn cross(origin: Point, a: Point, b: Point) -> f64 {
    (a.x - origin.x) * (b.y - origin.y) - (a.y - origin.y) * (b.x - origin.x)
}

/// Intersection of segment `a -> b` with the infinite line through the
/// clip edge `c1 -> c2`.
fn edge_line_intersection(a: Point, b: Point, c1: Point, c2: Point) -> Point {
    let d1 = cross(c1, c2, a);
    let d2 = cross(c1, c2, b);
    let t = d1 / (d1 - d2);
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

fn dedup_ring(ring: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for p in ring {
        if let Some(last) = out.last() {
            if (last.x - p.x).abs() < GEOM_EPS && (last.y - p.y).abs() < GEOM_EPS {
                continue;
            }
        }
        out.push(p);
    }
    while out.len() > 1 {
        let first = out[0];
        let last = *out.last().unwrap();
        if (first.x - last.x).abs() < GEOM_EPS && (first.y - last.y).abs() < GEOM_EPS {
            out.pop();
        } else {
            break;
        }
    }
    out
}

fn is_convex(ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let n = ring.len();
    let mut sign = 0.0_f64;
    for i in 0..n {
        let c = cross(ring[i], ring[(i + 1) % n], ring[(i + 2) % n]);
        if c.abs() < GEOM_EPS {
            continue;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}

/// Ring re-oriented counter-clockwise.
fn ccw(ring: &[Point]) -> Vec<Point> {
    if ring_area(ring) >= 0.0 {
        ring.to_vec()
    } else {
        ring.iter().rev().copied().collect()
    }
}

// ── Non-convex overlay ────────────────────────────────────────────────────────

/// Intersection of two non-convex polygons on their combined vertex
/// grid. For rectilinear operands the grid lines pass through every
/// boundary edge, so each grid cell lies entirely inside or outside
/// each polygon and cell-center membership decides it exactly. The
/// returned parts tile the overlap without overlapping each other.
fn rectilinear_overlay(a: &Polygon, b: &Polygon) -> Geometry {
    if !is_rectilinear(a) || !is_rectilinear(b) {
        warn!("overlay of non-convex, non-rectilinear polygons approximated on the vertex grid");
    }
    let env_a = a.envelope();
    let env_b = b.envelope();
    let lo_x = env_a.min_x.max(env_b.min_x);
    let hi_x = env_a.max_x.min(env_b.max_x);
    let lo_y = env_a.min_y.max(env_b.min_y);
    let hi_y = env_a.max_y.min(env_b.max_y);
    if hi_x - lo_x < GEOM_EPS || hi_y - lo_y < GEOM_EPS {
        return Geometry::MultiPolygon(Vec::new());
    }

    let xs = grid_coords(a, b, lo_x, hi_x, |p| p.x);
    let ys = grid_coords(a, b, lo_y, hi_y, |p| p.y);
    let mut parts = Vec::new();
    for cols in xs.windows(2) {
        for rows in ys.windows(2) {
            let center = Point::new((cols[0] + cols[1]) / 2.0, (rows[0] + rows[1]) / 2.0);
            if a.contains_point(center) && b.contains_point(center) {
                parts.push(Polygon::rect(cols[0], rows[0], cols[1], rows[1]));
            }
        }
    }
    Geometry::MultiPolygon(parts)
}

/// Sorted, deduplicated grid coordinates along one axis: the overlap
/// bounds plus every vertex coordinate of either polygon between them.
fn grid_coords(a: &Polygon, b: &Polygon, lo: f64, hi: f64, axis: impl Fn(&Point) -> f64) -> Vec<f64> {
    let mut coords = vec![lo, hi];
    for poly in [a, b] {
        for ring in std::iter::once(&poly.exterior).chain(poly.holes.iter()) {
            for p in ring {
                let v = axis(p);
                if v > lo + GEOM_EPS && v < hi - GEOM_EPS {
                    coords.push(v);
                }
            }
        }
    }
    coords.sort_by(f64::total_cmp);
    coords.dedup_by(|x, y| (*x - *y).abs() < GEOM_EPS);
    coords
}

fn is_rectilinear(polygon: &Polygon) -> bool {
    std::iter::once(&polygon.exterior)
        .chain(polygon.holes.iter())
        .all(|ring| {
            ring_edges(ring)
                .all(|(a, b)| (a.x - b.x).abs() < GEOM_EPS || (a.y - b.y).abs() < GEOM_EPS)
        })
}

// ── Touches ───────────────────────────────────────────────────────────────────

/// Overlapping interiors: a vertex of one polygon strictly inside the
/// other, or a proper boundary crossing. Sound for the rectilinear
/// zone polygons this backend serves (coincident polygons excluded at
/// the call sites by identity).
fn interiors_overlap(a: &Polygon, b: &Polygon) -> bool {
    if a.exterior.iter().any(|&p| strictly_inside(b, p))
        || b.exterior.iter().any(|&p| strictly_inside(a, p))
    {
        return true;
    }
    for (a1, a2) in a.exterior_edges() {
        for (b1, b2) in b.exterior_edges() {
            if segments_cross_properly(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

fn strictly_inside(poly: &Polygon, p: Point) -> bool {
    poly.contains_point(p) && !on_boundary(poly, p)
}

fn on_boundary(poly: &Polygon, p: Point) -> bool {
    poly.exterior_edges().any(|(a, b)| point_on_segment(p, a, b))
        || poly
            .holes
            .iter()
            .any(|h| ring_edges(h).any(|(a, b)| point_on_segment(p, a, b)))
}

fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let len2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len2 < GEOM_EPS {
        return (p.x - a.x).abs() < GEOM_EPS && (p.y - a.y).abs() < GEOM_EPS;
    }
    let area = cross(a, b, p).abs();
    if area * area > GEOM_EPS * len2 {
        return false;
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len2;
    (-GEOM_EPS..=1.0 + GEOM_EPS).contains(&t)
}

/// Segments crossing at a point interior to both (collinear overlap
/// does not count as a proper crossing).
fn segments_cross_properly(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    d1 * d2 < -GEOM_EPS && d3 * d4 < -GEOM_EPS
}

/// Shared boundary: any collinear edge overlap of positive length, or
/// bare vertex contact (corner touch).
fn boundary_contact(a: &Polygon, b: &Polygon) -> bool {
    for (a1, a2) in a.exterior_edges() {
        for (b1, b2) in b.exterior_edges() {
            if collinear_overlap_length(a1, a2, b1, b2) > GEOM_EPS {
                return true;
            }
        }
    }
    a.exterior.iter().any(|&p| on_boundary(b, p))
        || b.exterior.iter().any(|&p| on_boundary(a, p))
}

/// Length of the overlap of two collinear segments; zero when they are
/// not collinear or meet only at a point.
pub(crate) fn collinear_overlap_length(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    if cross(a1, a2, b1).abs() > GEOM_EPS || cross(a1, a2, b2).abs() > GEOM_EPS {
        return 0.0;
    }
    let len = ((a2.x - a1.x).powi(2) + (a2.y - a1.y).powi(2)).sqrt();
    if len < GEOM_EPS {
        return 0.0;
    }
    // Parametrize both segments along a1 -> a2.
    let proj = |p: Point| ((p.x - a1.x) * (a2.x - a1.x) + (p.y - a1.y) * (a2.y - a1.y)) / len;
    let (s1, s2) = (proj(b1).min(proj(b2)), proj(b1).max(proj(b2)));
    let lo = s1.max(0.0);
    let hi = s2.min(len);
    (hi - lo).max(0.0)
}

// ── Dissolve ──────────────────────────────────────────────────────────────────

type VKey = (i64, i64);

fn vkey(p: Point) -> VKey {
    ((p.x * KEY_SCALE).round() as i64, (p.y * KEY_SCALE).round() as i64)
}

/// Union of an edge-connected rectilinear coverage by cancelling the
/// interior edges shared by adjacent polygons and stitching what
/// remains back into boundary rings.
fn dissolve_coverage(polygons: &[Polygon]) -> Result<Polygon, GeomError> {
    let mut rings: Vec<Vec<Point>> = Vec::new();
    for poly in polygons {
        rings.push(ccw(&poly.exterior));
        for hole in &poly.holes {
            // Holes run clockwise so they cancel against polygons that
            // fill them.
            rings.push(ccw(hole).into_iter().rev().collect());
        }
    }

    let stitched = cancel_and_stitch(&rings)?;

    let mut exteriors: Vec<Vec<Point>> = Vec::new();
    let mut holes: Vec<Vec<Point>> = Vec::new();
    for ring in stitched {
        if ring_area(&ring) > 0.0 {
            exteriors.push(ring);
        } else {
            holes.push(ring);
        }
    }
    match exteriors.len() {
        1 => Ok(Polygon::with_holes(exteriors.pop().unwrap(), holes)),
        _ => Err(GeomError::DisjointCoverage),
    }
}

/// Split the input rings' edges at T-junction vertices, cancel
/// coincident opposite directed edges, and stitch the survivors into
/// closed rings. Shared interior boundaries and zero-width bridge
/// corridors both cancel, so the output is the set of simple boundary
/// rings of the covered area.
fn cancel_and_stitch(rings: &[Vec<Point>]) -> Result<Vec<Vec<Point>>, GeomError> {
    let mut points: BTreeMap<VKey, Point> = BTreeMap::new();
    let mut raw_edges: Vec<(Point, Point)> = Vec::new();
    for ring in rings {
        for p in ring {
            points.insert(vkey(*p), *p);
        }
        for (a, b) in ring_edges(ring) {
            if vkey(a) != vkey(b) {
                raw_edges.push((a, b));
            }
        }
    }

    // Split edges at T-junction vertices so coincident boundaries
    // cancel even when the rings subdivide them differently.
    let all_points: Vec<Point> = points.values().copied().collect();
    let mut edges: Vec<(Point, Point)> = Vec::new();
    for (a, b) in raw_edges {
        let mut cuts: Vec<(f64, Point)> = all_points
            .iter()
            .filter(|&&v| {
                vkey(v) != vkey(a) && vkey(v) != vkey(b) && point_on_segment(v, a, b)
            })
            .map(|&v| {
                let t = (v.x - a.x) * (b.x - a.x) + (v.y - a.y) * (b.y - a.y);
                (t, v)
            })
            .collect();
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut start = a;
        for (_, v) in cuts {
            edges.push((start, v));
            start = v;
        }
        edges.push((start, b));
    }

    // Cancel opposite directed edges (interior boundaries).
    let mut counts: BTreeMap<(VKey, VKey), usize> = BTreeMap::new();
    for (a, b) in &edges {
        let k = (vkey(*a), vkey(*b));
        let rev = (k.1, k.0);
        match counts.get_mut(&rev) {
            Some(n) if *n > 0 => *n -= 1,
            _ => *counts.entry(k).or_insert(0) += 1,
        }
    }

    let mut outgoing: BTreeMap<VKey, Vec<VKey>> = BTreeMap::new();
    for ((ka, kb), n) in &counts {
        for _ in 0..*n {
            outgoing.entry(*ka).or_default().push(*kb);
        }
    }

    stitch_rings(&mut outgoing, &points)
}

/// Walk the remaining directed edges into closed rings, taking the
/// sharpest left turn at junction vertices so each ring stays simple.
/// Ordered maps keep the walk, and with it the output vertex order,
/// deterministic across rebuilds.
fn stitch_rings(
    outgoing: &mut BTreeMap<VKey, Vec<VKey>>,
    points: &BTreeMap<VKey, Point>,
) -> Result<Vec<Vec<Point>>, GeomError> {
    let mut rings = Vec::new();
    loop {
        let Some((&start, _)) = outgoing.iter().find(|(_, v)| !v.is_empty()) else {
            break;
        };
        let mut ring_keys = vec![start];
        let mut cur = outgoing.get_mut(&start).unwrap().pop().unwrap();
        let mut prev = start;
        while cur != start {
            ring_keys.push(cur);
            let candidates = outgoing.get_mut(&cur).ok_or(GeomError::DisjointCoverage)?;
            if candidates.is_empty() {
                return Err(GeomError::DisjointCoverage);
            }
            let incoming = direction(points[&prev], points[&cur]);
            let best = (0..candidates.len())
                .max_by(|&i, &j| {
                    let ti = turn_angle(incoming, direction(points[&cur], points[&candidates[i]]));
                    let tj = turn_angle(incoming, direction(points[&cur], points[&candidates[j]]));
                    ti.total_cmp(&tj)
                })
                .unwrap();
            let next = candidates.swap_remove(best);
            prev = cur;
            cur = next;
        }
        rings.push(ring_keys.iter().map(|k| points[k]).collect());
    }
    Ok(rings)
}

fn direction(from: Point, to: Point) -> Point {
    Point::new(to.x - from.x, to.y - from.y)
}

/// Signed turn angle from `v` to `w` in (-pi, pi]; larger = sharper
/// left turn.
fn turn_angle(v: Point, w: Point) -> f64 {
    let crossp = v.x * w.y - v.y * w.x;
    let dot = v.x * w.x + v.y * w.y;
    crossp.atan2(dot)
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clip_rect_keeps_inner_area() {
        let backend = PlanarBackend::new();
        let subject = Polygon::rect(0.0, 0.0, 10.0, 10.0);
        let clipped = backend.clip_rect(&subject, &Envelope::new(5.0, 5.0, 15.0, 15.0));
        assert_relative_eq!(clipped.area(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn clip_rect_outside_is_empty() {
        let backend = PlanarBackend::new();
        let subject = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let clipped = backend.clip_rect(&subject, &Envelope::new(5.0, 5.0, 6.0, 6.0));
        assert!(clipped.flatten_polygons(GEOM_EPS).is_empty());
    }

    #[test]
    fn clip_concave_subject_preserves_area() {
        // L-shape: 3x3 square minus its top-right 2x2 corner.
        let l_shape = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ]);
        assert_relative_eq!(l_shape.area(), 5.0);
        let backend = PlanarBackend::new();
        let left = backend.clip_rect(&l_shape, &Envelope::new(0.0, 0.0, 1.0, 3.0));
        let right = backend.clip_rect(&l_shape, &Envelope::new(1.0, 0.0, 3.0, 3.0));
        assert_relative_eq!(left.area() + right.area(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn nonconvex_intersection_is_exact() {
        // x <= 1 or y <= 1 inside a 3x3 square.
        let l_shape = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ]);
        // x >= 2 or y >= 2 inside the same square.
        let gamma = Polygon::new(vec![
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(0.0, 3.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
        ]);
        // True overlap is the two 1x1 corner cells, not the 5.0 an
        // envelope approximation of either operand would report.
        let backend = PlanarBackend::new();
        assert_relative_eq!(backend.intersection(&l_shape, &gamma).area(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(backend.intersection(&gamma, &l_shape).area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn clip_rect_splits_disconnected_intersection() {
        // Comb: a top bar with two teeth reaching down into the
        // bottom-left envelope quadrant.
        let comb = Polygon::new(vec![
            Point::new(0.2, 0.0),
            Point::new(0.6, 0.0),
            Point::new(0.6, 3.0),
            Point::new(1.2, 3.0),
            Point::new(1.2, 0.0),
            Point::new(1.6, 0.0),
            Point::new(1.6, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(0.0, 3.0),
            Point::new(0.2, 3.0),
        ]);
        let backend = PlanarBackend::new();
        let clipped = backend.clip_rect(&comb, &Envelope::new(0.0, 0.0, 2.0, 2.0));
        let parts = clipped.flatten_polygons(GEOM_EPS);
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert_relative_eq!(part.area(), 0.8, epsilon = 1e-9);
            assert_eq!(part.exterior.len(), 4);
        }
    }

    #[test]
    fn dissolve_four_unit_squares() {
        let backend = PlanarBackend::new();
        let squares = vec![
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(1.0, 0.0, 2.0, 1.0),
            Polygon::rect(0.0, 1.0, 1.0, 2.0),
            Polygon::rect(1.0, 1.0, 2.0, 2.0),
        ];
        let merged = backend.dissolve(&squares).unwrap();
        assert_relative_eq!(merged.area(), 4.0, epsilon = 1e-9);
        let env = merged.envelope();
        assert_relative_eq!(env.width(), 2.0);
        assert_relative_eq!(env.height(), 2.0);
        assert!(merged.holes.is_empty());
    }

    #[test]
    fn dissolve_handles_t_junctions() {
        // A 2x1 slab over two 1x1 squares: shared boundary is split
        // differently on each side.
        let backend = PlanarBackend::new();
        let parts = vec![
            Polygon::rect(0.0, 1.0, 2.0, 2.0),
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(1.0, 0.0, 2.0, 1.0),
        ];
        let merged = backend.dissolve(&parts).unwrap();
        assert_relative_eq!(merged.area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn dissolve_disjoint_is_an_error() {
        let backend = PlanarBackend::new();
        let parts = vec![
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(5.0, 5.0, 6.0, 6.0),
        ];
        assert_eq!(backend.dissolve(&parts), Err(GeomError::DisjointCoverage));
    }

    #[test]
    fn dissolve_empty_is_an_error() {
        let backend = PlanarBackend::new();
        assert_eq!(backend.dissolve(&[]), Err(GeomError::EmptyDissolve));
    }

    #[test]
    fn touches_edge_neighbors() {
        let backend = PlanarBackend::new();
        let a = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let b = Polygon::rect(1.0, 0.0, 2.0, 1.0);
        assert!(backend.touches(&a, &b));
    }

    #[test]
    fn touches_corner_contact() {
        let backend = PlanarBackend::new();
        let a = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let b = Polygon::rect(1.0, 1.0, 2.0, 2.0);
        assert!(backend.touches(&a, &b));
    }

    #[test]
    fn overlapping_interiors_do_not_touch() {
        let backend = PlanarBackend::new();
        let a = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        let b = Polygon::rect(1.0, 1.0, 3.0, 3.0);
        assert!(!backend.touches(&a, &b));
    }

    #[test]
    fn disjoint_polygons_do_not_touch() {
        let backend = PlanarBackend::new();
        let a = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let b = Polygon::rect(3.0, 3.0, 4.0, 4.0);
        assert!(!backend.touches(&a, &b));
    }

    #[test]
    fn transform_is_identity_for_equal_crs() {
        let backend = PlanarBackend::new();
        let p = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(backend.transform(&p, Crs(3035), Crs(3035)).unwrap(), p);
        assert_eq!(
            backend.transform(&p, Crs(31468), Crs(3035)),
            Err(GeomError::UnsupportedTransform { from: Crs(31468), to: Crs(3035) })
        );
    }

    #[test]
    fn collinear_overlap_lengths() {
        let a1 = Point::new(0.0, 0.0);
        let a2 = Point::new(0.0, 10.0);
        // Full overlap of a sub-segment.
        assert_relative_eq!(
            collinear_overlap_length(a1, a2, Point::new(0.0, 2.0), Point::new(0.0, 6.0)),
            4.0
        );
        // Point contact only.
        assert_relative_eq!(
            collinear_overlap_length(a1, a2, Point::new(0.0, 10.0), Point::new(0.0, 20.0)),
            0.0
        );
        // Different line.
        assert_relative_eq!(
            collinear_overlap_length(a1, a2, Point::new(1.0, 0.0), Point::new(1.0, 10.0)),
            0.0
        );
    }
}
