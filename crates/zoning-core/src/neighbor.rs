//! Shared-boundary neighbor finder.
//!
//! Adjacency between zones is scored by the total length of exterior
//! boundary they share. Only axis-aligned edges participate: quadrant
//! zones are rectilinear, and non-axis-aligned edges of irregular base
//! regions are excluded from scoring. That exclusion is a known
//! limitation of the scoring, kept deliberately.

use tracing::info;

use crate::geom::{Point, GeometryOps, Polygon, GEOM_EPS};
use crate::tree::{NodeId, ZoneNode};

/// Exterior-ring edges split into axis-aligned vertical and horizontal
/// segments; everything else is dropped.
fn axis_segments(polygon: &Polygon) -> (Vec<(Point, Point)>, Vec<(Point, Point)>) {
    let mut vertical = Vec::new();
    let mut horizontal = Vec::new();
    for (a, b) in polygon.exterior_edges() {
        if (a.x - b.x).abs() < GEOM_EPS {
            vertical.push((a, b));
        } else if (a.y - b.y).abs() < GEOM_EPS {
            horizontal.push((a, b));
        }
    }
    (vertical, horizontal)
}

/// Overlap length of two collinear axis-aligned segments along the
/// given axis; zero for parallel-but-offset segments and for bare
/// point contact.
fn overlap_1d(a_lo: f64, a_hi: f64, b_lo: f64, b_hi: f64) -> f64 {
    (a_hi.min(b_hi) - a_lo.max(b_lo)).max(0.0)
}

/// Total shared axis-aligned boundary length between two polygons.
///
/// Every vertical segment of one is intersected against every vertical
/// segment of the other (likewise horizontal); only line overlaps
/// count, so corner-only contact scores zero.
pub fn shared_boundary_length(a: &Polygon, b: &Polygon) -> f64 {
    let (a_vert, a_hori) = axis_segments(a);
    let (b_vert, b_hori) = axis_segments(b);

    let mut length = 0.0;
    for (p1, p2) in &a_vert {
        for (q1, q2) in &b_vert {
            if (p1.x - q1.x).abs() < GEOM_EPS {
                let l = overlap_1d(
                    p1.y.min(p2.y), p1.y.max(p2.y),
                    q1.y.min(q2.y), q1.y.max(q2.y),
                );
                if l > GEOM_EPS {
                    length += l;
                }
            }
        }
    }
    for (p1, p2) in &a_hori {
        for (q1, q2) in &b_hori {
            if (p1.y - q1.y).abs() < GEOM_EPS {
                let l = overlap_1d(
                    p1.x.min(p2.x), p1.x.max(p2.x),
                    q1.x.min(q2.x), q1.x.max(q2.x),
                );
                if l > GEOM_EPS {
                    length += l;
                }
            }
        }
    }
    length
}

/// The best-connected neighbor of `node` among `candidates`: the
/// touching candidate with the strictly greatest shared boundary
/// length. Ties resolve to the earliest candidate in iteration order.
///
/// Returns `None` when every candidate shares zero boundary length
/// (corner contact only, or no contact). That is an informational
/// outcome, not an error; the caller decides whether to merge, skip,
/// or flag the zone.
pub fn best_neighbor<'a, I>(
    node: &ZoneNode,
    candidates: I,
    backend: &impl GeometryOps,
) -> Option<NodeId>
where
    I: IntoIterator<Item = &'a ZoneNode>,
{
    let mut max_length = 0.0;
    let mut best: Option<NodeId> = None;
    for candidate in candidates {
        if candidate.id == node.id || !backend.touches(&candidate.polygon, &node.polygon) {
            continue;
        }
        let length = shared_boundary_length(&node.polygon, &candidate.polygon);
        if length > max_length {
            max_length = length;
            best = Some(candidate.id);
        }
    }
    if best.is_none() {
        info!(node = node.id.0, "no neighbor with positive shared boundary length");
    }
    best
}
