//! Quadrant splitter: one polygon into up to four envelope quadrants.

use crate::geom::{Envelope, GeometryOps, Polygon};

/// Split a polygon along the center of its bounding envelope.
///
/// The four equal-size quadrant rectangles (top-left, top-right,
/// bottom-left, bottom-right) are each intersected with the polygon;
/// multi-part results are flattened and degenerate remnants dropped.
/// The union of the returned parts equals the input up to geometric
/// tolerance, and parts overlap only on shared edges. Quadrants are
/// equal in envelope, not in enclosed area or population.
pub fn split_quadrants(polygon: &Polygon, backend: &impl GeometryOps, eps: f64) -> Vec<Polygon> {
    let env = polygon.envelope();
    let c = env.center();
    let quadrants = [
        Envelope::new(env.min_x, c.y, c.x, env.max_y),
        Envelope::new(c.x, c.y, env.max_x, env.max_y),
        Envelope::new(env.min_x, env.min_y, c.x, c.y),
        Envelope::new(c.x, env.min_y, env.max_x, c.y),
    ];
    quadrants
        .iter()
        .flat_map(|q| backend.clip_rect(polygon, q).flatten_polygons(eps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{planar::PlanarBackend, Point, GEOM_EPS};
    use approx::assert_relative_eq;

    #[test]
    fn square_splits_into_four_equal_quadrants() {
        let backend = PlanarBackend::new();
        let square = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        let parts = split_quadrants(&square, &backend, GEOM_EPS);
        assert_eq!(parts.len(), 4);
        for part in &parts {
            assert_relative_eq!(part.area(), 1.0, epsilon = 1e-9);
        }
        // Top-left quadrant comes first.
        let env = parts[0].envelope();
        assert_relative_eq!(env.min_x, 0.0);
        assert_relative_eq!(env.min_y, 1.0);
    }

    #[test]
    fn coverage_is_preserved_for_concave_input() {
        // L-shape: 4x4 square minus its top-right 2x2 corner.
        let l_shape = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let backend = PlanarBackend::new();
        let parts = split_quadrants(&l_shape, &backend, GEOM_EPS);
        let total: f64 = parts.iter().map(Polygon::area).sum();
        assert_relative_eq!(total, l_shape.area(), epsilon = 1e-9);
        // The top-right quadrant is empty for this shape.
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn disconnected_quadrant_intersection_yields_simple_parts() {
        // Comb over (0,0)..(4,4): a top bar with two teeth reaching
        // down into the bottom-left quadrant. That quadrant's
        // intersection is disconnected and must come back as two
        // separate parts, not one ring bridged along the split line.
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
        let parts = split_quadrants(&comb, &backend, GEOM_EPS);
        assert_eq!(parts.len(), 4);
        let total: f64 = parts.iter().map(Polygon::area).sum();
        assert_relative_eq!(total, comb.area(), epsilon = 1e-9);
        // The two teeth below the split line are 0.4 x 2.0 rectangles.
        let teeth: Vec<_> = parts.iter().filter(|p| p.envelope().max_y <= 2.0).collect();
        assert_eq!(teeth.len(), 2);
        for tooth in teeth {
            assert_relative_eq!(tooth.area(), 0.8, epsilon = 1e-9);
        }
    }

    #[test]
    fn parts_do_not_overlap_beyond_shared_edges() {
        let backend = PlanarBackend::new();
        let square = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        let parts = split_quadrants(&square, &backend, GEOM_EPS);
        for i in 0..parts.len() {
            for j in (i + 1)..parts.len() {
                let overlap = backend.intersection(&parts[i], &parts[j]);
                assert!(overlap.area() < 1e-9);
            }
        }
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        let backend = PlanarBackend::new();
        let sliver = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]);
        assert!(split_quadrants(&sliver, &backend, GEOM_EPS).is_empty());
    }
}
