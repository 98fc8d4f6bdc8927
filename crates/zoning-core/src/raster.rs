//! Population raster window and zonal statistics.
//!
//! The raster is a read-only, row-major window of aggregate population
//! values plus an affine transform mapping (col, row) cell indices to
//! world coordinates. Cell math uses f64 throughout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Polygon;

#[derive(Debug, Error, PartialEq)]
pub enum RasterError {
    #[error("affine transform is singular and cannot be inverted")]
    SingularTransform,
}

/// A 2D raster window storing population values as f64, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterWindow {
    /// Row-major cell values. Negative values are nodata.
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl RasterWindow {
    /// Create a new window filled with the given value.
    pub fn new(width: usize, height: usize, fill: f64) -> Self {
        Self { data: vec![fill; width * height], width, height }
    }

    /// Create an all-zero window.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, 0.0)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.width + col] = val;
    }

    /// Sum of all non-nodata cells in the window.
    pub fn total(&self) -> f64 {
        self.data.iter().filter(|&&v| v >= 0.0).sum()
    }
}

/// Affine transform from (col, row) cell space to world coordinates:
/// `x = a*col + b*row + c`, `y = d*col + e*row + f`. For a
/// north-up raster, `a` is the cell width, `e` the negative cell
/// height, and `(c, f)` the world position of the top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    /// North-up transform for square cells of the given resolution with
    /// the window's top-left corner at (origin_x, origin_y).
    pub fn north_up(origin_x: f64, origin_y: f64, resolution: f64) -> Self {
        Self { a: resolution, b: 0.0, c: origin_x, d: 0.0, e: -resolution, f: origin_y }
    }

    /// World coordinates of the center of cell (col, row).
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        let (fc, fr) = (col as f64 + 0.5, row as f64 + 0.5);
        (self.a * fc + self.b * fr + self.c, self.d * fc + self.e * fr + self.f)
    }

    /// Fractional (col, row) for a world coordinate.
    pub fn world_to_cell(&self, x: f64, y: f64) -> Result<(f64, f64), RasterError> {
        let det = self.a * self.e - self.b * self.d;
        if det.abs() < f64::EPSILON {
            return Err(RasterError::SingularTransform);
        }
        let (dx, dy) = (x - self.c, y - self.f);
        Ok(((self.e * dx - self.b * dy) / det, (self.a * dy - self.d * dx) / det))
    }
}

/// Sum of the raster cells whose center falls inside the polygon.
///
/// Cell indices outside the window contribute zero rather than failing,
/// and nodata (negative) cells are skipped. The scan is restricted to
/// the cell range covered by the polygon's envelope.
pub fn zonal_sum(
    polygon: &Polygon,
    window: &RasterWindow,
    transform: &AffineTransform,
) -> Result<f64, RasterError> {
    let env = polygon.envelope();
    let corners = [
        transform.world_to_cell(env.min_x, env.min_y)?,
        transform.world_to_cell(env.min_x, env.max_y)?,
        transform.world_to_cell(env.max_x, env.min_y)?,
        transform.world_to_cell(env.max_x, env.max_y)?,
    ];
    let col_lo = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor();
    let col_hi = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil();
    let row_lo = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor();
    let row_hi = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil();

    // Clamp to the window; anything outside is a zero contribution.
    let col_start = col_lo.max(0.0) as usize;
    let col_end = (col_hi.max(0.0) as usize).min(window.width);
    let row_start = row_lo.max(0.0) as usize;
    let row_end = (row_hi.max(0.0) as usize).min(window.height);

    let mut sum = 0.0;
    for row in row_start..row_end {
        for col in col_start..col_end {
            let val = window.get(row, col);
            if val < 0.0 {
                continue;
            }
            let (x, y) = transform.cell_center(col, row);
            if polygon.contains_point(crate::geom::Point::new(x, y)) {
                sum += val;
            }
        }
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_window() -> (RasterWindow, AffineTransform) {
        // 4x4 cells of resolution 0.5 covering (0,0)..(2,2), 25 each.
        let window = RasterWindow::new(4, 4, 25.0);
        let transform = AffineTransform::north_up(0.0, 2.0, 0.5);
        (window, transform)
    }

    #[test]
    fn zonal_sum_full_window() {
        let (window, transform) = uniform_window();
        let poly = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(zonal_sum(&poly, &window, &transform).unwrap(), 400.0);
    }

    #[test]
    fn zonal_sum_quadrant() {
        let (window, transform) = uniform_window();
        let poly = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(zonal_sum(&poly, &window, &transform).unwrap(), 100.0);
    }

    #[test]
    fn zonal_sum_outside_window_is_zero() {
        let (window, transform) = uniform_window();
        let poly = Polygon::rect(10.0, 10.0, 12.0, 12.0);
        assert_relative_eq!(zonal_sum(&poly, &window, &transform).unwrap(), 0.0);
    }

    #[test]
    fn zonal_sum_partially_outside_clamps() {
        let (window, transform) = uniform_window();
        // Covers the right half plus a band beyond the window edge.
        let poly = Polygon::rect(1.0, 0.0, 5.0, 2.0);
        assert_relative_eq!(zonal_sum(&poly, &window, &transform).unwrap(), 200.0);
    }

    #[test]
    fn nodata_cells_are_skipped() {
        let (mut window, transform) = uniform_window();
        window.set(0, 0, -1.0);
        let poly = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(zonal_sum(&poly, &window, &transform).unwrap(), 375.0);
        assert_relative_eq!(window.total(), 375.0);
    }

    #[test]
    fn singular_transform_is_rejected() {
        let window = RasterWindow::zeros(2, 2);
        let transform = AffineTransform { a: 0.0, b: 0.0, c: 0.0, d: 0.0, e: 0.0, f: 0.0 };
        let poly = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(zonal_sum(&poly, &window, &transform), Err(RasterError::SingularTransform));
    }

    #[test]
    fn cell_center_north_up() {
        let t = AffineTransform::north_up(0.0, 2.0, 0.5);
        let (x, y) = t.cell_center(0, 0);
        assert_relative_eq!(x, 0.25);
        assert_relative_eq!(y, 1.75);
        let (col, row) = t.world_to_cell(0.25, 1.75).unwrap();
        assert_relative_eq!(col, 0.5);
        assert_relative_eq!(row, 0.5);
    }
}
