//! Shared utilities for pattern generation.
//!
//! Most generators lay an unclipped lattice over the shape, rotate it about
//! the shape centre and clip. The common setup lives here.

use std::f64::consts::PI;

use crate::clip::point_in_body;
use crate::geometry::{Line, Point, Polygon};

/// Context for pattern generation with pre-computed values.
///
/// # Example
/// ```ignore
/// let ctx = PatternContext::new(polygon, spacing, angle_degrees)?;
/// let (x, y) = ctx.rotate(px, py);
/// ```
#[derive(Clone)]
pub struct PatternContext<'a> {
    /// Reference to the polygon being filled
    pub polygon: &'a Polygon,
    /// Spacing parameter from the fill request
    pub spacing: f64,
    /// Rotation about `center`
    pub rotation: RotationTransform,
    /// Bounding box: (min_x, min_y, max_x, max_y)
    pub bounds: (f64, f64, f64, f64),
    /// Center of bounding box
    pub center: Point,
    /// Diagonal length of bounding box
    pub diagonal: f64,
}

impl<'a> PatternContext<'a> {
    /// Create a new pattern context, returning None if polygon is invalid.
    pub fn new(polygon: &'a Polygon, spacing: f64, angle_degrees: f64) -> Option<Self> {
        if !polygon.is_valid() || !(spacing.is_finite() && spacing > 0.0) {
            return None;
        }

        let bounds = polygon.bounding_box()?;
        let (min_x, min_y, max_x, max_y) = bounds;
        let width = max_x - min_x;
        let height = max_y - min_y;
        let center = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

        Some(Self {
            polygon,
            spacing,
            rotation: RotationTransform::from_degrees(center.x, center.y, angle_degrees),
            bounds,
            center,
            diagonal: (width * width + height * height).sqrt(),
        })
    }

    /// Rotate a point around the center by the context's angle.
    #[inline]
    pub fn rotate(&self, x: f64, y: f64) -> (f64, f64) {
        self.rotation.apply(x, y)
    }

    /// Check if a point is inside the polygon body (not in holes).
    #[inline]
    pub fn point_inside(&self, x: f64, y: f64) -> bool {
        point_in_body(x, y, self.polygon)
    }

    /// Half-size of a square around `center` that still covers the shape
    /// after any rotation, plus `margin`.
    #[inline]
    pub fn reach(&self, margin: f64) -> f64 {
        self.diagonal / 2.0 + margin
    }
}

/// A 2D rotation transform around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    pub center_x: f64,
    pub center_y: f64,
    pub cos_a: f64,
    pub sin_a: f64,
}

impl RotationTransform {
    /// Create a new rotation transform.
    pub fn new(center_x: f64, center_y: f64, angle_rad: f64) -> Self {
        Self {
            center_x,
            center_y,
            cos_a: angle_rad.cos(),
            sin_a: angle_rad.sin(),
        }
    }

    /// Create from degrees instead of radians.
    pub fn from_degrees(center_x: f64, center_y: f64, angle_degrees: f64) -> Self {
        Self::new(center_x, center_y, angle_degrees * PI / 180.0)
    }

    /// Apply the rotation to a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        (
            self.center_x + dx * self.cos_a - dy * self.sin_a,
            self.center_y + dx * self.sin_a + dy * self.cos_a,
        )
    }

    /// Apply the rotation to a line.
    #[inline]
    pub fn apply_line(&self, line: &Line) -> Line {
        let (x1, y1) = self.apply(line.x1, line.y1);
        let (x2, y2) = self.apply(line.x2, line.y2);
        Line::new(x1, y1, x2, y2)
    }
}

/// Widen `spacing` so that at most `max_steps` steps span `extent`.
///
/// Lattice generators call this before laying out rows or cells, so a tiny
/// spacing on a large shape yields a dense but bounded fill.
pub fn budget_spacing(spacing: f64, extent: f64, max_steps: usize) -> f64 {
    let floor = extent / max_steps as f64;
    if spacing < floor {
        tracing::debug!(spacing, widened = floor, max_steps, "spacing widened to step budget");
        floor
    } else {
        spacing
    }
}

/// Largest distance from `origin` to any outer vertex.
pub fn max_vertex_distance(polygon: &Polygon, origin: Point) -> f64 {
    polygon
        .outer
        .iter()
        .map(|p| p.distance(origin))
        .fold(0.0, f64::max)
}

/// Turn a polyline into segments, keeping those whose midpoint is in the
/// polygon body.
pub fn polyline_inside(points: &[Point], polygon: &Polygon, out: &mut Vec<Line>) {
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.distance_sq(b) < 1e-18 {
            continue;
        }
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        if point_in_body(mid.x, mid.y, polygon) {
            out.push(Line::from_points(a, b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_polygon() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ])
    }

    #[test]
    fn pattern_context_creation() {
        let poly = square_polygon();
        let ctx = PatternContext::new(&poly, 10.0, 45.0).unwrap();

        assert_eq!(ctx.center, Point::new(50.0, 50.0));
        assert!((ctx.diagonal - 141.42).abs() < 0.1);
        assert!(PatternContext::new(&poly, 0.0, 0.0).is_none());
    }

    #[test]
    fn rotation_transform() {
        let rot = RotationTransform::from_degrees(50.0, 50.0, 90.0);

        // Point at (100, 50) should rotate to (50, 100)
        let (x, y) = rot.apply(100.0, 50.0);
        assert!((x - 50.0).abs() < 0.0001);
        assert!((y - 100.0).abs() < 0.0001);
    }

    #[test]
    fn context_point_inside() {
        let poly = square_polygon();
        let ctx = PatternContext::new(&poly, 10.0, 0.0).unwrap();

        assert!(ctx.point_inside(50.0, 50.0));
        assert!(!ctx.point_inside(150.0, 50.0));
    }

    #[test]
    fn spacing_budget() {
        assert_eq!(budget_spacing(2.0, 100.0, 1000), 2.0);
        assert_eq!(budget_spacing(1e-6, 100.0, 1000), 0.1);
    }

    #[test]
    fn farthest_vertex() {
        let d = max_vertex_distance(&square_polygon(), Point::new(0.0, 0.0));
        assert!((d - 100.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn polyline_filter_drops_outside_pieces() {
        let pts = [Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(250.0, 10.0)];
        let mut out = Vec::new();
        polyline_inside(&pts, &square_polygon(), &mut out);
        assert_eq!(out, vec![Line::new(10.0, 10.0, 50.0, 10.0)]);
    }
}
