//! Hilbert curve fill pattern - space-filling curve.
//!
//! The curve is laid over a square frame (the shape's bounding square, or
//! the whole scene in single-curve mode) and clipped to the shape, so
//! neighbouring shapes filled from the scene frame line up.

use super::util::RotationTransform;
use crate::clip::{clip_line_to_polygon_with_holes, Rect};
use crate::geometry::{Line, Point, Polygon};

pub const MIN_ORDER: u32 = 2;
pub const MAX_ORDER: u32 = 6;

/// Curve order for a frame of side `size`: cells roughly `spacing` wide.
pub fn hilbert_order(size: f64, spacing: f64) -> u32 {
    if !(size > 0.0 && spacing > 0.0) {
        return MIN_ORDER;
    }
    let order = (size / spacing).log2().round();
    if !order.is_finite() {
        return MIN_ORDER;
    }
    (order.max(0.0) as u32).clamp(MIN_ORDER, MAX_ORDER)
}

/// Map a distance along the curve to grid cell (x, y) for an `n`×`n` grid.
fn d2xy(n: u32, d: u32) -> (u32, u32) {
    let (mut x, mut y) = (0u32, 0u32);
    let mut t = d;
    let mut s = 1u32;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

/// Generate Hilbert curve fill for a polygon.
///
/// `frame` overrides the polygon's own bounds (single-curve mode). The
/// curve is rotated by `angle_degrees` about the frame centre; when rotated
/// the frame grows to its diagonal so the shape stays covered.
pub fn generate_hilbert_fill(
    polygon: &Polygon,
    spacing: f64,
    angle_degrees: f64,
    frame: Option<Rect>,
) -> Vec<Line> {
    if !polygon.is_valid() || !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let Some(frame) = frame.or_else(|| polygon.bounding_box().map(Rect::from_bounds)) else {
        return Vec::new();
    };

    let centre = frame.center();
    let rotated = angle_degrees.rem_euclid(90.0) != 0.0;
    let side = if rotated {
        frame.width().hypot(frame.height())
    } else {
        frame.width().max(frame.height())
    };
    if !(side > 0.0) {
        return Vec::new();
    }

    let order = hilbert_order(side, spacing);
    let n = 1u32 << order;
    let cell = side / n as f64;
    let origin = Point::new(centre.x - side / 2.0, centre.y - side / 2.0);
    let rotation = RotationTransform::from_degrees(centre.x, centre.y, angle_degrees);

    let points: Vec<Point> = (0..n * n)
        .map(|d| {
            let (gx, gy) = d2xy(n, d);
            let (x, y) = rotation.apply(
                origin.x + (gx as f64 + 0.5) * cell,
                origin.y + (gy as f64 + 0.5) * cell,
            );
            Point::new(x, y)
        })
        .collect();

    points
        .windows(2)
        .flat_map(|pair| clip_line_to_polygon_with_holes(Line::from_points(pair[0], pair[1]), polygon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ])
    }

    #[test]
    fn order_is_clamped() {
        assert_eq!(hilbert_order(100.0, 10.0), 3);
        assert_eq!(hilbert_order(100.0, 50.0), MIN_ORDER);
        assert_eq!(hilbert_order(10_000.0, 1.0), MAX_ORDER);
    }

    #[test]
    fn curve_visits_every_cell_with_unit_steps() {
        let n = 8;
        let cells: Vec<(u32, u32)> = (0..n * n).map(|d| d2xy(n, d)).collect();
        let mut seen = std::collections::HashSet::new();
        for c in &cells {
            assert!(seen.insert(*c));
        }
        for pair in cells.windows(2) {
            let dx = pair[0].0.abs_diff(pair[1].0);
            let dy = pair[0].1.abs_diff(pair[1].1);
            assert_eq!(dx + dy, 1);
        }
    }

    #[test]
    fn axis_aligned_curve_is_fully_inside() {
        // Order 3 on a 100 square: 64 cells, 63 segments, none clipped
        let lines = generate_hilbert_fill(&square(), 10.0, 0.0, None);
        assert_eq!(lines.len(), 63);
        for line in &lines {
            assert!((line.length() - 12.5).abs() < 1e-9);
        }
    }

    #[test]
    fn scene_frame_changes_layout() {
        let own = generate_hilbert_fill(&square(), 10.0, 0.0, None);
        let scene = generate_hilbert_fill(&square(), 10.0, 0.0, Some(Rect::new(-50.0, -50.0, 150.0, 150.0)));
        assert!(!scene.is_empty());
        assert_ne!(own, scene);
    }
}
