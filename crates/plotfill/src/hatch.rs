//! Hatch line generation for fill patterns.
//!
//! Generates parallel lines that can be clipped to polygons to create
//! hatching and cross-hatching.
//!
//! Lines are anchored to the global origin rather than to each shape: line
//! `k` sits at perpendicular offset `(k + 0.5) * spacing` from (0, 0). Two
//! neighbouring shapes filled with the same parameters therefore share one
//! continuous set of strokes.

use std::f64::consts::PI;

use crate::clip::clip_lines_to_polygon;
use crate::geometry::{Line, Polygon};
use crate::patterns::util::budget_spacing;

/// Most scanlines one family may lay across a shape.
pub const MAX_HATCH_LINES: usize = 20_000;

/// Generate parallel hatch lines covering a polygon's bounding box.
///
/// ## Rust Lesson #17: f64 Methods
///
/// Rust's f64 has methods for math: `.sin()`, `.cos()`, `.floor()`, etc.
/// There's no `Math.sin()` namespace; it's just `angle.sin()`.
pub fn generate_hatch_lines(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let Some((min_x, min_y, max_x, max_y)) = polygon.bounding_box() else {
        return Vec::new();
    };
    if !(spacing.is_finite() && spacing > 0.0) || !angle_degrees.is_finite() {
        return Vec::new();
    }

    let angle_rad = angle_degrees * PI / 180.0;
    let (dir_x, dir_y) = (angle_rad.cos(), angle_rad.sin());
    let (perp_x, perp_y) = (-dir_y, dir_x);

    // Project the bbox corners onto both axes of the rotated frame
    let corners = [(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)];
    let mut min_o = f64::INFINITY;
    let mut max_o = f64::NEG_INFINITY;
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for (x, y) in corners {
        let o = x * perp_x + y * perp_y;
        let t = x * dir_x + y * dir_y;
        min_o = min_o.min(o);
        max_o = max_o.max(o);
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }

    let spacing = budget_spacing(spacing, max_o - min_o, MAX_HATCH_LINES - 1);

    // Reach past the box so clipping always sees both crossings
    let pad = spacing;
    min_t -= pad;
    max_t += pad;

    let first = (min_o / spacing - 0.5).ceil() as i64;
    let last = (max_o / spacing - 0.5).floor() as i64;
    if last < first {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity((last - first + 1) as usize);
    for k in first..=last {
        let offset = (k as f64 + 0.5) * spacing;
        let base_x = perp_x * offset;
        let base_y = perp_y * offset;

        lines.push(Line::new(
            base_x + dir_x * min_t,
            base_y + dir_y * min_t,
            base_x + dir_x * max_t,
            base_y + dir_y * max_t,
        ));
    }

    lines
}

/// Generate hatch lines and clip them to a polygon.
///
/// This is the main "lines" pattern function.
pub fn generate_lines_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let hatch_lines = generate_hatch_lines(polygon, spacing, angle_degrees);
    clip_lines_to_polygon(&hatch_lines, polygon)
}

/// Generate crosshatch pattern (two sets of perpendicular lines).
pub fn generate_crosshatch_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let mut lines = generate_lines_fill(polygon, spacing, angle_degrees);
    let perpendicular = generate_lines_fill(polygon, spacing, angle_degrees + 90.0);
    lines.extend(perpendicular);
    lines
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn lines_anchor_to_origin() {
        let lines = generate_lines_fill(&square(100.0), 10.0, 0.0);
        assert_eq!(lines.len(), 10);
        for (i, line) in lines.iter().enumerate() {
            let y = 5.0 + 10.0 * i as f64;
            assert!((line.y1 - y).abs() < 1e-9 && (line.y2 - y).abs() < 1e-9);
            assert!(line.x1.abs() < 1e-9, "x1 = {}", line.x1);
            assert!((line.x2 - 100.0).abs() < 1e-9, "x2 = {}", line.x2);
        }
    }

    #[test]
    fn shifted_shape_shares_grid() {
        let shifted = Polygon::new(vec![
            Point::new(3.0, 3.0),
            Point::new(50.0, 3.0),
            Point::new(50.0, 50.0),
            Point::new(3.0, 50.0),
        ]);
        for line in generate_lines_fill(&shifted, 10.0, 0.0) {
            let k = line.y1 / 10.0 - 0.5;
            assert!((k - k.round()).abs() < 1e-9, "line at y={} is off the global grid", line.y1);
        }
    }

    #[test]
    fn crosshatch_has_double_lines() {
        let poly = square(100.0);
        let single = generate_lines_fill(&poly, 10.0, 0.0);
        let cross = generate_crosshatch_fill(&poly, 10.0, 0.0);
        assert_eq!(cross.len(), single.len() * 2);
    }

    #[test]
    fn bad_spacing_yields_nothing() {
        assert!(generate_hatch_lines(&square(10.0), 0.0, 0.0).is_empty());
        assert!(generate_hatch_lines(&square(10.0), f64::NAN, 0.0).is_empty());
        assert!(generate_hatch_lines(&Polygon::default(), 1.0, 0.0).is_empty());
    }

    #[test]
    fn tiny_spacing_is_bounded() {
        let lines = generate_lines_fill(&square(100.0), 1e-6, 0.0);
        assert!(!lines.is_empty());
        assert!(lines.len() <= MAX_HATCH_LINES, "{} lines", lines.len());
    }

    #[test]
    fn rotated_lines_stay_inside() {
        let poly = square(100.0);
        let lines = generate_lines_fill(&poly, 7.0, 33.0);
        assert!(!lines.is_empty());
        for line in &lines {
            let mid = line.midpoint();
            assert!(mid.x > 0.0 && mid.x < 100.0 && mid.y > 0.0 && mid.y < 100.0);
        }
    }
}
