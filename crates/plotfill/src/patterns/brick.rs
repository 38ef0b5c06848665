//! Brick fill pattern - running bond brickwork.
//!
//! Courses are `spacing` apart, bricks are 2.5 times as long as they are
//! tall, and every other course is shifted by half a brick.

use super::util::{budget_spacing, PatternContext};
use crate::clip::clip_line_to_polygon_with_holes;
use crate::geometry::{Line, Polygon};

/// Brick length as a multiple of the course height.
pub const BRICK_RATIO: f64 = 2.5;

/// Most courses laid across the shape's diagonal.
const MAX_COURSES: usize = 1000;

/// Generate brick pattern fill for a polygon.
///
/// Creates horizontal "mortar" lines with vertical joints offset per row,
/// rotated about the shape centre by `angle_degrees`.
pub fn generate_brick_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let Some(ctx) = PatternContext::new(polygon, spacing, angle_degrees) else {
        return Vec::new();
    };

    let brick_height = budget_spacing(spacing, ctx.diagonal, MAX_COURSES);
    let brick_width = brick_height * BRICK_RATIO;
    let reach = ctx.reach(brick_width);
    let (cx, cy) = (ctx.center.x, ctx.center.y);

    let rows = (reach / brick_height).ceil() as i64;
    let cols = (reach / brick_width).ceil() as i64 + 1;

    let mut lines = Vec::new();
    let mut push_clipped = |x1: f64, y1: f64, x2: f64, y2: f64| {
        let (ax, ay) = ctx.rotate(x1, y1);
        let (bx, by) = ctx.rotate(x2, y2);
        lines.extend(clip_line_to_polygon_with_holes(Line::new(ax, ay, bx, by), polygon));
    };

    for row in -rows..=rows {
        let y = cy + row as f64 * brick_height;

        // Horizontal mortar line for this row
        push_clipped(cx - reach, y, cx + reach, y);

        // Vertical joints up to the next course
        let row_offset = if row.rem_euclid(2) == 1 { brick_width / 2.0 } else { 0.0 };
        for col in -cols..=cols {
            let x = cx + col as f64 * brick_width + row_offset;
            push_clipped(x, y, x, y + brick_height);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ])
    }

    #[test]
    fn brick_has_both_orientations() {
        let lines = generate_brick_fill(&square(), 7.0, 0.0);
        let horizontal = lines.iter().filter(|l| (l.y2 - l.y1).abs() < 1e-9).count();
        let vertical = lines.iter().filter(|l| (l.x2 - l.x1).abs() < 1e-9).count();
        assert!(horizontal > 5 && vertical > 20);
        assert_eq!(horizontal + vertical, lines.len());
    }

    #[test]
    fn tiny_spacing_is_bounded() {
        let lines = generate_brick_fill(&square(), 1e-6, 0.0);
        assert!(!lines.is_empty());
        assert!(lines.len() < 500_000, "{} lines", lines.len());
    }

    #[test]
    fn joints_alternate_between_rows() {
        let lines = generate_brick_fill(&square(), 7.0, 0.0);
        let joints_at = |y: f64| -> Vec<f64> {
            let mut xs: Vec<f64> = lines
                .iter()
                .filter(|l| (l.x2 - l.x1).abs() < 1e-9 && (l.y1.min(l.y2) - y).abs() < 1e-9)
                .map(|l| l.x1)
                .collect();
            xs.sort_by(f64::total_cmp);
            xs
        };
        let even = joints_at(50.0);
        let odd = joints_at(57.0);
        assert!(!even.is_empty() && !odd.is_empty());
        assert!((odd[0] - even[0]).abs() % 17.5 > 1.0);
    }
}
