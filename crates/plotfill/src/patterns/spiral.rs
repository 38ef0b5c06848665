//! Spiral fill pattern - Archimedean spiral.

use std::f64::consts::PI;

use super::util::max_vertex_distance;
use crate::clip::point_in_body;
use crate::geometry::{Line, Point, Polygon};

/// Hard cap on spiral steps for pathological spacing / size ratios.
const MAX_STEPS: usize = 2_000_000;

/// Generate Archimedean spiral fill for a polygon.
///
/// r = a * theta with `a = spacing / 2π`, so neighbouring arms are
/// `spacing` apart. The spiral starts at `centre` (the polygon's area
/// centroid when `None`) and runs out to the farthest vertex times
/// `over_diameter`. Chords are about `spacing / 4` long.
pub fn generate_spiral_fill(
    polygon: &Polygon,
    spacing: f64,
    angle_degrees: f64,
    centre: Option<Point>,
    over_diameter: f64,
) -> Vec<Line> {
    if !polygon.is_valid() || !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let Some(centre) = centre.or_else(|| polygon.centroid()) else {
        return Vec::new();
    };

    let reach = max_vertex_distance(polygon, centre) * over_diameter.max(0.0);
    if !reach.is_finite() || reach <= 0.0 {
        return Vec::new();
    }

    let a = spacing / (2.0 * PI);
    let start_angle = angle_degrees * PI / 180.0;
    let chord = spacing / 4.0;

    let mut lines = Vec::new();
    let mut theta: f64 = 0.0;
    let mut prev = centre;
    let mut prev_inside = point_in_body(prev.x, prev.y, polygon);

    for _ in 0..MAX_STEPS {
        let r = a * theta;
        if r > reach {
            break;
        }

        // Arc length per radian is below r + a; cap the turn near the centre
        theta += (chord / (r + a)).min(0.5);

        let r = a * theta;
        let p = Point::new(
            centre.x + r * (theta + start_angle).cos(),
            centre.y + r * (theta + start_angle).sin(),
        );
        let inside = point_in_body(p.x, p.y, polygon);

        if prev_inside && inside {
            let mid_x = (prev.x + p.x) / 2.0;
            let mid_y = (prev.y + p.y) / 2.0;
            if point_in_body(mid_x, mid_y, polygon) {
                lines.push(Line::from_points(prev, p));
            }
        }

        prev = p;
        prev_inside = inside;
    }

    lines
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
    fn starts_at_centroid() {
        let lines = generate_spiral_fill(&square(), 5.0, 0.0, None, 1.5);
        assert!(!lines.is_empty());
        assert_eq!(lines[0].start(), Point::new(50.0, 50.0));
    }

    #[test]
    fn chords_are_short() {
        let lines = generate_spiral_fill(&square(), 8.0, 0.0, None, 1.5);
        for line in &lines {
            assert!(line.length() <= 8.0 / 4.0 + 1e-9, "chord {}", line.length());
        }
    }

    #[test]
    fn reaches_the_corners() {
        let lines = generate_spiral_fill(&square(), 5.0, 0.0, None, 1.5);
        let far = lines
            .iter()
            .map(|l| l.end().distance(Point::new(50.0, 50.0)))
            .fold(0.0, f64::max);
        assert!(far > 65.0, "spiral stops at radius {}", far);
    }

    #[test]
    fn external_centre_is_used() {
        let lines = generate_spiral_fill(&square(), 5.0, 0.0, Some(Point::new(0.0, 0.0)), 1.0);
        assert!(!lines.is_empty());
        for line in &lines {
            let mid = line.midpoint();
            assert!(point_in_body(mid.x, mid.y, &square()));
        }
    }

    #[test]
    fn hole_is_avoided() {
        let poly = Polygon::with_holes(
            square().outer,
            vec![vec![
                Point::new(40.0, 40.0),
                Point::new(60.0, 40.0),
                Point::new(60.0, 60.0),
                Point::new(40.0, 60.0),
            ]],
        );
        let lines = generate_spiral_fill(&poly, 4.0, 0.0, None, 1.5);
        assert!(!lines.is_empty());
        for line in &lines {
            let mid = line.midpoint();
            assert!(!(mid.x > 40.0 && mid.x < 60.0 && mid.y > 40.0 && mid.y < 60.0));
        }
    }
}
