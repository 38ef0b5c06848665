//! Approximate polygon offsetting.
//!
//! Each vertex moves along the bisector of its two edge normals, scaled so
//! the edges themselves end up `distance` away (the miter), with the miter
//! scale clamped so sharp corners don't throw out spikes.
//!
//! This is NOT a robust offset: there is no straight skeleton and no repair
//! of self-intersections. When an inward offset stops shrinking the ring we
//! treat that as "the ring has collapsed" and stop, which is all the
//! concentric and inset users need.

use crate::geometry::{signed_area_of_points, Point, Polygon};

/// Largest miter scale applied at a vertex.
pub const MITER_LIMIT: f64 = 2.5;

/// Offset a closed ring by `distance`.
///
/// Positive distances move inward, negative outward. The inward side is
/// detected from the ring's winding, so callers don't have to normalize
/// orientation first.
pub fn offset_ring(points: &[Point], distance: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // For a counter-clockwise ring (positive area) the interior is on the
    // left of each edge; for clockwise, on the right.
    let side = if signed_area_of_points(points) >= 0.0 { 1.0 } else { -1.0 };

    let edge_normal = |a: Point, b: Point| -> Option<(f64, f64)> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-12 {
            return None;
        }
        Some((-dy / len * side, dx / len * side))
    };

    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];

        let (n1, n2) = match (edge_normal(prev, curr), edge_normal(curr, next)) {
            (Some(a), Some(b)) => (a, b),
            (Some(a), None) | (None, Some(a)) => (a, a),
            (None, None) => {
                result.push(curr);
                continue;
            }
        };

        let (sum_x, sum_y) = (n1.0 + n2.0, n1.1 + n2.1);
        let sum_len = (sum_x * sum_x + sum_y * sum_y).sqrt();

        // A 180° turn has no bisector; fall back to the incoming normal
        let (bx, by) = if sum_len < 1e-9 {
            n1
        } else {
            (sum_x / sum_len, sum_y / sum_len)
        };

        let cos_half = bx * n1.0 + by * n1.1;
        let miter = if cos_half > 1e-9 {
            (1.0 / cos_half).min(MITER_LIMIT)
        } else {
            MITER_LIMIT
        };

        result.push(Point::new(
            curr.x + bx * distance * miter,
            curr.y + by * distance * miter,
        ));
    }

    dedup_ring(result)
}

/// Inward offset that reports collapse.
///
/// Returns `None` when the ring degenerates, flips orientation, or fails to
/// get smaller - the heuristic signal that offsetting went past the middle.
pub fn inset_ring(points: &[Point], distance: f64) -> Option<Vec<Point>> {
    let old_area = signed_area_of_points(points);
    let ring = offset_ring(points, distance);
    if ring.len() < 3 {
        return None;
    }

    let new_area = signed_area_of_points(&ring);
    if new_area.abs() < 1e-9 || new_area.signum() != old_area.signum() {
        return None;
    }
    if distance > 0.0 && new_area.abs() >= old_area.abs() {
        return None;
    }
    // Offsetting past the middle turns the ring inside out: same winding,
    // smaller area, but the edges point backwards.
    if ring.len() == points.len() && reversed_edges(points, &ring) * 2 > points.len() {
        return None;
    }

    Some(ring)
}

/// Count edges whose direction flipped between `before` and `after`.
fn reversed_edges(before: &[Point], after: &[Point]) -> usize {
    let n = before.len();
    (0..n)
        .filter(|&i| {
            let j = (i + 1) % n;
            let (ox, oy) = (before[j].x - before[i].x, before[j].y - before[i].y);
            let (nx, ny) = (after[j].x - after[i].x, after[j].y - after[i].y);
            ox * nx + oy * ny < 0.0
        })
        .count()
}

/// Shrink the fillable region of a polygon by `inset`.
///
/// The outer ring moves inward and every hole grows outward by the same
/// amount. `None` when the outer collapses; holes that degenerate are
/// dropped.
pub fn inset_polygon(polygon: &Polygon, inset: f64) -> Option<Polygon> {
    if !polygon.is_valid() {
        return None;
    }
    if inset <= 0.0 {
        return Some(polygon.clone());
    }

    let outer = inset_ring(&polygon.outer, inset)?;
    let holes = polygon
        .holes
        .iter()
        .map(|hole| offset_ring(hole, -inset))
        .filter(|hole| hole.len() >= 3)
        .collect();

    Some(Polygon::with_holes(outer, holes))
}

/// Remove consecutive near-duplicate points, including the wrap-around pair.
fn dedup_ring(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.x - last.x).abs() < 1e-6 && (first.y - last.y).abs() < 1e-6 {
            points.pop();
        } else {
            break;
        }
    }
    points
}
