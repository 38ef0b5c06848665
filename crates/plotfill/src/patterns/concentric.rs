//! Concentric fill pattern - polygon offset rings.

use crate::clip::cut_holes;
use crate::geometry::{signed_area_of_points, Line, Point, Polygon};
use crate::offset::inset_ring;

/// Upper bound on rings regardless of shape size.
const MAX_RINGS: usize = 100;

/// Generate concentric fill lines (rings from outside in).
///
/// The first ring is the outer boundary itself; every further ring is the
/// previous one offset inward by `spacing`. Rings stop when the offset
/// collapses or the area drops below `spacing²`. Each ring is rotated to
/// start at the vertex nearest the previous ring's start, and a connector
/// joins the two, so a plotter can draw the whole fill as one stroke.
/// Ring edges and connectors are cut at hole boundaries and the pieces
/// inside a hole dropped. The outer ring is never clipped against, since
/// the first ring runs along it.
pub fn generate_concentric_fill(polygon: &Polygon, spacing: f64) -> Vec<Line> {
    let outer = &polygon.outer;
    if !polygon.is_valid() || !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }

    let Some((min_x, min_y, max_x, max_y)) = polygon.bounding_box() else {
        return Vec::new();
    };

    let max_dimension = (max_x - min_x).max(max_y - min_y);
    let max_loops = ((max_dimension / spacing).ceil() as usize + 2).min(MAX_RINGS);
    let min_area = spacing * spacing;

    let mut loops: Vec<Vec<Point>> = vec![outer.clone()];

    while loops.len() < max_loops {
        let Some(current) = loops.last() else { break };
        let Some(next) = inset_ring(current, spacing) else {
            break;
        };
        if signed_area_of_points(&next).abs() < min_area {
            break;
        }
        let anchor = current[0];
        loops.push(start_nearest(next, anchor));
    }

    let mut lines = Vec::new();
    let mut ring = Vec::new();

    for (loop_idx, loop_points) in loops.iter().enumerate() {
        ring.clear();
        ring.extend_from_slice(loop_points);
        ring.push(loop_points[0]);
        push_outside_holes(&ring, polygon, &mut lines);

        // Connect to next loop
        if let Some(next_loop) = loops.get(loop_idx + 1) {
            push_outside_holes(&[loop_points[0], next_loop[0]], polygon, &mut lines);
        }
    }

    lines
}

fn push_outside_holes(points: &[Point], polygon: &Polygon, out: &mut Vec<Line>) {
    for pair in points.windows(2) {
        out.extend(cut_holes(Line::from_points(pair[0], pair[1]), polygon));
    }
}

/// Rotate a ring so it starts at the vertex closest to `anchor`.
fn start_nearest(mut ring: Vec<Point>, anchor: Point) -> Vec<Point> {
    let closest = ring
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.distance_sq(anchor).total_cmp(&b.distance_sq(anchor)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotate_left(closest);
    ring
}
