//! Honeycomb fill pattern - hexagonal grid.

use std::collections::HashSet;

use super::util::{budget_spacing, PatternContext};
use crate::clip::clip_line_to_polygon_with_holes;
use crate::geometry::{Line, Polygon};

/// Quantization applied to lattice coordinates (in hex radii) for edge keys.
const KEY_SCALE: f64 = 1e4;

/// Canonical key of an edge: both endpoints rounded, smaller first.
type EdgeKey = ((i64, i64), (i64, i64));

/// Most hexagon radii laid across the shape's diagonal.
const MAX_CELLS_ACROSS: usize = 600;

/// Generate honeycomb (hexagonal grid) fill for a polygon.
///
/// Flat-top hexagons with circumradius `spacing` tile a square around the
/// shape centre, the lattice is rotated by `angle_degrees`, and every edge
/// is clipped to the polygon. Edges shared by two cells are emitted once.
pub fn generate_honeycomb_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let Some(ctx) = PatternContext::new(polygon, spacing, angle_degrees) else {
        return Vec::new();
    };

    let radius = budget_spacing(spacing, ctx.diagonal, MAX_CELLS_ACROSS);
    let col_step = radius * 1.5;
    let row_step = radius * 3f64.sqrt();
    let reach = ctx.reach(radius * 2.0);

    // Vertex offsets of a flat-top hexagon, in units of the radius
    let offsets: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let a = std::f64::consts::PI / 3.0 * i as f64;
            (a.cos(), a.sin())
        })
        .collect();

    let cols = (reach / col_step).ceil() as i64;
    let rows = (reach / row_step).ceil() as i64 + 1;

    let mut seen: HashSet<EdgeKey> = HashSet::new();
    let mut lines = Vec::new();

    for col in -cols..=cols {
        // Lattice coordinates in radii, relative to the shape centre
        let lx = col as f64 * 1.5;
        let shift = if col.rem_euclid(2) == 1 { 0.5 } else { 0.0 };

        for row in -rows..=rows {
            let ly = (row as f64 + shift) * 3f64.sqrt();

            for i in 0..6 {
                let (ax, ay) = (lx + offsets[i].0, ly + offsets[i].1);
                let (bx, by) = (lx + offsets[(i + 1) % 6].0, ly + offsets[(i + 1) % 6].1);

                if !seen.insert(edge_key(ax, ay, bx, by)) {
                    continue;
                }

                let (x1, y1) = ctx.rotate(ctx.center.x + ax * radius, ctx.center.y + ay * radius);
                let (x2, y2) = ctx.rotate(ctx.center.x + bx * radius, ctx.center.y + by * radius);
                lines.extend(clip_line_to_polygon_with_holes(Line::new(x1, y1, x2, y2), polygon));
            }
        }
    }

    tracing::trace!(edges = seen.len(), kept = lines.len(), "honeycomb lattice");
    lines
}

fn edge_key(ax: f64, ay: f64, bx: f64, by: f64) -> EdgeKey {
    let q = |v: f64| (v * KEY_SCALE).round() as i64;
    let a = (q(ax), q(ay));
    let b = (q(bx), q(by));
    if a <= b { (a, b) } else { (b, a) }
}
