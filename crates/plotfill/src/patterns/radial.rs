//! Radial fill pattern - lines radiating from center.

use std::f64::consts::PI;

use super::util::{max_vertex_distance, PatternContext};
use crate::clip::clip_line_to_polygon_with_holes;
use crate::geometry::{Line, Polygon};

/// Generate radial fill for a polygon - lines radiating from center.
///
/// `spacing` is read as the angular step in degrees between rays (never
/// below one degree). Rays start at the bounding-box centre, are offset by
/// `angle_degrees`, and are clipped to the polygon with holes, so a concave
/// shape can cut one ray into several pieces.
pub fn generate_radial_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let Some(ctx) = PatternContext::new(polygon, spacing, angle_degrees) else {
        return Vec::new();
    };

    let step_degrees = spacing.max(1.0);
    let num_rays = ((360.0 / step_degrees).floor() as usize).max(1);
    let length = max_vertex_distance(polygon, ctx.center) + 1.0;
    let start = angle_degrees * PI / 180.0;
    let step = step_degrees * PI / 180.0;

    let mut lines = Vec::new();
    for i in 0..num_rays {
        let ray_angle = start + i as f64 * step;
        let ray = Line::new(
            ctx.center.x,
            ctx.center.y,
            ctx.center.x + length * ray_angle.cos(),
            ctx.center.y + length * ray_angle.sin(),
        );
        lines.extend(clip_line_to_polygon_with_holes(ray, polygon));
    }

    lines
}
