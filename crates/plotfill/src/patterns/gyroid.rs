//! Gyroid fill pattern - 3D minimal surface projection.
//!
//! The gyroid is a triply periodic minimal surface. Its implicit equation is:
//!   sin(x)cos(y) + sin(y)cos(z) + sin(z)cos(x) = 0
//!
//! We take two horizontal slices a quarter period apart and contour the
//! resulting 2D fields with marching squares.

use std::f64::consts::PI;

use crate::clip::clip_lines_to_polygon;
use crate::geometry::{Line, Polygon};

/// Grid cells per axis are capped so huge shapes stay tractable.
const MAX_CELLS: usize = 1500;

/// Evaluate the gyroid function at a point.
/// Returns a scalar field value - the zero-contour is the gyroid surface.
#[inline]
fn gyroid_field(x: f64, y: f64, z: f64) -> f64 {
    x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
}

/// Generate gyroid fill for a polygon.
///
/// Parameters:
/// - `spacing`: the field period is `4 * spacing`; grid cells are `spacing / 6`
/// - `angle_degrees`: z-offset of both slices (different angles = different patterns)
pub fn generate_gyroid_fill(polygon: &Polygon, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    if !polygon.is_valid() || !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let Some(bounds) = polygon.bounding_box() else {
        return Vec::new();
    };

    // Scale factor to map polygon space to gyroid space
    let scale = (2.0 * PI) / (spacing * 4.0);
    let z_base = angle_degrees * PI / 180.0;

    let mut lines = Vec::new();
    for z in [z_base, z_base + PI / 2.0] {
        lines.extend(contour_gyroid_slice(bounds, scale, z, spacing / 6.0));
    }

    clip_lines_to_polygon(&lines, polygon)
}

/// Generate contour lines for a single z-slice of the gyroid.
///
/// Corner bits: 1 = bottom-left, 2 = bottom-right, 4 = top-right,
/// 8 = top-left. Saddles (cases 5 and 10) are resolved by the field value
/// at the cell centre.
fn contour_gyroid_slice(
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
    scale: f64,
    z: f64,
    resolution: f64,
) -> Vec<Line> {
    let width = max_x - min_x;
    let height = max_y - min_y;
    if !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }

    let nx = ((width / resolution).ceil() as usize).clamp(1, MAX_CELLS);
    let ny = ((height / resolution).ceil() as usize).clamp(1, MAX_CELLS);
    let dx = width / nx as f64;
    let dy = height / ny as f64;

    let field = |x: f64, y: f64| gyroid_field(x * scale, y * scale, z);

    // Row-major samples, (nx + 1) per row
    let stride = nx + 1;
    let mut grid = Vec::with_capacity(stride * (ny + 1));
    for j in 0..=ny {
        let y = min_y + j as f64 * dy;
        for i in 0..=nx {
            grid.push(field(min_x + i as f64 * dx, y));
        }
    }

    // Linear interpolation to find the zero crossing between two samples
    let interp = |v1: f64, v2: f64, p1: f64, p2: f64| -> f64 {
        if (v2 - v1).abs() < 1e-12 {
            (p1 + p2) / 2.0
        } else {
            p1 + (p2 - p1) * (-v1) / (v2 - v1)
        }
    };

    let mut lines = Vec::new();

    for j in 0..ny {
        for i in 0..nx {
            let x0 = min_x + i as f64 * dx;
            let y0 = min_y + j as f64 * dy;
            let x1 = x0 + dx;
            let y1 = y0 + dy;

            let bl = grid[j * stride + i];
            let br = grid[j * stride + i + 1];
            let tr = grid[(j + 1) * stride + i + 1];
            let tl = grid[(j + 1) * stride + i];

            let case = (bl > 0.0) as u8
                | ((br > 0.0) as u8) << 1
                | ((tr > 0.0) as u8) << 2
                | ((tl > 0.0) as u8) << 3;

            if case == 0 || case == 15 {
                continue;
            }

            let bottom = (interp(bl, br, x0, x1), y0);
            let right = (x1, interp(br, tr, y0, y1));
            let top = (interp(tl, tr, x0, x1), y1);
            let left = (x0, interp(bl, tl, y0, y1));

            let mut push = |a: (f64, f64), b: (f64, f64)| {
                lines.push(Line::new(a.0, a.1, b.0, b.1));
            };

            match case {
                1 | 14 => push(left, bottom),
                2 | 13 => push(bottom, right),
                3 | 12 => push(left, right),
                4 | 11 => push(right, top),
                6 | 9 => push(bottom, top),
                7 | 8 => push(left, top),
                5 | 10 => {
                    let centre_positive = field((x0 + x1) / 2.0, (y0 + y1) / 2.0) > 0.0;
                    // Cut off the corners the centre does not connect to
                    if (case == 5) == centre_positive {
                        push(bottom, right);
                        push(left, top);
                    } else {
                        push(left, bottom);
                        push(right, top);
                    }
                }
                _ => {}
            }
        }
    }

    lines
}
