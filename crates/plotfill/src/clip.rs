//! Line and polygon clipping.
//!
//! This is the HOT PATH - every generator funnels its raw strokes through
//! here, often hundreds of thousands of times per document.
//!
//! Two families live in this module:
//! - clipping against an arbitrary simple polygon with holes (ray casting +
//!   parametric intersection pairing), used by the pattern generators;
//! - clipping against an axis-aligned rectangle (Cohen–Sutherland for
//!   segments, Sutherland–Hodgman for polygons), used for crop.

use serde::{Deserialize, Serialize};

use crate::geometry::{Line, Point, Polygon};

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a polygon using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside.
#[inline]
pub fn point_in_polygon(px: f64, py: f64, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

/// Inside the outer ring and outside every hole.
#[inline]
pub fn point_in_body(px: f64, py: f64, polygon: &Polygon) -> bool {
    polygon.point_in_body(px, py, point_in_polygon)
}

// ============================================================================
// LINE-LINE INTERSECTION
// ============================================================================

/// Result of a line-line intersection test.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// Rust enums can carry data, so "no hit" and "hit at (x, y)" are one type
/// and the compiler makes every caller handle both.
#[derive(Debug, Clone, Copy)]
pub enum Intersection {
    None,
    Point { x: f64, y: f64, t: f64 },
}

/// Find intersection point between two line segments.
///
/// Returns the intersection point and `t` parameter (0..1 means on first segment).
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn line_segment_intersection(
    x1: f64, y1: f64, x2: f64, y2: f64,
    x3: f64, y3: f64, x4: f64, y4: f64,
) -> Intersection {
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);

    // Parallel or coincident lines
    if denom.abs() < 1e-10 {
        return Intersection::None;
    }

    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        let ix = x1 + ua * (x2 - x1);
        let iy = y1 + ua * (y2 - y1);
        Intersection::Point { x: ix, y: iy, t: ua }
    } else {
        Intersection::None
    }
}

// ============================================================================
// LINE-POLYGON CLIPPING
// ============================================================================

/// Find all intersections between a line and a polygon boundary.
///
/// Returns `(x, y, t)` tuples sorted by parameter `t` along the line.
pub fn line_polygon_intersections(
    lx1: f64, ly1: f64, lx2: f64, ly2: f64,
    polygon: &[Point],
) -> Vec<(f64, f64, f64)> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let mut intersections = Vec::with_capacity(n / 2);

    for i in 0..n {
        let j = (i + 1) % n;
        let (x3, y3) = (polygon[i].x, polygon[i].y);
        let (x4, y4) = (polygon[j].x, polygon[j].y);

        if let Intersection::Point { x, y, t } = line_segment_intersection(
            lx1, ly1, lx2, ly2,
            x3, y3, x4, y4,
        ) {
            intersections.push((x, y, t));
        }
    }

    intersections.sort_by(|a, b| a.2.total_cmp(&b.2));

    intersections
}

/// Split a line at every crossing of `ring` and keep the pieces whose
/// midpoint satisfies `keep`.
///
/// The pieces are built from the sorted crossing parameters, so a line
/// entering and leaving a concave ring several times yields one piece per
/// inside run.
fn split_at_ring<F>(line: Line, ring: &[Point], keep: F) -> Vec<Line>
where
    F: Fn(f64, f64) -> bool,
{
    let crossings = line_polygon_intersections(line.x1, line.y1, line.x2, line.y2, ring);

    let mut stops: Vec<(f64, f64)> = Vec::with_capacity(crossings.len() + 2);
    stops.push((line.x1, line.y1));
    stops.extend(crossings.iter().map(|&(x, y, _)| (x, y)));
    stops.push((line.x2, line.y2));

    stops
        .windows(2)
        .filter_map(|pair| {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];

            // Crossings at a shared vertex come back twice - skip the empty piece
            if (x2 - x1).abs() < 1e-9 && (y2 - y1).abs() < 1e-9 {
                return None;
            }

            if keep((x1 + x2) / 2.0, (y1 + y2) / 2.0) {
                Some(Line::new(x1, y1, x2, y2))
            } else {
                None
            }
        })
        .collect()
}

/// Merge pieces that were split at a point but are collinear neighbours
/// again (a crossing exactly at a vertex splits an otherwise whole run).
fn merge_touching(pieces: Vec<Line>) -> Vec<Line> {
    let mut merged: Vec<Line> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Some(last) = merged.last_mut() {
            if (last.x2 - piece.x1).abs() < 1e-9 && (last.y2 - piece.y1).abs() < 1e-9 {
                last.x2 = piece.x2;
                last.y2 = piece.y2;
                continue;
            }
        }
        merged.push(piece);
    }
    merged
}

/// Clip a line segment to a polygon (outer boundary only).
///
/// Returns a list of line segments that lie inside the polygon.
pub fn clip_line_to_polygon(line: Line, polygon: &Polygon) -> Vec<Line> {
    // Fast bounding box rejection
    if let Some((min_x, min_y, max_x, max_y)) = polygon.bounding_box() {
        let line_min_x = line.x1.min(line.x2);
        let line_max_x = line.x1.max(line.x2);
        let line_min_y = line.y1.min(line.y2);
        let line_max_y = line.y1.max(line.y2);

        if line_max_x < min_x || line_min_x > max_x ||
           line_max_y < min_y || line_min_y > max_y {
            return Vec::new();
        }
    } else {
        return Vec::new();
    }

    let outer = &polygon.outer;
    merge_touching(split_at_ring(line, outer, |x, y| point_in_polygon(x, y, outer)))
}

/// Clip a line to a polygon with holes.
///
/// First pair the outer crossings into inside runs, then cut every run at
/// each hole's crossings and drop the pieces that fall inside the hole.
pub fn clip_line_to_polygon_with_holes(line: Line, polygon: &Polygon) -> Vec<Line> {
    if !polygon.is_valid() {
        return Vec::new();
    }

    clip_line_to_polygon(line, polygon)
        .into_iter()
        .flat_map(|seg| cut_holes(seg, polygon))
        .collect()
}

/// Cut a line at every hole boundary and drop the pieces inside a hole.
///
/// The outer ring is not consulted, so a line lying on the outline itself
/// survives whole unless a hole interrupts it.
pub fn cut_holes(line: Line, polygon: &Polygon) -> Vec<Line> {
    let mut segments = vec![line];

    for hole in &polygon.holes {
        if hole.len() < 3 || segments.is_empty() {
            continue;
        }

        segments = segments
            .into_iter()
            .flat_map(|seg| split_at_ring(seg, hole, |x, y| !point_in_polygon(x, y, hole)))
            .collect();
    }

    segments
}

/// Clip multiple lines to a polygon.
///
/// This is the main entry point for hatch line clipping.
pub fn clip_lines_to_polygon(lines: &[Line], polygon: &Polygon) -> Vec<Line> {
    if !polygon.is_valid() {
        return Vec::new();
    }

    lines
        .iter()
        .flat_map(|line| clip_line_to_polygon_with_holes(*line, polygon))
        .collect()
}

/// Keep only whole segments whose midpoint lies in the polygon body.
///
/// For generators that emit many short pieces (curves sampled finely), a
/// midpoint test is as good as a full clip and far cheaper.
pub fn retain_inside(lines: Vec<Line>, polygon: &Polygon) -> Vec<Line> {
    lines
        .into_iter()
        .filter(|line| {
            let mid = line.midpoint();
            point_in_body(mid.x, mid.y, polygon)
        })
        .collect()
}

// ============================================================================
// RECTANGLE CLIPPING
// ============================================================================

/// An axis-aligned rectangle, used for crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

// Cohen–Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Build from a `(min_x, min_y, max_x, max_y)` bounding box tuple.
    pub fn from_bounds(bounds: (f64, f64, f64, f64)) -> Self {
        Self::new(bounds.0, bounds.1, bounds.2, bounds.3)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Shrink every side by `amount`. `None` when nothing is left.
    pub fn inset(&self, amount: f64) -> Option<Rect> {
        let r = Rect {
            min_x: self.min_x + amount,
            min_y: self.min_y + amount,
            max_x: self.max_x - amount,
            max_y: self.max_y - amount,
        };
        (r.min_x < r.max_x && r.min_y < r.max_y).then_some(r)
    }

    /// Grow to cover another rectangle.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    fn outcode(&self, x: f64, y: f64) -> u8 {
        let mut code = INSIDE;
        if x < self.min_x {
            code |= LEFT;
        } else if x > self.max_x {
            code |= RIGHT;
        }
        if y < self.min_y {
            code |= BOTTOM;
        } else if y > self.max_y {
            code |= TOP;
        }
        code
    }

    /// Cohen–Sutherland segment clip.
    ///
    /// Direction is preserved. Coordinates computed on an edge are clamped
    /// onto the rectangle so clipping the result again changes nothing.
    pub fn clip_segment(&self, line: &Line) -> Option<Line> {
        let (mut x1, mut y1, mut x2, mut y2) = (line.x1, line.y1, line.x2, line.y2);
        let mut code1 = self.outcode(x1, y1);
        let mut code2 = self.outcode(x2, y2);

        loop {
            if code1 | code2 == INSIDE {
                return Some(Line::new(x1, y1, x2, y2));
            }
            if code1 & code2 != INSIDE {
                return None;
            }

            let out = if code1 != INSIDE { code1 } else { code2 };
            let (x, y);
            if out & TOP != 0 {
                x = (x1 + (x2 - x1) * (self.max_y - y1) / (y2 - y1)).clamp(self.min_x, self.max_x);
                y = self.max_y;
            } else if out & BOTTOM != 0 {
                x = (x1 + (x2 - x1) * (self.min_y - y1) / (y2 - y1)).clamp(self.min_x, self.max_x);
                y = self.min_y;
            } else if out & RIGHT != 0 {
                y = (y1 + (y2 - y1) * (self.max_x - x1) / (x2 - x1)).clamp(self.min_y, self.max_y);
                x = self.max_x;
            } else {
                y = (y1 + (y2 - y1) * (self.min_x - x1) / (x2 - x1)).clamp(self.min_y, self.max_y);
                x = self.min_x;
            }

            if out == code1 {
                x1 = x;
                y1 = y;
                code1 = self.outcode(x1, y1);
            } else {
                x2 = x;
                y2 = y;
                code2 = self.outcode(x2, y2);
            }
        }
    }

    /// Clip many segments, dropping those fully outside.
    pub fn clip_segments(&self, lines: &[Line]) -> Vec<Line> {
        lines.iter().filter_map(|l| self.clip_segment(l)).collect()
    }

    fn edge_inside(&self, edge: Edge, p: Point) -> bool {
        match edge {
            Edge::Left => p.x >= self.min_x,
            Edge::Right => p.x <= self.max_x,
            Edge::Bottom => p.y >= self.min_y,
            Edge::Top => p.y <= self.max_y,
        }
    }

    /// Crossing of `a`-`b` with an edge line, kept within the segment's span.
    fn edge_intersect(&self, edge: Edge, a: Point, b: Point) -> Point {
        match edge {
            Edge::Left | Edge::Right => {
                let x = if matches!(edge, Edge::Left) { self.min_x } else { self.max_x };
                let t = (x - a.x) / (b.x - a.x);
                Point::new(x, (a.y + t * (b.y - a.y)).clamp(a.y.min(b.y), a.y.max(b.y)))
            }
            Edge::Bottom | Edge::Top => {
                let y = if matches!(edge, Edge::Bottom) { self.min_y } else { self.max_y };
                let t = (y - a.y) / (b.y - a.y);
                Point::new((a.x + t * (b.x - a.x)).clamp(a.x.min(b.x), a.x.max(b.x)), y)
            }
        }
    }

    /// Sutherland–Hodgman polygon clip, one rectangle edge at a time.
    ///
    /// A ring already inside the rectangle comes back unchanged.
    pub fn clip_polygon(&self, ring: &[Point]) -> Vec<Point> {
        let mut output: Vec<Point> = ring.to_vec();

        for edge in [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top] {
            if output.is_empty() {
                break;
            }
            let input = std::mem::take(&mut output);
            let mut prev = input[input.len() - 1];

            for &current in &input {
                let cur_in = self.edge_inside(edge, current);
                let prev_in = self.edge_inside(edge, prev);

                if cur_in {
                    if !prev_in {
                        output.push(self.edge_intersect(edge, prev, current));
                    }
                    output.push(current);
                } else if prev_in {
                    output.push(self.edge_intersect(edge, prev, current));
                }
                prev = current;
            }
        }

        output.dedup_by(|a, b| (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);
        if output.len() > 1 {
            let (first, last) = (output[0], output[output.len() - 1]);
            if (first.x - last.x).abs() < 1e-12 && (first.y - last.y).abs() < 1e-12 {
                output.pop();
            }
        }
        output
    }

    /// Clip a polygon with holes: outer and every hole independently.
    ///
    /// Holes that collapse below three points are dropped. `None` when the
    /// outer ring itself collapses.
    pub fn clip_polygon_with_holes(&self, polygon: &Polygon) -> Option<Polygon> {
        let outer = self.clip_polygon(&polygon.outer);
        if outer.len() < 3 {
            return None;
        }

        let holes = polygon
            .holes
            .iter()
            .map(|hole| self.clip_polygon(hole))
            .filter(|hole| hole.len() >= 3)
            .collect();

        Some(Polygon::with_holes(outer, holes))
    }
}

// ============================================================================
// TESTS
// ============================================================================
