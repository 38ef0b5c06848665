//! Core geometry types for plotfill.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! Every type here is a plain value: no ids, no back-references into a
//! document tree. `#[derive(Clone, Copy, PartialEq)]` gives us structural
//! comparison for free, which is exactly what geometry needs.

use serde::{Deserialize, Serialize};

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A directed line segment (a single hatch stroke).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A polygon with an outer boundary and optional holes.
///
/// `outer` is a closed ring; the last point does not repeat the first.
/// Holes are assumed to lie inside `outer` (the analyzer checks this once,
/// nothing downstream re-checks it).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary vertices
    pub outer: Vec<Point>,
    /// Interior holes
    pub holes: Vec<Vec<Point>>,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared distance - cheaper when only comparing.
    #[inline]
    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a line from two points.
    #[inline]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    #[inline]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[inline]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }

    /// Same segment, endpoints swapped.
    #[inline]
    pub fn reversed(&self) -> Line {
        Line::new(self.x2, self.y2, self.x1, self.y1)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.start().is_finite() && self.end().is_finite()
    }
}

impl Polygon {
    /// Create a simple polygon with no holes.
    pub fn new(outer: Vec<Point>) -> Self {
        Self { outer, holes: Vec::new() }
    }

    /// Create a polygon with holes.
    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { outer, holes }
    }

    /// A polygon needs at least three outer points to enclose anything.
    /// Every consumer rejects invalid polygons before doing work.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.outer.len() >= 3
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        ring_bounds(&self.outer)
    }

    /// Check if a point is inside the polygon body (inside outer, not in any hole).
    #[inline]
    pub fn point_in_body<F>(&self, x: f64, y: f64, point_in_polygon_fn: F) -> bool
    where
        F: Fn(f64, f64, &[Point]) -> bool,
    {
        if !point_in_polygon_fn(x, y, &self.outer) {
            return false;
        }
        !self.holes.iter().any(|hole| point_in_polygon_fn(x, y, hole))
    }

    /// Get the center point of the polygon's bounding box.
    #[inline]
    pub fn center(&self) -> Option<Point> {
        self.bounding_box().map(|(min_x, min_y, max_x, max_y)| {
            Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
        })
    }

    /// Get the diagonal length of the bounding box.
    #[inline]
    pub fn diagonal(&self) -> Option<f64> {
        self.bounding_box().map(|(min_x, min_y, max_x, max_y)| {
            let width = max_x - min_x;
            let height = max_y - min_y;
            (width * width + height * height).sqrt()
        })
    }

    /// Signed area of the outer ring (shoelace formula).
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.outer)
    }

    /// Filled area: outer minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area_of_points(h).abs()).sum();
        (self.signed_area().abs() - holes).max(0.0)
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Area-weighted centroid of the outer ring.
    pub fn centroid(&self) -> Option<Point> {
        ring_centroid(&self.outer)
    }
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding (y up)
/// - Negative value for clockwise winding
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Bounding box of a ring as (min_x, min_y, max_x, max_y).
pub fn ring_bounds(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some((min_x, min_y, max_x, max_y))
}

/// Area centroid of a closed ring.
///
/// Falls back to the vertex average for rings with (almost) no area, where
/// the area formula divides by zero.
pub fn ring_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let area = signed_area_of_points(points);
    if area.abs() < 1e-12 {
        return Some(vertex_average(points));
    }

    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point::new(cx * factor, cy * factor))
}

/// Plain average of the vertices.
pub fn vertex_average(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.x).sum();
    let sum_y: f64 = points.iter().map(|p| p.y).sum();
    Point::new(sum_x / n, sum_y / n)
}

/// Convert a closed ring into its edge segments.
pub fn ring_to_lines(points: &[Point]) -> Vec<Line> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| Line::from_points(points[i], points[(i + 1) % n]))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
