//! Path extraction: shape descriptors to closed point rings.
//!
//! Curves are flattened by fixed-parameter stepping, not adaptively: every
//! cubic or quadratic gets `CURVE_SAMPLES` points and every elliptical arc
//! gets `ARC_SAMPLES`. Predictable point counts matter more for plotting
//! than tight chord error.
//!
//! ## Rust Lesson #9: Enums With Data
//!
//! `ShapeDescriptor` is a sum type: each variant carries exactly the fields
//! its shape needs. A `match` over it must handle every kind, so adding a
//! new shape kind is a compile error until extraction supports it.

use lyon_geom::{point, vector, Angle, ArcFlags, CubicBezierSegment, QuadraticBezierSegment, SvgArc};
use svgtypes::{PathParser, PathSegment, PointsParser};

use crate::geometry::Point;
use crate::transform::Affine;

/// Samples per cubic or quadratic Bézier segment.
pub const CURVE_SAMPLES: usize = 10;
/// Samples per elliptical arc.
pub const ARC_SAMPLES: usize = 5;
/// Points closer than this are merged.
pub const DUPLICATE_EPSILON: f64 = 1e-6;

/// Control-point distance for a quarter ellipse drawn as one cubic.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Raw geometry of one shape, before flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDescriptor {
    /// Rectangle; `rx`/`ry` round the corners when positive.
    Rect { x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    /// Closed point list.
    Polygon { points: Vec<Point> },
    /// Open point list; still closed for filling.
    Polyline { points: Vec<Point> },
    /// SVG path data.
    Path { d: String },
}

impl ShapeDescriptor {
    /// Polygon from an SVG `points` attribute.
    pub fn polygon_from_str(points: &str) -> Self {
        ShapeDescriptor::Polygon { points: parse_points(points) }
    }

    /// Polyline from an SVG `points` attribute.
    pub fn polyline_from_str(points: &str) -> Self {
        ShapeDescriptor::Polyline { points: parse_points(points) }
    }

    pub fn path(d: impl Into<String>) -> Self {
        ShapeDescriptor::Path { d: d.into() }
    }

    /// Short kind name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDescriptor::Rect { .. } => "rect",
            ShapeDescriptor::Circle { .. } => "circle",
            ShapeDescriptor::Ellipse { .. } => "ellipse",
            ShapeDescriptor::Polygon { .. } => "polygon",
            ShapeDescriptor::Polyline { .. } => "polyline",
            ShapeDescriptor::Path { .. } => "path",
        }
    }
}

/// A shape as handed over by a host: geometry, placement and identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: String,
    pub color: Option<String>,
    pub descriptor: ShapeDescriptor,
    pub transform: Affine,
}

impl Shape {
    pub fn new(id: impl Into<String>, descriptor: ShapeDescriptor) -> Self {
        Self {
            id: id.into(),
            color: None,
            descriptor,
            transform: Affine::IDENTITY,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Apply an SVG transform attribute. Unreadable strings leave the shape as is.
    pub fn with_transform_str(self, transform: &str) -> Self {
        match Affine::parse(transform) {
            Some(t) => self.with_transform(t),
            None => {
                tracing::debug!(transform, "ignoring unparseable transform");
                self
            }
        }
    }

    /// Flattened subpaths in document coordinates.
    pub fn subpaths(&self) -> Vec<Vec<Point>> {
        let mut rings = extract_subpaths(&self.descriptor);
        self.transform.apply_rings(&mut rings);
        rings
    }
}

/// Flatten a descriptor into its subpaths.
///
/// Every returned ring has at least 3 points, no non-finite coordinates and
/// no consecutive duplicates.
pub fn extract_subpaths(descriptor: &ShapeDescriptor) -> Vec<Vec<Point>> {
    let raw = match descriptor {
        ShapeDescriptor::Rect { x, y, width, height, rx, ry } => {
            vec![rect_points(*x, *y, *width, *height, *rx, *ry)]
        }
        ShapeDescriptor::Circle { cx, cy, r } => vec![ellipse_points(*cx, *cy, *r, *r)],
        ShapeDescriptor::Ellipse { cx, cy, rx, ry } => vec![ellipse_points(*cx, *cy, *rx, *ry)],
        ShapeDescriptor::Polygon { points } | ShapeDescriptor::Polyline { points } => {
            vec![points.clone()]
        }
        ShapeDescriptor::Path { d } => path_subpaths(d),
    };

    raw.into_iter().filter_map(clean_ring).collect()
}

/// Drop non-finite points, merge duplicates, reject rings under 3 points.
pub(crate) fn clean_ring(points: Vec<Point>) -> Option<Vec<Point>> {
    let mut ring: Vec<Point> = points.into_iter().filter(|p| p.is_finite()).collect();
    ring.dedup_by(|a, b| near(*a, *b));
    while ring.len() > 1 && near(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }
    (ring.len() >= 3).then_some(ring)
}

#[inline]
fn near(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < DUPLICATE_EPSILON && (a.y - b.y).abs() < DUPLICATE_EPSILON
}

fn parse_points(text: &str) -> Vec<Point> {
    PointsParser::from(text).map(|(x, y)| Point::new(x, y)).collect()
}

// ============================================================================
// BASIC SHAPES
// ============================================================================

fn rect_points(x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) -> Vec<Point> {
    if !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }

    // SVG rules: a missing radius copies the other, both clamp to half size
    let (mut rx, mut ry) = (rx.max(0.0), ry.max(0.0));
    if rx == 0.0 {
        rx = ry;
    }
    if ry == 0.0 {
        ry = rx;
    }
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    if rx <= 0.0 || ry <= 0.0 {
        return vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ];
    }

    let (x2, y2) = (x + width, y + height);
    let mut out = vec![Point::new(x + rx, y), Point::new(x2 - rx, y)];
    sample_arc(&mut out, Point::new(x2 - rx, y), Point::new(x2, y + ry), rx, ry, 0.0, false, true);
    out.push(Point::new(x2, y2 - ry));
    sample_arc(&mut out, Point::new(x2, y2 - ry), Point::new(x2 - rx, y2), rx, ry, 0.0, false, true);
    out.push(Point::new(x + rx, y2));
    sample_arc(&mut out, Point::new(x + rx, y2), Point::new(x, y2 - ry), rx, ry, 0.0, false, true);
    out.push(Point::new(x, y + ry));
    sample_arc(&mut out, Point::new(x, y + ry), Point::new(x + rx, y), rx, ry, 0.0, false, true);
    out
}

/// Ellipse as four cubic quadrants, `4 * CURVE_SAMPLES` points.
fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Point> {
    if !(rx > 0.0 && ry > 0.0) {
        return Vec::new();
    }

    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    let right = Point::new(cx + rx, cy);
    let bottom = Point::new(cx, cy + ry);
    let left = Point::new(cx - rx, cy);
    let top = Point::new(cx, cy - ry);

    let quadrants = [
        (right, Point::new(cx + rx, cy + ky), Point::new(cx + kx, cy + ry), bottom),
        (bottom, Point::new(cx - kx, cy + ry), Point::new(cx - rx, cy + ky), left),
        (left, Point::new(cx - rx, cy - ky), Point::new(cx - kx, cy - ry), top),
        (top, Point::new(cx + kx, cy - ry), Point::new(cx + rx, cy - ky), right),
    ];

    let mut out = Vec::with_capacity(4 * CURVE_SAMPLES);
    for (from, c1, c2, to) in quadrants {
        sample_cubic(&mut out, from, c1, c2, to);
    }
    out
}

// ============================================================================
// CURVE SAMPLING
// ============================================================================

/// Append `CURVE_SAMPLES` points of a cubic, excluding `from`.
pub(crate) fn sample_cubic(out: &mut Vec<Point>, from: Point, c1: Point, c2: Point, to: Point) {
    let curve = CubicBezierSegment {
        from: point(from.x, from.y),
        ctrl1: point(c1.x, c1.y),
        ctrl2: point(c2.x, c2.y),
        to: point(to.x, to.y),
    };
    for i in 1..=CURVE_SAMPLES {
        let p = curve.sample(i as f64 / CURVE_SAMPLES as f64);
        out.push(Point::new(p.x, p.y));
    }
}

pub(crate) fn sample_quadratic(out: &mut Vec<Point>, from: Point, ctrl: Point, to: Point) {
    let curve = QuadraticBezierSegment {
        from: point(from.x, from.y),
        ctrl: point(ctrl.x, ctrl.y),
        to: point(to.x, to.y),
    };
    for i in 1..=CURVE_SAMPLES {
        let p = curve.sample(i as f64 / CURVE_SAMPLES as f64);
        out.push(Point::new(p.x, p.y));
    }
}

/// Append `ARC_SAMPLES` points of an SVG endpoint arc, excluding `from`.
///
/// Zero radii degrade to a straight line, as SVG specifies.
#[allow(clippy::too_many_arguments)]
fn sample_arc(
    out: &mut Vec<Point>,
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) {
    let arc = SvgArc {
        from: point(from.x, from.y),
        to: point(to.x, to.y),
        radii: vector(rx.abs(), ry.abs()),
        x_rotation: Angle::degrees(x_rotation_deg),
        flags: ArcFlags { large_arc, sweep },
    };

    if arc.is_straight_line() {
        out.push(to);
        return;
    }

    let arc = arc.to_arc();
    for i in 1..ARC_SAMPLES {
        let p = arc.sample(i as f64 / ARC_SAMPLES as f64);
        out.push(Point::new(p.x, p.y));
    }
    // Land exactly on the requested endpoint
    out.push(to);
}

// ============================================================================
// PATH DATA
// ============================================================================

/// Pen state while walking path commands.
struct PathCursor {
    current: Point,
    start: Point,
    /// Second control point of the previous cubic, for `S`
    last_cubic: Option<Point>,
    /// Control point of the previous quadratic, for `T`
    last_quad: Option<Point>,
}

impl PathCursor {
    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.current.x + x, self.current.y + y)
        }
    }
}

/// Split path data into raw subpaths.
///
/// A subpath starts at the first move and at every move that follows a
/// close. Parsing stops at the first malformed token; everything read up
/// to that point is kept.
fn path_subpaths(d: &str) -> Vec<Vec<Point>> {
    let mut subpaths = Vec::new();
    let mut points: Vec<Point> = Vec::new();
    let mut closed = true;
    let mut cursor = PathCursor {
        current: Point::default(),
        start: Point::default(),
        last_cubic: None,
        last_quad: None,
    };

    for segment in PathParser::from(d) {
        let segment = match segment {
            Ok(segment) => segment,
            Err(err) => {
                tracing::debug!(%err, "path data truncated at malformed token");
                break;
            }
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let p = cursor.resolve(abs, x, y);
                if closed {
                    if !points.is_empty() {
                        subpaths.push(std::mem::take(&mut points));
                    }
                    closed = false;
                }
                points.push(p);
                cursor.current = p;
                cursor.start = p;
            }
            PathSegment::LineTo { abs, x, y } => {
                let p = cursor.resolve(abs, x, y);
                points.push(p);
                cursor.current = p;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let p = if abs {
                    Point::new(x, cursor.current.y)
                } else {
                    Point::new(cursor.current.x + x, cursor.current.y)
                };
                points.push(p);
                cursor.current = p;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let p = if abs {
                    Point::new(cursor.current.x, y)
                } else {
                    Point::new(cursor.current.x, cursor.current.y + y)
                };
                points.push(p);
                cursor.current = p;
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let c1 = cursor.resolve(abs, x1, y1);
                let c2 = cursor.resolve(abs, x2, y2);
                let to = cursor.resolve(abs, x, y);
                sample_cubic(&mut points, cursor.current, c1, c2, to);
                cursor.current = to;
                cubic_ctrl = Some(c2);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = reflect(cursor.last_cubic, cursor.current);
                let c2 = cursor.resolve(abs, x2, y2);
                let to = cursor.resolve(abs, x, y);
                sample_cubic(&mut points, cursor.current, c1, c2, to);
                cursor.current = to;
                cubic_ctrl = Some(c2);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = cursor.resolve(abs, x1, y1);
                let to = cursor.resolve(abs, x, y);
                sample_quadratic(&mut points, cursor.current, ctrl, to);
                cursor.current = to;
                quad_ctrl = Some(ctrl);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = reflect(cursor.last_quad, cursor.current);
                let to = cursor.resolve(abs, x, y);
                sample_quadratic(&mut points, cursor.current, ctrl, to);
                cursor.current = to;
                quad_ctrl = Some(ctrl);
            }
            PathSegment::EllipticalArc { abs, rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                let to = cursor.resolve(abs, x, y);
                sample_arc(&mut points, cursor.current, to, rx, ry, x_axis_rotation, large_arc, sweep);
                cursor.current = to;
            }
            PathSegment::ClosePath { .. } => {
                cursor.current = cursor.start;
                closed = true;
            }
        }

        cursor.last_cubic = cubic_ctrl;
        cursor.last_quad = quad_ctrl;
    }

    if !points.is_empty() {
        subpaths.push(points);
    }
    subpaths
}

/// Reflect the previous control point through the current point.
fn reflect(ctrl: Option<Point>, current: Point) -> Point {
    match ctrl {
        Some(c) => Point::new(2.0 * current.x - c.x, 2.0 * current.y - c.y),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_area_of_points;

    #[test]
    fn rect_is_four_points() {
        let rings = extract_subpaths(&ShapeDescriptor::Rect {
            x: 0.0, y: 0.0, width: 10.0, height: 5.0, rx: 0.0, ry: 0.0,
        });
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!((signed_area_of_points(&rings[0]).abs() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rounded_rect_uses_arc_samples() {
        let rings = extract_subpaths(&ShapeDescriptor::Rect {
            x: 0.0, y: 0.0, width: 20.0, height: 20.0, rx: 4.0, ry: 0.0,
        });
        // 4 straight-edge starts + 4 arcs of ARC_SAMPLES points
        assert_eq!(rings[0].len(), 4 + 4 * ARC_SAMPLES);
        let area = signed_area_of_points(&rings[0]).abs();
        assert!(area < 400.0 && area > 380.0, "area {}", area);
    }

    #[test]
    fn circle_has_forty_points() {
        let rings = extract_subpaths(&ShapeDescriptor::Circle { cx: 0.0, cy: 0.0, r: 10.0 });
        assert_eq!(rings[0].len(), 4 * CURVE_SAMPLES);
        for p in &rings[0] {
            assert!((p.distance(Point::default()) - 10.0).abs() < 0.03);
        }
    }

    #[test]
    fn relative_commands_resolve() {
        let rings = extract_subpaths(&ShapeDescriptor::path("m 10 10 h 10 v 10 h -10 z"));
        assert_eq!(
            rings[0],
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 20.0),
                Point::new(10.0, 20.0),
            ]
        );
    }

    #[test]
    fn cubic_gets_fixed_samples() {
        let rings = extract_subpaths(&ShapeDescriptor::path("M 0 0 C 0 10 10 10 10 0 Z"));
        assert_eq!(rings[0].len(), 1 + CURVE_SAMPLES);
    }

    #[test]
    fn close_then_move_starts_new_subpath() {
        let d = "M 0 0 L 10 0 L 10 10 Z M 20 0 L 30 0 L 30 10 Z";
        let rings = extract_subpaths(&ShapeDescriptor::path(d));
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], Point::new(20.0, 0.0));
    }

    #[test]
    fn move_after_open_run_continues() {
        let d = "M 0 0 L 10 0 M 10 10 L 0 10";
        let rings = extract_subpaths(&ShapeDescriptor::path(d));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn relative_move_after_close_uses_subpath_start() {
        let d = "M 5 5 L 15 5 L 15 15 z m 10 0 l 10 0 l 0 10 z";
        let rings = extract_subpaths(&ShapeDescriptor::path(d));
        assert_eq!(rings[1][0], Point::new(15.0, 5.0));
    }

    #[test]
    fn malformed_tail_is_skipped() {
        let rings = extract_subpaths(&ShapeDescriptor::path("M 0 0 L 10 0 L 10 10 L 0 10 L oops"));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn degenerate_subpaths_dropped() {
        let rings = extract_subpaths(&ShapeDescriptor::path("M 0 0 L 10 0 Z M 0 0 L 5 5 L 5 0 Z"));
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn duplicates_merged() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let rings = extract_subpaths(&ShapeDescriptor::Polygon { points: pts });
        assert_eq!(rings[0].len(), 3);
    }

    #[test]
    fn nan_points_dropped() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 3.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ];
        let rings = extract_subpaths(&ShapeDescriptor::Polyline { points: pts });
        assert_eq!(rings[0].len(), 3);
    }

    #[test]
    fn points_attribute_parses() {
        let shape = ShapeDescriptor::polygon_from_str("0,0 10,0 10,10");
        assert_eq!(extract_subpaths(&shape)[0].len(), 3);
    }

    #[test]
    fn shape_transform_applied() {
        let shape = Shape::new("a", ShapeDescriptor::Rect {
            x: 0.0, y: 0.0, width: 1.0, height: 1.0, rx: 0.0, ry: 0.0,
        })
        .with_transform_str("translate(5 5)");
        assert_eq!(shape.subpaths()[0][0], Point::new(5.0, 5.0));
    }
}
