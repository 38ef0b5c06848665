//! SVG loading - turn a whole document into fillable shapes.
//!
//! Uses usvg for complete SVG resolution (CSS, `<use>`, nested transforms,
//! basic shapes converted to paths) then walks the tree. Every path comes
//! back in absolute document coordinates with its fill colour and fill rule.
//!
//! ## Curve Flattening
//!
//! usvg hands us cubic and quadratic Béziers only. They are sampled with the
//! same fixed step count as the path extractor.

use usvg::tiny_skia_path::PathSegment;

use crate::error::SvgError;
use crate::extract::{clean_ring, sample_cubic, sample_quadratic};
use crate::geometry::{Line, Point};
use crate::order::LineGroup;
use crate::params::FillRule;
use crate::transform::Affine;

/// One drawable element of a loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceShape {
    /// Element id, or a generated `path-N` when the element had none
    pub id: String,
    /// Fill colour as `#rrggbb` (stroke colour when unfilled)
    pub color: Option<String>,
    pub fill_rule: FillRule,
    /// Closed rings in document coordinates
    pub subpaths: Vec<Vec<Point>>,
}

/// Parse a document and collect every path with at least one fillable ring.
///
/// ## Rust Lesson #21: The ? Operator
///
/// `expression?` is sugar for:
/// ```text
/// match expression {
///     Ok(v) => v,
///     Err(e) => return Err(e.into()),
/// }
/// ```
/// It "bubbles up" errors automatically!
pub fn load_shapes(svg_text: &str) -> Result<Vec<SourceShape>, SvgError> {
    let tree = parse_tree(svg_text)?;

    let mut shapes = Vec::new();
    visit_paths(tree.root(), &mut |path| {
        let subpaths: Vec<Vec<Point>> = fill_rings(path_runs(path))
            .into_iter()
            .filter_map(clean_ring)
            .collect();
        if subpaths.is_empty() {
            return;
        }

        let id = if path.id().is_empty() {
            format!("path-{}", shapes.len())
        } else {
            path.id().to_string()
        };
        shapes.push(SourceShape {
            id,
            color: path_color(path),
            fill_rule: match path.fill().map(|f| f.rule()) {
                Some(usvg::FillRule::EvenOdd) => FillRule::EvenOdd,
                _ => FillRule::NonZero,
            },
            subpaths,
        });
    });

    tracing::debug!(shapes = shapes.len(), "loaded SVG");
    if shapes.is_empty() {
        Err(SvgError::NoPolygons)
    } else {
        Ok(shapes)
    }
}

/// Read stroke geometry back, one group per path.
///
/// Subpaths stay open unless the data closes them. This is how previously
/// generated fill output is re-read for simplification.
pub fn load_stroke_groups(svg_text: &str) -> Result<Vec<LineGroup>, SvgError> {
    let tree = parse_tree(svg_text)?;

    let mut groups = Vec::new();
    visit_paths(tree.root(), &mut |path| {
        let lines: Vec<Line> = path_runs(path)
            .into_iter()
            .flat_map(|run| {
                let mut lines: Vec<Line> = run
                    .points
                    .windows(2)
                    .map(|w| Line::from_points(w[0], w[1]))
                    .collect();
                if run.closed && run.points.len() > 2 {
                    lines.push(Line::from_points(run.points[run.points.len() - 1], run.points[0]));
                }
                lines
            })
            .filter(|l| l.is_finite() && l.length() > 0.0)
            .collect();
        if lines.is_empty() {
            return;
        }

        let id = if path.id().is_empty() {
            format!("path-{}", groups.len())
        } else {
            path.id().to_string()
        };
        groups.push(LineGroup::new(id, path_color(path), lines));
    });

    if groups.is_empty() {
        Err(SvgError::NoPolygons)
    } else {
        Ok(groups)
    }
}

fn parse_tree(svg_text: &str) -> Result<usvg::Tree, SvgError> {
    let options = usvg::Options::default();
    usvg::Tree::from_str(svg_text, &options).map_err(|e| SvgError::ParseError(e.to_string()))
}

/// Call `f` on every path, depth first, in document order.
fn visit_paths(group: &usvg::Group, f: &mut impl FnMut(&usvg::Path)) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => visit_paths(group, f),
            usvg::Node::Path(path) => f(path),
            // Text is converted to paths by usvg only with fonts loaded; images never fill
            _ => {}
        }
    }
}

fn path_color(path: &usvg::Path) -> Option<String> {
    let paint = path
        .fill()
        .map(|fill| fill.paint())
        .or_else(|| path.stroke().map(|stroke| stroke.paint()))?;
    match paint {
        usvg::Paint::Color(c) => Some(format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)),
        _ => None,
    }
}

/// One moveto-delimited run of points.
struct Run {
    points: Vec<Point>,
    closed: bool,
}

/// Join runs into fill rings the way the path extractor splits subpaths: a
/// move only starts a new ring after a close, otherwise the run continues.
fn fill_rings(runs: Vec<Run>) -> Vec<Vec<Point>> {
    let mut rings: Vec<Vec<Point>> = Vec::new();
    let mut open = false;
    for run in runs {
        match rings.last_mut() {
            Some(ring) if open => ring.extend(run.points),
            _ => rings.push(run.points),
        }
        open = !run.closed;
    }
    rings
}

/// Flatten a usvg path into runs in document coordinates.
fn path_runs(path: &usvg::Path) -> Vec<Run> {
    let ts = path.abs_transform();
    let affine = Affine::new(
        ts.sx as f64,
        ts.ky as f64,
        ts.kx as f64,
        ts.sy as f64,
        ts.tx as f64,
        ts.ty as f64,
    );
    let pt = |p: usvg::tiny_skia_path::Point| Point::new(p.x as f64, p.y as f64);

    let mut runs = Vec::new();
    let mut current = Run { points: Vec::new(), closed: false };

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                if !current.points.is_empty() {
                    runs.push(std::mem::replace(&mut current, Run { points: Vec::new(), closed: false }));
                }
                current.points.push(pt(p));
            }
            PathSegment::LineTo(p) => current.points.push(pt(p)),
            PathSegment::QuadTo(ctrl, p) => match current.points.last().copied() {
                Some(from) => sample_quadratic(&mut current.points, from, pt(ctrl), pt(p)),
                None => current.points.push(pt(p)),
            },
            PathSegment::CubicTo(c1, c2, p) => match current.points.last().copied() {
                Some(from) => sample_cubic(&mut current.points, from, pt(c1), pt(c2), pt(p)),
                None => current.points.push(pt(p)),
            },
            PathSegment::Close => current.closed = true,
        }
    }
    if !current.points.is_empty() {
        runs.push(current);
    }

    if !affine.is_identity() {
        for run in &mut runs {
            for p in &mut run.points {
                *p = affine.apply(*p);
            }
        }
    }
    runs
}

// ============================================================================
// TESTS
// ============================================================================
