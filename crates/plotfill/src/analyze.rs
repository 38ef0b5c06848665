//! Polygon analysis: turn a compound path's subpaths into fillable polygons.
//!
//! Subpaths are ranked by area and arranged into a containment forest (each
//! subpath's parent is the smallest larger subpath that contains it). The
//! hole mode and fill rule then decide which rings are outers, which are
//! holes and which vanish.

use crate::clip::point_in_polygon;
use crate::geometry::{ring_centroid, signed_area_of_points, Point, Polygon};
use crate::params::{FillRule, HoleMode};

/// Vertices sampled per containment test, besides the centroid.
const CONTAINMENT_SAMPLES: usize = 8;

/// Below this absolute area a subpath is considered degenerate.
const MIN_AREA: f64 = 1e-9;

/// One subpath with its precomputed measurements.
#[derive(Debug, Clone)]
struct Ring {
    points: Vec<Point>,
    signed_area: f64,
    centroid: Point,
    /// Index of the smallest enclosing ring, if any
    parent: Option<usize>,
}

/// Test whether `inner` lies inside `outer`.
///
/// Samples the centroid plus up to 8 evenly spaced vertices; `inner` is
/// contained when a strict majority of the samples are inside `outer`. A
/// single vertex touching the boundary can't flip the result.
pub fn is_contained(inner: &[Point], outer: &[Point]) -> bool {
    if inner.is_empty() || outer.len() < 3 {
        return false;
    }
    let centroid = ring_centroid(inner).unwrap_or(inner[0]);
    is_contained_with_centroid(inner, centroid, outer)
}

fn is_contained_with_centroid(inner: &[Point], centroid: Point, outer: &[Point]) -> bool {
    let step = (inner.len() / CONTAINMENT_SAMPLES).max(1);
    let samples = std::iter::once(centroid)
        .chain(inner.iter().step_by(step).take(CONTAINMENT_SAMPLES).copied());

    let mut total = 0usize;
    let mut inside = 0usize;
    for p in samples {
        total += 1;
        if point_in_polygon(p.x, p.y, outer) {
            inside += 1;
        }
    }
    inside * 2 > total
}

/// Build the containment forest, largest rings first.
fn build_forest(subpaths: &[Vec<Point>]) -> Vec<Ring> {
    let mut rings: Vec<Ring> = subpaths
        .iter()
        .filter(|sp| sp.len() >= 3)
        .filter_map(|sp| {
            let signed_area = signed_area_of_points(sp);
            if signed_area.abs() < MIN_AREA {
                return None;
            }
            Some(Ring {
                points: sp.clone(),
                signed_area,
                centroid: ring_centroid(sp)?,
                parent: None,
            })
        })
        .collect();

    // Stable sort keeps document order among equal areas
    rings.sort_by(|a, b| b.signed_area.abs().total_cmp(&a.signed_area.abs()));

    for i in 0..rings.len() {
        // Walk back from the next-larger ring: the first container found
        // is the smallest one
        let parent = (0..i).rev().find(|&j| {
            is_contained_with_centroid(&rings[i].points, rings[i].centroid, &rings[j].points)
        });
        rings[i].parent = parent;
    }

    rings
}

/// Arrange subpaths into polygons according to `mode` and `rule`.
///
/// Output order follows descending outer area.
pub fn analyze_subpaths(subpaths: &[Vec<Point>], mode: HoleMode, rule: FillRule) -> Vec<Polygon> {
    let rings = build_forest(subpaths);

    let polygons = match mode {
        HoleMode::Independent => rings.into_iter().map(|r| Polygon::new(r.points)).collect(),
        HoleMode::Nested => nested(rings),
        HoleMode::Suppress => suppress(rings, rule),
    };

    tracing::trace!(subpaths = subpaths.len(), polygons = polygons.len(), ?mode, "analyzed compound path");
    polygons
}

/// Every ring becomes a polygon whose holes are its direct children.
fn nested(rings: Vec<Ring>) -> Vec<Polygon> {
    let mut holes: Vec<Vec<Vec<Point>>> = vec![Vec::new(); rings.len()];
    for ring in &rings {
        if let Some(parent) = ring.parent {
            holes[parent].push(ring.points.clone());
        }
    }
    rings
        .into_iter()
        .zip(holes)
        .map(|(ring, holes)| Polygon::with_holes(ring.points, holes))
        .collect()
}

/// Holes suppress fill; islands inside holes become separate outers.
fn suppress(rings: Vec<Ring>, rule: FillRule) -> Vec<Polygon> {
    let n = rings.len();
    let mut filled = vec![false; n];
    let mut winding = vec![0i32; n];
    let mut depth = vec![0usize; n];

    // Parents always precede children (they are larger), so one pass works
    for i in 0..n {
        let dir = if rings[i].signed_area > 0.0 { 1 } else { -1 };
        match rings[i].parent {
            Some(p) => {
                winding[i] = winding[p] + dir;
                depth[i] = depth[p] + 1;
            }
            None => {
                winding[i] = dir;
                depth[i] = 0;
            }
        }
        filled[i] = match rule {
            FillRule::NonZero => winding[i] != 0,
            FillRule::EvenOdd => depth[i] % 2 == 0,
        };
    }

    // owner[i] = index into `outers` for filled rings that start a region
    let mut owner: Vec<Option<usize>> = vec![None; n];
    let mut outers: Vec<Polygon> = Vec::new();

    for i in 0..n {
        let parent_filled = rings[i].parent.map(|p| filled[p]);
        match (filled[i], parent_filled) {
            // A new filled region
            (true, None) | (true, Some(false)) => {
                owner[i] = Some(outers.len());
                outers.push(Polygon::new(rings[i].points.clone()));
            }
            // Same-direction ring inside a filled one: filled anyway
            (true, Some(true)) => {
                owner[i] = rings[i].parent.and_then(|p| owner[p]);
            }
            // A hole cut into a filled region
            (false, Some(true)) => {
                if let Some(o) = rings[i].parent.and_then(|p| owner[p]) {
                    outers[o].holes.push(rings[i].points.clone());
                }
            }
            // Unfilled inside unfilled (or an unfilled root): nothing to draw
            (false, _) => {}
        }
    }

    outers
}
