//! Line simplification - chain segments into polylines, then thin them.
//!
//! Pattern generators emit many short segments (sampled curves, contour
//! pieces). Chaining joins segments whose endpoints meet, in either
//! orientation, and Ramer–Douglas–Peucker drops points that stay within
//! `tolerance` of the simplified polyline. Fewer points means fewer plotter
//! commands; fewer chains means fewer pen lifts.

use std::collections::HashMap;

use crate::geometry::{Line, Point};

/// Endpoints closer than this are joined.
pub const CONNECT_THRESHOLD: f64 = 0.5;

/// A chain of connected points forming a polyline.
pub type Chain = Vec<Point>;

/// Configuration for line chaining.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Maximum distance between endpoints to consider them connected.
    pub tolerance: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { tolerance: CONNECT_THRESHOLD }
    }
}

impl ChainConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

/// Simplify a set of segments.
///
/// A non-positive or non-finite `tolerance` returns the input unchanged.
/// Otherwise segments are chained, each chain is reduced with RDP, and the
/// chains are re-emitted as segments. Chain endpoints are kept exactly.
pub fn simplify(lines: &[Line], tolerance: f64) -> Vec<Line> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return lines.to_vec();
    }

    let chains: Vec<Chain> = chain_lines(lines, &ChainConfig::default())
        .into_iter()
        .map(|chain| rdp(&chain, tolerance))
        .collect();

    let out = chains_to_lines(&chains);
    tracing::debug!(input = lines.len(), chains = chains.len(), output = out.len(), tolerance, "simplified");
    out
}

/// Chain connected lines into polylines.
///
/// # Algorithm
///
/// 1. Build a spatial hash of all endpoints
/// 2. For each unvisited line, start a new chain
/// 3. Extend the chain forward: find a line with either endpoint at our end
/// 4. Extend the chain backward the same way from our start
/// 5. Lines matched by their far endpoint are traversed reversed
///
/// # Performance
///
/// O(n) average case with spatial hashing, O(n²) worst case if all
/// endpoints hash to same bucket.
pub fn chain_lines(lines: &[Line], config: &ChainConfig) -> Vec<Chain> {
    if lines.is_empty() {
        return Vec::new();
    }

    let tolerance = config.tolerance;
    let tolerance_sq = tolerance * tolerance;
    let grid_size = tolerance.max(0.001);

    let mut used = vec![false; lines.len()];

    // Spatial index: grid cell -> (line index, endpoint is the start)
    let mut grid: HashMap<(i64, i64), Vec<(usize, bool)>> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        grid.entry(point_to_cell(line.x1, line.y1, grid_size)).or_default().push((i, true));
        grid.entry(point_to_cell(line.x2, line.y2, grid_size)).or_default().push((i, false));
    }

    let index = EndpointIndex { grid: &grid, lines, grid_size, tolerance_sq };
    let mut chains = Vec::new();

    for start_idx in 0..lines.len() {
        if used[start_idx] {
            continue;
        }

        used[start_idx] = true;
        let line = &lines[start_idx];
        let mut forward = vec![line.start(), line.end()];

        // Extend forward from the chain's end
        while let Some(tail) = forward.last().copied() {
            let Some((idx, at_start)) = index.find(tail, &used) else { break };
            used[idx] = true;
            let next = &lines[idx];
            forward.push(if at_start { next.end() } else { next.start() });
        }

        // Extend backward from the chain's start; collected in reverse
        let mut backward: Vec<Point> = Vec::new();
        let mut head = forward[0];
        while let Some((idx, at_start)) = index.find(head, &used) {
            used[idx] = true;
            let prev = &lines[idx];
            head = if at_start { prev.end() } else { prev.start() };
            backward.push(head);
        }

        backward.reverse();
        backward.extend(forward);
        chains.push(backward);
    }

    chains
}

/// Convert a point to a grid cell coordinate.
#[inline]
fn point_to_cell(x: f64, y: f64, grid_size: f64) -> (i64, i64) {
    ((x / grid_size).floor() as i64, (y / grid_size).floor() as i64)
}

struct EndpointIndex<'a> {
    grid: &'a HashMap<(i64, i64), Vec<(usize, bool)>>,
    lines: &'a [Line],
    grid_size: f64,
    tolerance_sq: f64,
}

impl EndpointIndex<'_> {
    /// Find an unused line with an endpoint near `p`.
    ///
    /// Returns the line index and whether the match was its start point.
    fn find(&self, p: Point, used: &[bool]) -> Option<(usize, bool)> {
        let cell = point_to_cell(p.x, p.y, self.grid_size);

        // Check this cell and all 8 neighbors (endpoints might be in adjacent cells)
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.grid.get(&(cell.0 + dx, cell.1 + dy)) else {
                    continue;
                };
                for &(line_idx, is_start) in candidates {
                    if used[line_idx] {
                        continue;
                    }
                    let line = &self.lines[line_idx];
                    let q = if is_start { line.start() } else { line.end() };
                    if q.distance_sq(p) <= self.tolerance_sq {
                        return Some((line_idx, is_start));
                    }
                }
            }
        }

        None
    }
}

/// Ramer–Douglas–Peucker reduction of a polyline.
///
/// First and last points are always kept.
pub fn rdp(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let (mut max_dist, mut max_idx) = (0.0, first);
        for i in first + 1..last {
            let d = perpendicular_distance(points[i], points[first], points[last]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }

        if max_dist > tolerance {
            keep[max_idx] = true;
            stack.push((first, max_idx));
            stack.push((max_idx, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Distance from `p` to the segment `a`-`b` (to `a` when degenerate).
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-24 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Convert chains back to lines.
pub fn chains_to_lines(chains: &[Chain]) -> Vec<Line> {
    chains
        .iter()
        .flat_map(|chain| chain.windows(2).map(|w| Line::from_points(w[0], w[1])))
        .collect()
}

/// Calculate statistics about chaining results.
#[derive(Debug, Clone)]
pub struct ChainStats {
    /// Number of input line segments
    pub input_lines: usize,
    /// Number of output chains
    pub output_chains: usize,
    /// Average chain length (points per chain)
    pub avg_chain_length: f64,
    /// Longest chain (points)
    pub max_chain_length: usize,
    /// Reduction ratio (1.0 - chains/lines)
    pub reduction_ratio: f64,
}

impl ChainStats {
    pub fn from_chains(input_count: usize, chains: &[Chain]) -> Self {
        let output_chains = chains.len();
        let total_points: usize = chains.iter().map(|c| c.len()).sum();
        let max_chain_length = chains.iter().map(|c| c.len()).max().unwrap_or(0);

        Self {
            input_lines: input_count,
            output_chains,
            avg_chain_length: if output_chains > 0 {
                total_points as f64 / output_chains as f64
            } else {
                0.0
            },
            max_chain_length,
            reduction_ratio: if input_count > 0 {
                1.0 - (output_chains as f64 / input_count as f64)
            } else {
                0.0
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
