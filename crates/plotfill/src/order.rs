//! Path-order optimization for minimizing plotter travel.
//!
//! Fill generators emit segments in whatever order their sweep produced
//! them. Every gap between one segment's end and the next one's start is a
//! pen-up move, so reordering (and flipping) segments shortens a plot
//! considerably.
//!
//! ## Algorithms
//!
//! - **Two-level greedy**: visit shapes nearest-first, then segments
//!   nearest-first within each shape. O(n²) per shape, usually good enough
//! - **Chunked**: greedy search limited to windows of x-sorted segments,
//!   trading tour quality for speed on huge inputs
//! - **Colour-aware**: one colour at a time, so pens are swapped once each
//!
//! Nothing here is a TSP solver; the output is a permutation of the input,
//! never new geometry.

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::geometry::{Line, Point};

/// Default window for `optimize_order_chunked` when a host asks for the
/// chunked strategy by name.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// The fill lines of one source shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineGroup {
    pub path_id: String,
    pub color: Option<String>,
    pub lines: Vec<Line>,
}

impl LineGroup {
    pub fn new(path_id: impl Into<String>, color: Option<String>, lines: Vec<Line>) -> Self {
        Self { path_id: path_id.into(), color, lines }
    }
}

/// A segment in plotting order, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedLine {
    /// The segment as it should be drawn (already flipped when `reversed`)
    pub line: Line,
    pub path_id: String,
    pub color: Option<String>,
    /// Position in the flattened input, assigned once
    pub original_index: usize,
    pub reversed: bool,
}

/// Result of an ordering pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderResult {
    pub ordered_lines: Vec<OrderedLine>,
    /// Pen-up travel of the input order, starting at the origin
    pub travel_before: f64,
    /// Pen-up travel of the optimized order, starting at the origin
    pub travel_after: f64,
}

impl OrderResult {
    /// Just the segments, in drawing order.
    pub fn lines(&self) -> Vec<Line> {
        self.ordered_lines.iter().map(|l| l.line).collect()
    }

    /// Fraction of travel saved (0.0 when there was none to save).
    pub fn improvement(&self) -> f64 {
        if self.travel_before > 0.0 {
            1.0 - self.travel_after / self.travel_before
        } else {
            0.0
        }
    }

    fn finish(flat: &[OrderedLine], ordered_lines: Vec<OrderedLine>) -> Self {
        let before: Vec<Line> = flat.iter().map(|l| l.line).collect();
        let after: Vec<Line> = ordered_lines.iter().map(|l| l.line).collect();
        let result = Self {
            travel_before: travel_distance(&before, Point::default()),
            travel_after: travel_distance(&after, Point::default()),
            ordered_lines,
        };
        tracing::debug!(
            lines = result.ordered_lines.len(),
            before = result.travel_before,
            after = result.travel_after,
            "ordered"
        );
        result
    }
}

/// Total pen-up distance from `start` through `lines` in the given order.
pub fn travel_distance(lines: &[Line], start: Point) -> f64 {
    let mut pen = start;
    let mut total = 0.0;
    for line in lines {
        total += pen.distance(line.start());
        pen = line.end();
    }
    total
}

// ============================================================================
// FLATTENING & GREEDY CORE
// ============================================================================

/// Flatten groups into tagged lines plus, per group, its indices.
fn flatten(groups: &[LineGroup]) -> (Vec<OrderedLine>, Vec<Vec<usize>>) {
    let mut flat = Vec::with_capacity(groups.iter().map(|g| g.lines.len()).sum());
    let mut members = Vec::with_capacity(groups.len());

    for group in groups {
        let mut indices = Vec::with_capacity(group.lines.len());
        for line in &group.lines {
            let index = flat.len();
            indices.push(index);
            flat.push(OrderedLine {
                line: *line,
                path_id: group.path_id.clone(),
                color: group.color.clone(),
                original_index: index,
                reversed: false,
            });
        }
        members.push(indices);
    }

    (flat, members)
}

/// Greedy nearest-endpoint walk over `candidates`, moving `pen` as it goes.
///
/// A segment whose end is closer than its start is emitted reversed. Ties
/// go to the earlier candidate and to the unreversed orientation.
fn walk_lines(flat: &[OrderedLine], candidates: &[usize], pen: &mut Point, out: &mut Vec<OrderedLine>) {
    let mut remaining = candidates.to_vec();

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        let mut best_reversed = false;

        for (slot, &idx) in remaining.iter().enumerate() {
            let line = &flat[idx].line;
            let d_start = pen.distance_sq(line.start());
            let d_end = pen.distance_sq(line.end());
            let (d, reversed) = if d_end < d_start { (d_end, true) } else { (d_start, false) };
            if d < best_dist {
                best = slot;
                best_dist = d;
                best_reversed = reversed;
            }
        }

        let idx = remaining.remove(best);

        let mut entry = flat[idx].clone();
        if best_reversed {
            entry.line = entry.line.reversed();
            entry.reversed = true;
        }
        *pen = entry.line.end();
        out.push(entry);
    }
}

/// Per-group summary used by the group tour.
struct GroupAnchor {
    group: usize,
    centroid: Point,
    top_left: Point,
}

fn group_anchor(flat: &[OrderedLine], indices: &[usize], group: usize) -> Option<GroupAnchor> {
    if indices.is_empty() {
        return None;
    }

    let n = indices.len() as f64;
    let (mut sx, mut sy) = (0.0, 0.0);
    let mut top_left = flat[indices[0]].line.start();

    for &i in indices {
        let line = &flat[i].line;
        let mid = line.midpoint();
        sx += mid.x;
        sy += mid.y;
        for p in [line.start(), line.end()] {
            if p.x < top_left.x || (p.x == top_left.x && p.y < top_left.y) {
                top_left = p;
            }
        }
    }

    Some(GroupAnchor { group, centroid: Point::new(sx / n, sy / n), top_left })
}

/// Two-level tour over the groups listed in `selected`.
///
/// The group tour starts at `pen` and hops between group centroids; the
/// line tour shares the real pen position across groups.
fn two_level(
    flat: &[OrderedLine],
    members: &[Vec<usize>],
    selected: &[usize],
    pen: &mut Point,
    out: &mut Vec<OrderedLine>,
) {
    let mut anchors: Vec<GroupAnchor> = selected
        .iter()
        .filter_map(|&g| group_anchor(flat, &members[g], g))
        .collect();

    let mut cursor = *pen;
    while !anchors.is_empty() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (slot, anchor) in anchors.iter().enumerate() {
            let d = cursor.distance_sq(anchor.top_left);
            if d < best_dist {
                best = slot;
                best_dist = d;
            }
        }

        let anchor = anchors.remove(best);
        cursor = anchor.centroid;
        walk_lines(flat, &members[anchor.group], pen, out);
    }
}

// ============================================================================
// PUBLIC ORDERING PASSES
// ============================================================================

/// Two-level greedy ordering: shapes nearest-first, then segments.
pub fn optimize_order(groups: &[LineGroup]) -> OrderResult {
    let (flat, members) = flatten(groups);
    let selected: Vec<usize> = (0..members.len()).collect();

    let mut out = Vec::with_capacity(flat.len());
    let mut pen = Point::default();
    two_level(&flat, &members, &selected, &mut pen, &mut out);

    OrderResult::finish(&flat, out)
}

/// Chunked greedy ordering for very large inputs.
///
/// All segments are sorted by starting x and split into windows of
/// `chunk_size`; the greedy search only looks inside the current window.
/// Cost drops from O(n²) to O(n·chunk_size) at the price of a worse tour
/// near window seams. Group boundaries are ignored.
pub fn optimize_order_chunked(groups: &[LineGroup], chunk_size: usize) -> OrderResult {
    let (flat, _) = flatten(groups);

    let mut sorted: Vec<usize> = (0..flat.len()).collect();
    sorted.sort_by(|&a, &b| flat[a].line.x1.total_cmp(&flat[b].line.x1));

    let mut out = Vec::with_capacity(flat.len());
    let mut pen = Point::default();
    for chunk in sorted.chunks(chunk_size.max(1)) {
        walk_lines(&flat, chunk, &mut pen, &mut out);
    }

    OrderResult::finish(&flat, out)
}

/// Colour-aware ordering: all shapes of one colour before the next.
///
/// Colours are visited in `color_order`; colours it does not list follow in
/// first-seen order. Within a colour the two-level tour runs as usual, and
/// the pen carries over from one colour to the next.
pub fn optimize_order_by_color(groups: &[LineGroup], color_order: &[String]) -> OrderResult {
    let (flat, members) = flatten(groups);

    let mut buckets: Vec<(Option<String>, Vec<usize>)> = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        match buckets.iter_mut().find(|(c, _)| *c == group.color) {
            Some((_, list)) => list.push(g),
            None => buckets.push((group.color.clone(), vec![g])),
        }
    }

    let rank = |color: &Option<String>| {
        color
            .as_ref()
            .and_then(|c| color_order.iter().position(|o| o == c))
            .unwrap_or(color_order.len())
    };
    // Stable: unlisted colours keep first-seen order
    buckets.sort_by_key(|(color, _)| rank(color));

    let mut out = Vec::with_capacity(flat.len());
    let mut pen = Point::default();
    for (_, selected) in &buckets {
        two_level(&flat, &members, selected, &mut pen, &mut out);
    }

    OrderResult::finish(&flat, out)
}

/// Keep input order; still reports travel.
pub fn document_order(groups: &[LineGroup]) -> OrderResult {
    let (flat, _) = flatten(groups);
    OrderResult::finish(&flat, flat.clone())
}

/// Ordering strategy for hosts that pick one by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStrategy {
    /// Keep original document order
    Document,
    /// Two-level nearest neighbour
    #[default]
    Nearest,
    /// Windowed nearest neighbour for huge inputs
    Chunked,
    /// Nearest neighbour, one colour at a time
    Color,
}

impl OrderStrategy {
    /// Get strategy name as string.
    pub fn name(&self) -> &'static str {
        match self {
            OrderStrategy::Document => "document",
            OrderStrategy::Nearest => "nearest",
            OrderStrategy::Chunked => "chunked",
            OrderStrategy::Color => "color",
        }
    }

    /// Parse strategy from string.
    pub fn from_name(name: &str) -> Result<OrderStrategy, ParamsError> {
        match name.to_lowercase().as_str() {
            "document" | "doc" | "original" | "none" => Ok(OrderStrategy::Document),
            "nearest" | "nn" | "nearest-neighbor" | "greedy" => Ok(OrderStrategy::Nearest),
            "chunked" | "chunk" => Ok(OrderStrategy::Chunked),
            "color" | "colour" => Ok(OrderStrategy::Color),
            _ => Err(ParamsError::UnknownOrderStrategy(name.to_string())),
        }
    }

    /// All available strategies.
    pub fn all() -> &'static [OrderStrategy] {
        &[
            OrderStrategy::Document,
            OrderStrategy::Nearest,
            OrderStrategy::Chunked,
            OrderStrategy::Color,
        ]
    }

    /// Run this strategy with default settings (first-seen colour order,
    /// `DEFAULT_CHUNK_SIZE` windows).
    pub fn apply(&self, groups: &[LineGroup]) -> OrderResult {
        match self {
            OrderStrategy::Document => document_order(groups),
            OrderStrategy::Nearest => optimize_order(groups),
            OrderStrategy::Chunked => optimize_order_chunked(groups, DEFAULT_CHUNK_SIZE),
            OrderStrategy::Color => optimize_order_by_color(groups, &[]),
        }
    }
}

impl std::fmt::Display for OrderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OrderStrategy {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStrategy::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, color: Option<&str>, lines: Vec<Line>) -> LineGroup {
        LineGroup::new(id, color.map(str::to_string), lines)
    }

    fn sorted_indices(result: &OrderResult) -> Vec<usize> {
        let mut idx: Vec<usize> = result.ordered_lines.iter().map(|l| l.original_index).collect();
        idx.sort_unstable();
        idx
    }

    #[test]
    fn nearest_first_with_reversal() {
        let groups = vec![group(
            "a",
            None,
            vec![
                Line::new(5.0, 0.0, 6.0, 0.0),
                Line::new(2.0, 0.0, 1.0, 0.0),
                Line::new(0.0, 1.0, 0.0, 0.0),
            ],
        )];
        let result = optimize_order(&groups);

        let order: Vec<usize> = result.ordered_lines.iter().map(|l| l.original_index).collect();
        let reversed: Vec<bool> = result.ordered_lines.iter().map(|l| l.reversed).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert_eq!(reversed, vec![true, true, false]);

        assert!((result.travel_before - (10.0 + 2f64.sqrt())).abs() < 1e-9);
        assert!((result.travel_after - (3.0 + 2f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn reversed_lines_match_input() {
        let input = vec![Line::new(3.0, 3.0, 0.5, 0.5), Line::new(9.0, 1.0, 7.0, 2.0)];
        let result = optimize_order(&[group("a", None, input.clone())]);
        for entry in &result.ordered_lines {
            let original = input[entry.original_index];
            let expected = if entry.reversed { original.reversed() } else { original };
            assert_eq!(entry.line, expected);
        }
    }

    #[test]
    fn groups_visited_nearest_first() {
        let far = group("far", None, vec![Line::new(100.0, 100.0, 110.0, 100.0)]);
        let near = group("near", None, vec![Line::new(1.0, 1.0, 2.0, 1.0)]);
        let result = optimize_order(&[far, near]);
        assert_eq!(result.ordered_lines[0].path_id, "near");
        assert_eq!(result.ordered_lines[1].path_id, "far");
    }

    #[test]
    fn group_lines_stay_together() {
        // Group b's segment sits between a's two, but a is finished first
        let a = group(
            "a",
            None,
            vec![Line::new(0.0, 0.0, 1.0, 0.0), Line::new(20.0, 0.0, 21.0, 0.0)],
        );
        let b = group("b", None, vec![Line::new(10.0, 0.0, 11.0, 0.0)]);
        let result = optimize_order(&[a, b]);
        let ids: Vec<&str> = result.ordered_lines.iter().map(|l| l.path_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b"]);
    }

    #[test]
    fn empty_input() {
        let result = optimize_order(&[]);
        assert!(result.ordered_lines.is_empty());
        assert_eq!(result.travel_before, 0.0);
        assert_eq!(result.improvement(), 0.0);

        let result = optimize_order(&[group("empty", None, Vec::new())]);
        assert!(result.ordered_lines.is_empty());
    }

    #[test]
    fn chunked_is_a_permutation() {
        let lines: Vec<Line> = (0..50)
            .map(|i| {
                let x = ((i * 37) % 50) as f64;
                Line::new(x, (i % 7) as f64, x + 0.5, (i % 7) as f64 + 0.5)
            })
            .collect();
        let result = optimize_order_chunked(&[group("a", None, lines)], 8);
        assert_eq!(sorted_indices(&result), (0..50).collect::<Vec<_>>());
        assert!(result.travel_after < result.travel_before);
    }

    #[test]
    fn chunk_size_zero_still_works() {
        let lines = vec![Line::new(0.0, 0.0, 1.0, 0.0), Line::new(5.0, 0.0, 6.0, 0.0)];
        let result = optimize_order_chunked(&[group("a", None, lines)], 0);
        assert_eq!(result.ordered_lines.len(), 2);
    }

    #[test]
    fn colour_order_respected() {
        let groups = vec![
            group("r1", Some("red"), vec![Line::new(0.0, 0.0, 1.0, 0.0)]),
            group("b1", Some("blue"), vec![Line::new(50.0, 0.0, 51.0, 0.0)]),
            group("g1", Some("green"), vec![Line::new(2.0, 0.0, 3.0, 0.0)]),
            group("r2", Some("red"), vec![Line::new(60.0, 0.0, 61.0, 0.0)]),
        ];
        let result = optimize_order_by_color(&groups, &["blue".to_string()]);
        let colors: Vec<&str> = result
            .ordered_lines
            .iter()
            .map(|l| l.color.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(colors, vec!["blue", "red", "red", "green"]);
    }

    #[test]
    fn document_order_is_identity() {
        let lines = vec![Line::new(9.0, 0.0, 10.0, 0.0), Line::new(0.0, 0.0, 1.0, 0.0)];
        let result = document_order(&[group("a", None, lines.clone())]);
        assert_eq!(result.lines(), lines);
        assert_eq!(result.travel_before, result.travel_after);
    }

    #[test]
    fn strategy_names_round_trip() {
        for s in OrderStrategy::all() {
            assert_eq!(OrderStrategy::from_name(s.name()), Ok(*s));
        }
        assert_eq!("colour".parse::<OrderStrategy>(), Ok(OrderStrategy::Color));
        assert!(OrderStrategy::from_name("tsp").is_err());
    }

    #[test]
    fn travel_distance_counts_pen_up_only() {
        let lines = vec![Line::new(0.0, 0.0, 10.0, 0.0), Line::new(10.0, 0.0, 10.0, 10.0)];
        assert_eq!(travel_distance(&lines, Point::default()), 0.0);
        assert_eq!(travel_distance(&lines, Point::new(0.0, 3.0)), 3.0);
    }
}
