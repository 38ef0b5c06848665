//! Compound-path serialization and fill layering.
//!
//! A fill is written as one SVG path per shape: every segment becomes its
//! own `M x1 y1 L x2 y2` pair. Coordinates use Rust's shortest round-trip
//! float formatting, so parsing the text back gives the exact same `f64`s.

use serde::{Deserialize, Serialize};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::geometry::{Line, Point};
use crate::order::LineGroup;

/// Serialize segments, in order, as compound path data.
///
/// Every pair is followed by a space; an empty slice gives an empty string.
pub fn to_compound_path(lines: &[Line]) -> String {
    let mut d = String::with_capacity(lines.len() * 32);
    for line in lines {
        d.push_str(&format!("M {} {} L {} {} ", line.x1, line.y1, line.x2, line.y2));
    }
    d
}

/// Read path data back into segments.
///
/// Every drawn straight edge becomes a segment (relative commands, `H`/`V`
/// and closes included). Curves only move the current point. Parsing stops
/// at the first malformed command.
pub fn parse_compound_path(d: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Point::default();
    let mut subpath_start = Point::default();

    for segment in SimplifyingPathParser::from(d) {
        let Ok(segment) = segment else { break };
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                current = Point::new(x, y);
                subpath_start = current;
            }
            SimplePathSegment::LineTo { x, y } => {
                let next = Point::new(x, y);
                lines.push(Line::from_points(current, next));
                current = next;
            }
            SimplePathSegment::CurveTo { x, y, .. } | SimplePathSegment::Quadratic { x, y, .. } => {
                current = Point::new(x, y);
            }
            SimplePathSegment::ClosePath => {
                if current != subpath_start {
                    lines.push(Line::from_points(current, subpath_start));
                }
                current = subpath_start;
            }
        }
    }

    lines
}

/// The lines produced for one shape by one fill pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillLayer {
    pub lines: Vec<Line>,
    pub color: Option<String>,
    pub path_id: String,
}

impl FillLayer {
    pub fn new(path_id: impl Into<String>, color: Option<String>, lines: Vec<Line>) -> Self {
        Self { lines, color, path_id: path_id.into() }
    }

    /// Compound path data for this layer.
    pub fn path_data(&self) -> String {
        to_compound_path(&self.lines)
    }
}

/// Fill layers stacked on top of each other.
///
/// Filling the same shape twice (say lines at 0° then at 90°) adds a second
/// layer; earlier layers are never touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FillStack {
    layers: Vec<FillLayer>,
}

impl FillStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top. Empty layers are kept so layer indices stay stable.
    pub fn push(&mut self, layer: FillLayer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[FillLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total segments across every layer.
    pub fn line_count(&self) -> usize {
        self.layers.iter().map(|l| l.lines.len()).sum()
    }

    /// One optimizer group per non-empty layer, bottom layer first.
    pub fn to_groups(&self) -> Vec<LineGroup> {
        self.layers
            .iter()
            .filter(|layer| !layer.lines.is_empty())
            .map(|layer| LineGroup::new(layer.path_id.clone(), layer.color.clone(), layer.lines.clone()))
            .collect()
    }
}

impl Extend<FillLayer> for FillStack {
    fn extend<T: IntoIterator<Item = FillLayer>>(&mut self, iter: T) {
        self.layers.extend(iter);
    }
}
