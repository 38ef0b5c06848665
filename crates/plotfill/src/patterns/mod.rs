//! Pattern generators for polygon fills.
//!
//! Each pattern generates lines that are clipped to the polygon body: every
//! emitted segment has its midpoint inside the outer ring and outside every
//! hole. Generators are total: an invalid polygon or unusable parameters
//! produce an empty vector, never an error.

pub mod util;

mod brick;
mod concentric;
mod gyroid;
mod hilbert;
mod honeycomb;
mod radial;
mod spiral;
mod wiggle;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use brick::generate_brick_fill;
pub use concentric::generate_concentric_fill;
pub use gyroid::generate_gyroid_fill;
pub use hilbert::{generate_hilbert_fill, hilbert_order};
pub use honeycomb::generate_honeycomb_fill;
pub use radial::generate_radial_fill;
pub use spiral::generate_spiral_fill;
pub use wiggle::{generate_wiggle_fill, Waveform};

pub use crate::hatch::{generate_crosshatch_fill, generate_lines_fill};

use crate::clip::Rect;
use crate::error::ParamsError;
use crate::geometry::{Line, Polygon};
use crate::offset::inset_polygon;
use crate::params::FillParams;

/// Available pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    Lines,
    Crosshatch,
    Concentric,
    #[serde(alias = "sine")]
    Wiggle,
    Zigzag,
    Spiral,
    #[serde(alias = "hex")]
    Honeycomb,
    Gyroid,
    Radial,
    #[serde(alias = "running-bond")]
    Brick,
    Hilbert,
}

impl Pattern {
    /// Get all available patterns.
    pub fn all() -> &'static [Pattern] {
        &[
            Pattern::Lines,
            Pattern::Crosshatch,
            Pattern::Concentric,
            Pattern::Wiggle,
            Pattern::Zigzag,
            Pattern::Spiral,
            Pattern::Honeycomb,
            Pattern::Gyroid,
            Pattern::Radial,
            Pattern::Brick,
            Pattern::Hilbert,
        ]
    }

    /// Get pattern name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Lines => "lines",
            Pattern::Crosshatch => "crosshatch",
            Pattern::Concentric => "concentric",
            Pattern::Wiggle => "wiggle",
            Pattern::Zigzag => "zigzag",
            Pattern::Spiral => "spiral",
            Pattern::Honeycomb => "honeycomb",
            Pattern::Gyroid => "gyroid",
            Pattern::Radial => "radial",
            Pattern::Brick => "brick",
            Pattern::Hilbert => "hilbert",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Pattern::Lines => "Parallel lines at angle",
            Pattern::Crosshatch => "Two perpendicular line families",
            Pattern::Concentric => "Inward offset rings, linked",
            Pattern::Wiggle => "Sine waves along hatch lines",
            Pattern::Zigzag => "Triangle waves along hatch lines",
            Pattern::Spiral => "Archimedean spiral from the centroid",
            Pattern::Honeycomb => "Hexagonal grid",
            Pattern::Gyroid => "Slices of the gyroid minimal surface",
            Pattern::Radial => "Rays from the centre (spacing in degrees)",
            Pattern::Brick => "Running bond brickwork",
            Pattern::Hilbert => "Hilbert space-filling curve",
        }
    }

    /// Patterns slow enough that a batch should hold a single shape.
    pub fn is_expensive(&self) -> bool {
        matches!(
            self,
            Pattern::Gyroid | Pattern::Honeycomb | Pattern::Hilbert | Pattern::Concentric
        )
    }

    /// Parse pattern from string.
    pub fn from_name(name: &str) -> Result<Pattern, ParamsError> {
        match name.to_lowercase().as_str() {
            "lines" | "hatch" => Ok(Pattern::Lines),
            "crosshatch" | "cross" => Ok(Pattern::Crosshatch),
            "concentric" | "rings" => Ok(Pattern::Concentric),
            "wiggle" | "sine" => Ok(Pattern::Wiggle),
            "zigzag" => Ok(Pattern::Zigzag),
            "spiral" => Ok(Pattern::Spiral),
            "honeycomb" | "hex" => Ok(Pattern::Honeycomb),
            "gyroid" => Ok(Pattern::Gyroid),
            "radial" | "rays" => Ok(Pattern::Radial),
            "brick" | "running-bond" => Ok(Pattern::Brick),
            "hilbert" => Ok(Pattern::Hilbert),
            _ => Err(ParamsError::UnknownPattern(name.to_string())),
        }
    }

    /// Generate pattern fill lines for a polygon.
    ///
    /// This is the main entry point for pattern generation. Crop and inset
    /// from `params` are applied first; a polygon that collapses under
    /// either yields no lines.
    pub fn generate(&self, polygon: &Polygon, params: &FillParams) -> Vec<Line> {
        let Some(prepared) = prepare_polygon(polygon, params) else {
            return Vec::new();
        };
        let polygon = &prepared;
        let spacing = params.spacing;
        let angle = params.angle;

        if !(spacing.is_finite() && spacing > 0.0) || !angle.is_finite() {
            return Vec::new();
        }

        match self {
            Pattern::Lines if params.cross_hatch => generate_crosshatch_fill(polygon, spacing, angle),
            Pattern::Lines => generate_lines_fill(polygon, spacing, angle),
            Pattern::Crosshatch => generate_crosshatch_fill(polygon, spacing, angle),
            Pattern::Concentric => generate_concentric_fill(polygon, spacing),
            Pattern::Wiggle => generate_wiggle_fill(
                polygon,
                spacing,
                angle,
                params.wiggle_amplitude,
                params.wiggle_frequency,
                Waveform::Sine,
            ),
            Pattern::Zigzag => generate_wiggle_fill(
                polygon,
                spacing,
                angle,
                params.wiggle_amplitude,
                params.wiggle_frequency,
                Waveform::Triangle,
            ),
            Pattern::Spiral => {
                let centre = if params.single_spiral {
                    params.scene_bounds.map(|b| b.center())
                } else {
                    None
                };
                generate_spiral_fill(polygon, spacing, angle, centre, params.spiral_over_diameter)
            }
            Pattern::Honeycomb => generate_honeycomb_fill(polygon, spacing, angle),
            Pattern::Gyroid => generate_gyroid_fill(polygon, spacing, angle),
            Pattern::Radial => generate_radial_fill(polygon, spacing, angle),
            Pattern::Brick => generate_brick_fill(polygon, spacing, angle),
            Pattern::Hilbert => {
                let frame = if params.single_hilbert { params.scene_bounds } else { None };
                generate_hilbert_fill(polygon, spacing, angle, frame)
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::from_name(s)
    }
}

/// Apply crop then inset. `None` when nothing fillable is left.
pub fn prepare_polygon(polygon: &Polygon, params: &FillParams) -> Option<Polygon> {
    if !polygon.is_valid() {
        return None;
    }

    let cropped = match (params.crop, params.scene_bounds) {
        (true, Some(bounds)) => crop_polygon(polygon, &bounds, params.crop_inset)?,
        _ => polygon.clone(),
    };

    if params.inset > 0.0 {
        inset_polygon(&cropped, params.inset)
    } else {
        Some(cropped)
    }
}

/// Clip a polygon to a rectangle shrunk by `crop_inset` on every side.
pub fn crop_polygon(polygon: &Polygon, rect: &Rect, crop_inset: f64) -> Option<Polygon> {
    let rect = if crop_inset > 0.0 { rect.inset(crop_inset)? } else { *rect };
    rect.clip_polygon_with_holes(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn names_round_trip() {
        for pattern in Pattern::all() {
            assert_eq!(Pattern::from_name(pattern.name()), Ok(*pattern));
        }
        assert!(Pattern::from_name("plaid").is_err());
    }

    #[test]
    fn every_pattern_fills_a_square() {
        let poly = square(60.0);
        for pattern in Pattern::all() {
            let params = FillParams::new(*pattern, 5.0, 30.0);
            let lines = pattern.generate(&poly, &params);
            assert!(!lines.is_empty(), "{} produced nothing", pattern);
        }
    }

    #[test]
    fn invalid_polygon_is_empty() {
        let poly = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        for pattern in Pattern::all() {
            let params = FillParams::new(*pattern, 1.0, 0.0);
            assert!(pattern.generate(&poly, &params).is_empty());
        }
    }

    #[test]
    fn inset_collapse_is_empty() {
        let mut params = FillParams::new(Pattern::Lines, 1.0, 0.0);
        params.inset = 6.0;
        assert!(Pattern::Lines.generate(&square(10.0), &params).is_empty());
    }

    #[test]
    fn inset_keeps_lines_off_the_edge() {
        let mut params = FillParams::new(Pattern::Lines, 1.0, 0.0);
        params.inset = 2.0;
        for line in Pattern::Lines.generate(&square(20.0), &params) {
            assert!(line.x1.min(line.x2) >= 2.0 - 1e-9);
            assert!(line.x1.max(line.x2) <= 18.0 + 1e-9);
            assert!(line.y1 >= 2.0 && line.y1 <= 18.0);
        }
    }

    #[test]
    fn crop_limits_output() {
        let mut params = FillParams::new(Pattern::Lines, 2.0, 0.0);
        params.crop = true;
        params.crop_inset = 5.0;
        params.scene_bounds = Some(Rect::new(0.0, 0.0, 50.0, 50.0));
        let lines = Pattern::Lines.generate(&square(100.0), &params);
        assert!(!lines.is_empty());
        for line in &lines {
            for x in [line.x1, line.x2] {
                assert!((5.0 - 1e-9..=45.0 + 1e-9).contains(&x));
            }
        }
    }

    #[test]
    fn cross_hatch_flag_doubles_lines() {
        let poly = square(50.0);
        let plain = FillParams::new(Pattern::Lines, 5.0, 0.0);
        let mut crossed = plain.clone();
        crossed.cross_hatch = true;
        assert_eq!(
            Pattern::Lines.generate(&poly, &crossed).len(),
            Pattern::Lines.generate(&poly, &plain).len() * 2
        );
    }

    #[test]
    fn expensive_patterns() {
        assert!(Pattern::Gyroid.is_expensive());
        assert!(Pattern::Concentric.is_expensive());
        assert!(!Pattern::Lines.is_expensive());
        assert!(!Pattern::Spiral.is_expensive());
    }
}
