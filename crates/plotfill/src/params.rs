//! Fill parameters - the configuration value handed to every generator.
//!
//! A `FillParams` is built once per generation request (from CLI flags, a
//! YAML/JSON config file, or a host UI) and then only read. Nothing in the
//! kernel consults global configuration.

use serde::{Deserialize, Serialize};

use crate::clip::Rect;
use crate::error::ParamsError;
use crate::patterns::Pattern;

/// How overlapping subpaths of one compound path are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    /// A subpath cuts a hole only when it winds against its parent.
    #[default]
    NonZero,
    /// Every nesting level toggles filled / unfilled.
    EvenOdd,
}

impl FillRule {
    pub fn name(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }

    pub fn from_name(name: &str) -> Result<FillRule, ParamsError> {
        match name.to_lowercase().as_str() {
            "nonzero" | "non-zero" => Ok(FillRule::NonZero),
            "evenodd" | "even-odd" => Ok(FillRule::EvenOdd),
            _ => Err(ParamsError::UnknownFillRule(name.to_string())),
        }
    }
}

/// How subpaths nested inside other subpaths become holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleMode {
    /// Contained subpaths are holes; holes suppress fill.
    #[default]
    Suppress,
    /// Every subpath is filled on its own, nesting ignored.
    Independent,
    /// Every nesting level is its own polygon, with its direct children as holes.
    Nested,
}

impl HoleMode {
    pub fn name(&self) -> &'static str {
        match self {
            HoleMode::Suppress => "suppress",
            HoleMode::Independent => "independent",
            HoleMode::Nested => "nested",
        }
    }

    pub fn from_name(name: &str) -> Result<HoleMode, ParamsError> {
        match name.to_lowercase().as_str() {
            "suppress" | "holes" | "default" => Ok(HoleMode::Suppress),
            "independent" | "ignore" => Ok(HoleMode::Independent),
            "nested" | "nest" => Ok(HoleMode::Nested),
            _ => Err(ParamsError::UnknownHoleMode(name.to_string())),
        }
    }
}

/// Parameters for a single fill request.
///
/// Every field has a default so partial config files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillParams {
    /// Which generator to run
    pub pattern: Pattern,
    /// Distance between strokes (pattern specific meaning for radial/honeycomb)
    pub spacing: f64,
    /// Pattern rotation in degrees
    pub angle: f64,
    /// Add a second family at +90° (lines pattern)
    pub cross_hatch: bool,
    /// Keep fill at least this far from the shape boundary
    pub inset: f64,
    /// Perpendicular displacement of wiggle / zigzag strokes
    pub wiggle_amplitude: f64,
    /// Waves per unit length of wiggle / zigzag strokes
    pub wiggle_frequency: f64,
    /// Spiral reach as a multiple of the farthest vertex distance
    pub spiral_over_diameter: f64,
    /// One spiral centred on the whole scene instead of one per shape
    pub single_spiral: bool,
    /// One Hilbert curve laid over the whole scene instead of one per shape
    pub single_hilbert: bool,
    /// Crop shapes to `scene_bounds` before filling
    pub crop: bool,
    /// Shrink the crop rectangle by this much on every side
    pub crop_inset: f64,
    /// Extent of the whole document; used by single-curve modes and cropping
    pub scene_bounds: Option<Rect>,
    /// Compound path interpretation
    pub fill_rule: FillRule,
    /// Nesting policy for compound paths
    pub hole_mode: HoleMode,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            pattern: Pattern::Lines,
            spacing: 2.5,
            angle: 45.0,
            cross_hatch: false,
            inset: 0.0,
            wiggle_amplitude: 1.0,
            wiggle_frequency: 0.1,
            spiral_over_diameter: 1.5,
            single_spiral: false,
            single_hilbert: false,
            crop: false,
            crop_inset: 0.0,
            scene_bounds: None,
            fill_rule: FillRule::NonZero,
            hole_mode: HoleMode::Suppress,
        }
    }
}

impl FillParams {
    /// Parameters for a pattern with explicit spacing and angle, defaults elsewhere.
    pub fn new(pattern: Pattern, spacing: f64, angle: f64) -> Self {
        Self { pattern, spacing, angle, ..Self::default() }
    }

    /// Check that the numbers can drive a generator.
    ///
    /// Generators stay total even on bad input, but a host should refuse to
    /// start a job with parameters that can only produce nothing (or loop).
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(ParamsError::InvalidSpacing(self.spacing));
        }
        let finite = [
            ("angle", self.angle),
            ("inset", self.inset),
            ("wiggle_amplitude", self.wiggle_amplitude),
            ("wiggle_frequency", self.wiggle_frequency),
            ("spiral_over_diameter", self.spiral_over_diameter),
            ("crop_inset", self.crop_inset),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
        }
        Ok(())
    }
}
