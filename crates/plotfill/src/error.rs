//! Error types for the boundaries of the kernel.
//!
//! Geometry itself never fails: degenerate input yields empty output. Errors
//! only exist where a caller hands us text to interpret (SVG documents,
//! parameter names) or a parameter set that cannot produce anything.

use thiserror::Error;

/// Error type for SVG document loading.
#[derive(Error, Debug)]
pub enum SvgError {
    /// The document could not be parsed at all.
    #[error("SVG parse error: {0}")]
    ParseError(String),

    /// The document parsed but contained nothing fillable.
    #[error("No polygons found in SVG")]
    NoPolygons,
}

/// Error type for fill parameter validation and name lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("unknown fill rule: {0} (expected 'nonzero' or 'evenodd')")]
    UnknownFillRule(String),

    #[error("unknown hole mode: {0} (expected 'suppress', 'independent' or 'nested')")]
    UnknownHoleMode(String),

    #[error("unknown order strategy: {0}")]
    UnknownOrderStrategy(String),
}
