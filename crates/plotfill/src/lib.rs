//! # plotfill
//!
//! Fill-pattern and pen-path geometry for plotters and cutters.
//!
//! Shapes go in, pen strokes come out:
//!
//! ```text
//! Shape -> extract -> analyze -> patterns (clip / offset) -> simplify -> order -> serialize
//! ```
//!
//! Every stage is a pure function over plain values. Hosts that fill whole
//! documents use [`batch::FillJob`] for progress and cancellation.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod analyze;
pub mod batch;
pub mod clip;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod hatch;
pub mod offset;
pub mod order;
pub mod params;
pub mod patterns;
pub mod serialize;
pub mod simplify;
pub mod svg;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use analyze::analyze_subpaths;
pub use batch::{CancelToken, FillJob, FillReport, JobOutcome, PolygonCache, ShapeJob};
pub use clip::{clip_line_to_polygon, clip_lines_to_polygon, point_in_polygon, Rect};
pub use error::{ParamsError, SvgError};
pub use extract::{Shape, ShapeDescriptor};
pub use geometry::{Line, Point, Polygon};
pub use order::{
    optimize_order, optimize_order_by_color, optimize_order_chunked, travel_distance, LineGroup,
    OrderResult, OrderStrategy, OrderedLine,
};
pub use params::{FillParams, FillRule, HoleMode};
pub use patterns::Pattern;
pub use serialize::{parse_compound_path, to_compound_path, FillLayer, FillStack};
pub use simplify::simplify;
pub use svg::{load_shapes, SourceShape};
pub use transform::Affine;

/// Flatten a shape and resolve its subpaths into fillable polygons.
pub fn extract_polygons(shape: &Shape, mode: HoleMode, rule: FillRule) -> Vec<Polygon> {
    analyze_subpaths(&shape.subpaths(), mode, rule)
}

/// Fill one polygon with the pattern named in `params`.
///
/// Every returned segment has its midpoint inside the polygon body.
pub fn generate_fill(polygon: &Polygon, params: &FillParams) -> Vec<Line> {
    params.pattern.generate(polygon, params)
}
