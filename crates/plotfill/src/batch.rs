//! Whole-document fill jobs: batching, progress and cancellation.
//!
//! A document can hold thousands of shapes and some patterns are slow, so a
//! job walks the shapes in small batches. After each batch it reports
//! progress and checks a cancel flag; a host UI stays responsive without
//! timers or threads of its own.
//!
//! ## Rust Lesson #14: Shared Flags
//!
//! `Arc<AtomicBool>` is the smallest thread-safe "stop" button: cloning the
//! `Arc` hands another thread a handle to the same flag, and the atomic lets
//! both sides read and write it without a lock.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::analyze::analyze_subpaths;
use crate::clip::Rect;
use crate::extract::Shape;
use crate::geometry::{Line, Polygon};
use crate::params::{FillParams, FillRule, HoleMode};
use crate::serialize::{FillLayer, FillStack};
use crate::svg::SourceShape;

/// Shapes per batch for cheap patterns.
pub const BATCH_SIZE: usize = 5;
/// Shapes per batch for patterns where `Pattern::is_expensive` holds.
pub const EXPENSIVE_BATCH_SIZE: usize = 1;

/// Cooperative cancellation flag shared between a job and its host.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The polygons of one source shape, ready to fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeJob {
    pub path_id: String,
    pub color: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl ShapeJob {
    pub fn new(path_id: impl Into<String>, color: Option<String>, polygons: Vec<Polygon>) -> Self {
        Self { path_id: path_id.into(), color, polygons }
    }

    /// Extract and analyze a shape descriptor.
    pub fn from_shape(shape: &Shape, mode: HoleMode, rule: FillRule) -> Self {
        let polygons = analyze_subpaths(&shape.subpaths(), mode, rule);
        Self::new(shape.id.clone(), shape.color.clone(), polygons)
    }

    /// Analyze a shape loaded from a document, honouring its own fill rule.
    pub fn from_source(shape: &SourceShape, mode: HoleMode) -> Self {
        let polygons = analyze_subpaths(&shape.subpaths, mode, shape.fill_rule);
        Self::new(shape.id.clone(), shape.color.clone(), polygons)
    }
}

/// Analyzed polygons kept between fills.
///
/// Extraction and hole analysis depend only on the shapes and the hole
/// mode, not on the pattern. A host builds this once, then runs as many
/// fills over it as it likes (new pattern, new angle) without re-analyzing.
#[derive(Debug, Clone, Default)]
pub struct PolygonCache {
    jobs: Vec<ShapeJob>,
    hole_mode: HoleMode,
}

impl PolygonCache {
    pub fn from_shapes(shapes: &[Shape], mode: HoleMode, rule: FillRule) -> Self {
        Self {
            jobs: shapes.iter().map(|s| ShapeJob::from_shape(s, mode, rule)).collect(),
            hole_mode: mode,
        }
    }

    pub fn from_source_shapes(shapes: &[SourceShape], mode: HoleMode) -> Self {
        Self {
            jobs: shapes.iter().map(|s| ShapeJob::from_source(s, mode)).collect(),
            hole_mode: mode,
        }
    }

    pub fn jobs(&self) -> &[ShapeJob] {
        &self.jobs
    }

    pub fn hole_mode(&self) -> HoleMode {
        self.hole_mode
    }

    pub fn polygon_count(&self) -> usize {
        self.jobs.iter().map(|j| j.polygons.len()).sum()
    }

    /// Bounds of every outer ring; the frame for single-curve modes and crop.
    pub fn scene_bounds(&self) -> Option<Rect> {
        self.jobs
            .iter()
            .flat_map(|j| &j.polygons)
            .filter_map(|p| p.bounding_box().map(Rect::from_bounds))
            .reduce(|a, b| a.union(&b))
    }
}

/// Result of a finished job.
#[derive(Debug, Clone, Default)]
pub struct FillReport {
    /// One layer per shape, in input order
    pub stack: FillStack,
    /// Ids of shapes whose generation failed
    pub failed: Vec<String>,
}

/// How a job ended.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(FillReport),
    /// Partial results are discarded
    Cancelled,
}

impl JobOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, JobOutcome::Cancelled)
    }

    pub fn into_report(self) -> Option<FillReport> {
        match self {
            JobOutcome::Completed(report) => Some(report),
            JobOutcome::Cancelled => None,
        }
    }
}

/// A whole-document fill request.
///
/// ```ignore
/// let outcome = FillJob::new(params)
///     .parallel(true)
///     .with_cancel(token.clone())
///     .on_progress(|pct| tracing::info!(pct, "filling"))
///     .run(cache.jobs());
/// ```
pub struct FillJob<'a> {
    params: FillParams,
    parallel: bool,
    cancel: Option<CancelToken>,
    progress: Option<Box<dyn FnMut(f64) + 'a>>,
}

impl<'a> FillJob<'a> {
    pub fn new(params: FillParams) -> Self {
        Self { params, parallel: false, cancel: None, progress: None }
    }

    /// Fill the shapes of one batch on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Called after every batch with the percentage of shapes processed.
    pub fn on_progress(mut self, callback: impl FnMut(f64) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn batch_size(&self) -> usize {
        if self.params.pattern.is_expensive() {
            EXPENSIVE_BATCH_SIZE
        } else {
            BATCH_SIZE
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn run(mut self, shapes: &[ShapeJob]) -> JobOutcome {
        if self.cancelled() {
            return JobOutcome::Cancelled;
        }

        let total = shapes.len();
        let batch_size = self.batch_size();
        let params = &self.params;

        let mut report = FillReport::default();
        let mut processed = 0;

        for batch in shapes.chunks(batch_size) {
            let results: Vec<Option<Vec<Line>>> = if self.parallel {
                batch.par_iter().map(|shape| fill_shape(shape, params)).collect()
            } else {
                batch.iter().map(|shape| fill_shape(shape, params)).collect()
            };

            for (shape, result) in batch.iter().zip(results) {
                let lines = match result {
                    Some(lines) => lines,
                    None => {
                        report.failed.push(shape.path_id.clone());
                        Vec::new()
                    }
                };
                report
                    .stack
                    .push(FillLayer::new(shape.path_id.clone(), shape.color.clone(), lines));
            }

            processed += batch.len();
            if let Some(progress) = self.progress.as_mut() {
                progress(processed as f64 / total as f64 * 100.0);
            }
            if self.cancelled() {
                tracing::info!(processed, total, "fill cancelled");
                return JobOutcome::Cancelled;
            }
        }

        tracing::info!(
            pattern = %self.params.pattern,
            shapes = total,
            lines = report.stack.line_count(),
            failed = report.failed.len(),
            "fill complete"
        );
        JobOutcome::Completed(report)
    }
}

/// Fill every polygon of one shape; `None` if generation panicked.
fn fill_shape(shape: &ShapeJob, params: &FillParams) -> Option<Vec<Line>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        shape
            .polygons
            .iter()
            .flat_map(|polygon| params.pattern.generate(polygon, params))
            .collect::<Vec<Line>>()
    }));

    match result {
        Ok(lines) => {
            tracing::debug!(path_id = %shape.path_id, lines = lines.len(), "filled shape");
            Some(lines)
        }
        Err(_) => {
            tracing::warn!(path_id = %shape.path_id, "pattern generation panicked; shape skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ShapeDescriptor;
    use crate::geometry::Point;
    use crate::patterns::Pattern;

    fn square_job(id: &str, x: f64) -> ShapeJob {
        ShapeJob::new(
            id,
            Some("#000000".into()),
            vec![Polygon::new(vec![
                Point::new(x, 0.0),
                Point::new(x + 20.0, 0.0),
                Point::new(x + 20.0, 20.0),
                Point::new(x, 20.0),
            ])],
        )
    }

    fn jobs(n: usize) -> Vec<ShapeJob> {
        (0..n).map(|i| square_job(&format!("s{i}"), i as f64 * 30.0)).collect()
    }

    #[test]
    fn completes_in_input_order() {
        let shapes = jobs(7);
        let outcome = FillJob::new(FillParams::new(Pattern::Lines, 2.0, 0.0)).run(&shapes);
        let report = outcome.into_report().unwrap();
        let ids: Vec<&str> = report.stack.layers().iter().map(|l| l.path_id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1", "s2", "s3", "s4", "s5", "s6"]);
        assert!(report.failed.is_empty());
        assert!(report.stack.layers().iter().all(|l| l.lines.len() == 10));
    }

    #[test]
    fn parallel_matches_sequential() {
        let shapes = jobs(12);
        let params = FillParams::new(Pattern::Crosshatch, 3.0, 30.0);
        let seq = FillJob::new(params.clone()).run(&shapes).into_report().unwrap();
        let par = FillJob::new(params).parallel(true).run(&shapes).into_report().unwrap();
        assert_eq!(seq.stack.layers(), par.stack.layers());
    }

    #[test]
    fn progress_per_batch() {
        let shapes = jobs(12);
        let mut seen = Vec::new();
        let outcome = FillJob::new(FillParams::new(Pattern::Lines, 2.0, 0.0))
            .on_progress(|pct| seen.push(pct))
            .run(&shapes);
        assert!(!outcome.is_cancelled());
        assert_eq!(seen, vec![5.0 / 12.0 * 100.0, 10.0 / 12.0 * 100.0, 100.0]);
    }

    #[test]
    fn expensive_patterns_use_single_shape_batches() {
        assert_eq!(FillJob::new(FillParams::new(Pattern::Gyroid, 2.0, 0.0)).batch_size(), 1);
        assert_eq!(FillJob::new(FillParams::new(Pattern::Lines, 2.0, 0.0)).batch_size(), 5);
    }

    #[test]
    fn cancel_after_first_batch() {
        let shapes = jobs(12);
        let token = CancelToken::new();
        let handle = token.clone();
        let mut calls = 0;
        let outcome = FillJob::new(FillParams::new(Pattern::Lines, 2.0, 0.0))
            .with_cancel(token)
            .on_progress(|_| {
                calls += 1;
                handle.cancel();
            })
            .run(&shapes);
        assert!(outcome.is_cancelled());
        assert_eq!(calls, 1);
    }

    #[test]
    fn cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let outcome = FillJob::new(FillParams::default()).with_cancel(token).run(&jobs(3));
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn cache_survives_repeated_fills() {
        let shapes = vec![
            Shape::new("a", ShapeDescriptor::Rect { x: 0.0, y: 0.0, width: 50.0, height: 50.0, rx: 0.0, ry: 0.0 }),
            Shape::new("b", ShapeDescriptor::Circle { cx: 100.0, cy: 25.0, r: 20.0 }),
        ];
        let cache = PolygonCache::from_shapes(&shapes, HoleMode::Suppress, FillRule::NonZero);
        assert_eq!(cache.polygon_count(), 2);

        let bounds = cache.scene_bounds().unwrap();
        assert!((bounds.min_x - 0.0).abs() < 1e-9 && (bounds.max_x - 120.0).abs() < 0.01);

        for angle in [0.0, 45.0, 90.0] {
            let report = FillJob::new(FillParams::new(Pattern::Lines, 5.0, angle))
                .run(cache.jobs())
                .into_report()
                .unwrap();
            assert_eq!(report.stack.len(), 2);
            assert!(report.stack.line_count() > 0);
        }
        assert_eq!(cache.jobs().len(), 2);
    }
}
