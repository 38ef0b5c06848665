//! Fill command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use plotfill::{
    load_shapes, optimize_order_by_color, simplify, to_compound_path, FillJob, HoleMode, Line,
    LineGroup, OrderResult, OrderStrategy, Pattern, PolygonCache,
};

use super::common::{ordered_to_svg, output_viewbox, read_input, write_output, OutputFormat};
use super::config::FillConfig;

/// One shape's strokes in JSON output.
#[derive(Serialize)]
struct JsonShape {
    path_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    /// Compound path data for the shape
    d: String,
    lines: Vec<Line>,
}

#[derive(Serialize)]
struct JsonOutput {
    pattern: Pattern,
    spacing: f64,
    angle: f64,
    order: OrderStrategy,
    travel_before: f64,
    travel_after: f64,
    line_count: usize,
    shapes: Vec<JsonShape>,
}

/// Parsed `fill` arguments. Flags left unset fall back to the config file.
#[derive(Default)]
struct FillArgs {
    input: Option<String>,
    output: Option<String>,
    config: Option<String>,
    pattern: Option<String>,
    spacing: Option<f64>,
    angle: Option<f64>,
    inset: Option<f64>,
    simplify: Option<f64>,
    order: Option<String>,
    hole_mode: Option<String>,
    cross_hatch: bool,
    format: Option<OutputFormat>,
    sequential: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<FillArgs> {
    let mut parsed = FillArgs::default();
    let mut i = 0;

    // Value of the flag at args[i], advancing past it
    fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
        *i += 1;
        match args.get(*i) {
            Some(v) => Ok(v.as_str()),
            None => bail!("{} needs a value", flag),
        }
    }
    fn number(args: &[String], i: &mut usize, flag: &str) -> Result<f64> {
        let raw = value(args, i, flag)?;
        raw.parse().with_context(|| format!("{} expects a number, got '{}'", flag, raw))
    }

    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--pattern" => parsed.pattern = Some(value(args, &mut i, "--pattern")?.to_string()),
            "-o" | "--output" => parsed.output = Some(value(args, &mut i, "--output")?.to_string()),
            "-c" | "--config" => parsed.config = Some(value(args, &mut i, "--config")?.to_string()),
            "-s" | "--spacing" => parsed.spacing = Some(number(args, &mut i, "--spacing")?),
            "-a" | "--angle" => parsed.angle = Some(number(args, &mut i, "--angle")?),
            "--inset" => parsed.inset = Some(number(args, &mut i, "--inset")?),
            "--simplify" => parsed.simplify = Some(number(args, &mut i, "--simplify")?),
            "--order" => parsed.order = Some(value(args, &mut i, "--order")?.to_string()),
            "--hole-mode" => parsed.hole_mode = Some(value(args, &mut i, "--hole-mode")?.to_string()),
            "--cross-hatch" => parsed.cross_hatch = true,
            "--sequential" => parsed.sequential = true,
            "--json" => parsed.format = Some(OutputFormat::Json),
            "-f" | "--format" => {
                let raw = value(args, &mut i, "--format")?;
                match OutputFormat::from_name(raw) {
                    Some(format) => parsed.format = Some(format),
                    None => bail!("unknown format: {}. Use 'svg' or 'json'.", raw),
                }
            }
            "-h" | "--help" => parsed.help = true,
            "-" if parsed.input.is_none() => parsed.input = Some("-".to_string()),
            path if !path.starts_with('-') && parsed.input.is_none() => {
                parsed.input = Some(path.to_string());
            }
            unknown => bail!("unknown option: {}", unknown),
        }
        i += 1;
    }

    Ok(parsed)
}

/// Execute the fill command.
pub fn cmd_fill(args: &[String]) -> Result<()> {
    let args = parse_args(args)?;
    if args.help {
        print_usage();
        return Ok(());
    }
    let Some(input) = args.input.as_deref() else {
        print_usage();
        bail!("SVG file required (use '-' for stdin)");
    };

    // Config file first, then flags on top
    let mut config = match args.config.as_deref() {
        Some(path) => FillConfig::load(Path::new(path))?,
        None => FillConfig::default(),
    };
    let params = &mut config.params;
    if let Some(name) = args.pattern.as_deref() {
        params.pattern =
            Pattern::from_name(name).context("use 'plotfill patterns' to list available patterns")?;
    }
    if let Some(spacing) = args.spacing {
        params.spacing = spacing;
    }
    if let Some(angle) = args.angle {
        params.angle = angle;
    }
    if let Some(inset) = args.inset {
        params.inset = inset;
    }
    if let Some(mode) = args.hole_mode.as_deref() {
        params.hole_mode = HoleMode::from_name(mode)?;
    }
    if args.cross_hatch {
        params.cross_hatch = true;
    }
    if let Some(tolerance) = args.simplify {
        config.simplify = Some(tolerance);
    }
    if let Some(order) = args.order.as_deref() {
        config.order = OrderStrategy::from_name(order)?;
    }
    config.params.validate()?;

    let svg_content = read_input(input)?;
    let shapes = load_shapes(&svg_content).context("failed to load SVG")?;

    let cache = PolygonCache::from_source_shapes(&shapes, config.params.hole_mode);
    if config.params.scene_bounds.is_none() {
        config.params.scene_bounds = cache.scene_bounds();
    }
    let with_holes = cache
        .jobs()
        .iter()
        .flat_map(|j| &j.polygons)
        .filter(|p| !p.holes.is_empty())
        .count();
    tracing::info!(
        shapes = shapes.len(),
        polygons = cache.polygon_count(),
        with_holes,
        "loaded shapes"
    );

    let start = Instant::now();
    let pattern = config.params.pattern;
    let outcome = FillJob::new(config.params.clone())
        .parallel(!args.sequential)
        .on_progress(|pct| tracing::debug!(pct = format_args!("{:.0}", pct), "filling"))
        .run(cache.jobs());
    let Some(report) = outcome.into_report() else {
        bail!("fill cancelled");
    };
    if !report.failed.is_empty() {
        tracing::warn!(failed = ?report.failed, "some shapes produced no fill");
    }

    let mut groups = report.stack.to_groups();
    let generated: usize = groups.iter().map(|g| g.lines.len()).sum();
    if let Some(tolerance) = config.simplify {
        for group in &mut groups {
            group.lines = simplify(&group.lines, tolerance);
        }
    }

    let result = order_groups(&groups, config.order, &config.color_order);
    tracing::info!(
        %pattern,
        generated,
        lines = result.ordered_lines.len(),
        travel_before = format_args!("{:.1}", result.travel_before),
        travel_after = format_args!("{:.1}", result.travel_after),
        elapsed = ?start.elapsed(),
        "fill complete"
    );

    let output = match args.format.unwrap_or(OutputFormat::Svg) {
        OutputFormat::Svg => {
            ordered_to_svg(&result.ordered_lines, &output_viewbox(&svg_content, config.params.scene_bounds))
        }
        OutputFormat::Json => {
            let json = JsonOutput {
                pattern,
                spacing: config.params.spacing,
                angle: config.params.angle,
                order: config.order,
                travel_before: result.travel_before,
                travel_after: result.travel_after,
                line_count: result.ordered_lines.len(),
                shapes: json_shapes(&result),
            };
            serde_json::to_string(&json).context("failed to serialize JSON")?
        }
    };

    write_output(args.output.as_deref(), &output)
}

/// Run an order strategy; only `color` looks at the configured colour sequence.
pub fn order_groups(groups: &[LineGroup], strategy: OrderStrategy, color_order: &[String]) -> OrderResult {
    match strategy {
        OrderStrategy::Color => optimize_order_by_color(groups, color_order),
        other => other.apply(groups),
    }
}

/// Consecutive lines of one shape form one JSON entry.
fn json_shapes(result: &OrderResult) -> Vec<JsonShape> {
    result
        .ordered_lines
        .chunk_by(|a, b| a.path_id == b.path_id)
        .map(|run| {
            let lines: Vec<Line> = run.iter().map(|l| l.line).collect();
            JsonShape {
                path_id: run[0].path_id.clone(),
                color: run[0].color.clone(),
                d: to_compound_path(&lines).trim_end().to_string(),
                lines,
            }
        })
        .collect()
}

fn print_usage() {
    eprintln!("Usage: plotfill fill <input.svg|-> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>     Output file (default: stdout)");
    eprintln!("  -c, --config <file>     YAML or JSON fill config; flags override it");
    eprintln!("  -p, --pattern <name>    Pattern name (default: lines)");
    eprintln!("  -s, --spacing <n>       Line spacing (default: 2.5)");
    eprintln!("  -a, --angle <deg>       Pattern angle (default: 45)");
    eprintln!("  --inset <n>             Keep fill this far inside each shape");
    eprintln!("  --cross-hatch           Add a second family at +90° (lines)");
    eprintln!("  --hole-mode <mode>      suppress, independent or nested (default: suppress)");
    eprintln!("  --simplify <tol>        Chain and simplify strokes with this tolerance");
    eprintln!("  --order <strategy>      document, nearest, chunked or color (default: nearest)");
    eprintln!("  -f, --format <fmt>      Output format: svg, json (default: svg)");
    eprintln!("  --json                  Same as --format json");
    eprintln!("  --sequential            Fill shapes on one thread");
    eprintln!();
    eprintln!("Use '-' as input to read from stdin");
}
