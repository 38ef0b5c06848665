//! Simplify command: re-chain and thin previously generated strokes.

use anyhow::{bail, Context, Result};

use plotfill::simplify::{chain_lines, ChainConfig, ChainStats};
use plotfill::svg::load_stroke_groups;
use plotfill::{simplify, OrderStrategy};

use super::common::{ordered_to_svg, output_viewbox, read_input, write_output};
use super::fill::order_groups;

/// Execute the simplify command.
pub fn cmd_simplify(args: &[String]) -> Result<()> {
    let mut input: Option<&str> = None;
    let mut output: Option<&str> = None;
    let mut tolerance: Option<f64> = None;
    let mut strategy = OrderStrategy::Document;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-t" | "--tolerance" => {
                i += 1;
                let Some(raw) = args.get(i) else {
                    bail!("--tolerance needs a value");
                };
                tolerance = Some(
                    raw.parse()
                        .with_context(|| format!("--tolerance expects a number, got '{}'", raw))?,
                );
            }
            "-o" | "--output" => {
                i += 1;
                output = args.get(i).map(String::as_str);
            }
            "--order" => {
                i += 1;
                let Some(raw) = args.get(i) else {
                    bail!("--order needs a value");
                };
                strategy = OrderStrategy::from_name(raw)?;
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            arg if input.is_none() && (arg == "-" || !arg.starts_with('-')) => input = Some(arg),
            unknown => bail!("unknown option: {}", unknown),
        }
        i += 1;
    }

    let Some(input) = input else {
        print_usage();
        bail!("SVG file required (use '-' for stdin)");
    };
    let Some(tolerance) = tolerance else {
        bail!("--tolerance is required");
    };
    if !tolerance.is_finite() || tolerance < 0.0 {
        bail!("tolerance must be a non-negative number, got {}", tolerance);
    }

    let svg_content = read_input(input)?;
    let mut groups = load_stroke_groups(&svg_content).context("failed to load SVG")?;
    let before: usize = groups.iter().map(|g| g.lines.len()).sum();

    let chain_config = ChainConfig::default();
    for group in &mut groups {
        let stats = ChainStats::from_chains(group.lines.len(), &chain_lines(&group.lines, &chain_config));
        tracing::debug!(
            path = %group.path_id,
            chains = stats.output_chains,
            longest = stats.max_chain_length,
            "chained"
        );
        group.lines = simplify(&group.lines, tolerance);
    }
    let after: usize = groups.iter().map(|g| g.lines.len()).sum();

    let result = order_groups(&groups, strategy, &[]);
    tracing::info!(
        paths = groups.len(),
        before,
        after,
        tolerance,
        order = %strategy,
        "simplified"
    );

    let svg = ordered_to_svg(&result.ordered_lines, &output_viewbox(&svg_content, None));
    write_output(output, &svg)
}

fn print_usage() {
    eprintln!("Usage: plotfill simplify <input.svg|-> -t <tolerance> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --tolerance <n>     RDP tolerance (required; 0 only re-chains)");
    eprintln!("  -o, --output <file>     Output file (default: stdout)");
    eprintln!("  --order <strategy>      document, nearest, chunked or color (default: document)");
}
