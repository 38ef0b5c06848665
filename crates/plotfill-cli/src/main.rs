//! plotfill - fill SVG shapes with plotter-ready line patterns
//!
//! Usage:
//!   plotfill fill <svg|-> -p <pattern>   Generate pattern fill
//!   plotfill simplify <svg> -t <tol>     Re-chain and simplify stroke output
//!   plotfill patterns                    List available patterns
//!
//! Logging goes to stderr; set `RUST_LOG` (default `info`) for more or less.

mod cli;

use std::env;
use std::process::ExitCode;

/// Install the stderr subscriber. `RUST_LOG` overrides the `info` default.
fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("plotfill");

    let result = match args.get(1).map(String::as_str) {
        Some("fill") => cli::cmd_fill(&args[2..]),
        Some("simplify") => cli::cmd_simplify(&args[2..]),
        Some("patterns") => {
            cli::cmd_patterns();
            Ok(())
        }
        Some("help" | "--help" | "-h") => {
            print_usage(prog);
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage(prog);
            return ExitCode::from(2);
        }
        None => {
            print_usage(prog);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("plotfill - fill patterns and pen paths for SVG shapes");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} fill <svg> -p <pattern> [options]", prog);
    eprintln!("  {} simplify <svg> -t <tolerance> [options]", prog);
    eprintln!("  {} patterns", prog);
    eprintln!();
    eprintln!("Run '{} fill --help' or '{} simplify --help' for options.", prog, prog);
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as input file to read SVG from stdin:");
    eprintln!("  echo '<svg>...</svg>' | {} fill - -p lines -o -", prog);
}
