//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `fill` - Generate pattern fills for SVG shapes
//! - `simplify` - Re-chain and simplify previously generated strokes
//! - `patterns` - List available patterns

pub mod common;
pub mod config;
pub mod fill;
pub mod simplify;

use plotfill::Pattern;

pub use fill::cmd_fill;
pub use simplify::cmd_simplify;

pub fn cmd_patterns() {
    println!("Available patterns:");
    for pattern in Pattern::all() {
        let cost = if pattern.is_expensive() { " (slow)" } else { "" };
        println!("  {:12} {}{}", pattern.name(), pattern.description(), cost);
    }
}
