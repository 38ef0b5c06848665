//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

use plotfill::{to_compound_path, Line, OrderedLine, Rect};

/// Output format for generated lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.to_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Stroke width written on every output group.
pub const STROKE_WIDTH: f64 = 0.5;

/// Read an SVG document from a path, or stdin for `-`.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        tracing::info!("reading SVG from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read SVG from stdin")?;
        Ok(buffer)
    } else {
        tracing::info!(path, "loading SVG");
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
    }
}

/// Write to a file, or stdout for `-` / no path.
pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some("-") | None => {
            println!("{}", content);
        }
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path))?;
            tracing::info!(path, "wrote output");
        }
    }
    Ok(())
}

/// Extract viewBox from SVG content.
pub fn extract_viewbox(svg: &str) -> Option<String> {
    for key in ["viewBox=\"", "viewbox=\""] {
        if let Some(start) = svg.find(key) {
            let rest = &svg[start + key.len()..];
            if let Some(end) = rest.find('"') {
                return Some(rest[..end].to_string());
            }
        }
    }
    None
}

/// viewBox from the source document, else the fill bounds, else a default.
pub fn output_viewbox(original_svg: &str, bounds: Option<Rect>) -> String {
    extract_viewbox(original_svg)
        .or_else(|| bounds.map(|b| format!("{} {} {} {}", b.min_x, b.min_y, b.width(), b.height())))
        .unwrap_or_else(|| "0 0 1000 1000".to_string())
}

/// Escape a value for use inside a double-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write ordered lines as an SVG document, one `<g>` per colour.
///
/// Colours appear in first-seen order. Inside a colour, each run of
/// consecutive lines from the same shape becomes one compound `<path>`, so
/// drawing order within a colour is preserved.
pub fn ordered_to_svg(lines: &[OrderedLine], viewbox: &str) -> String {
    let mut colors: Vec<Option<&str>> = Vec::new();
    for line in lines {
        let color = line.color.as_deref();
        if !colors.contains(&color) {
            colors.push(color);
        }
    }

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">
"#,
        escape_attr(viewbox)
    ));

    for (index, color) in colors.iter().enumerate() {
        svg.push_str(&format!(
            r#"<g id="fill-{}" stroke="{}" stroke-width="{}" fill="none" stroke-linecap="round">
"#,
            index,
            escape_attr(color.unwrap_or("black")),
            STROKE_WIDTH
        ));

        let in_color: Vec<&OrderedLine> = lines.iter().filter(|l| l.color.as_deref() == *color).collect();
        for run in in_color.chunk_by(|a, b| a.path_id == b.path_id) {
            let segments: Vec<Line> = run.iter().map(|l| l.line).collect();
            svg.push_str(&format!(
                "  <path data-source=\"{}\" d=\"{}\"/>\n",
                escape_attr(&run[0].path_id),
                to_compound_path(&segments).trim_end()
            ));
        }

        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}
