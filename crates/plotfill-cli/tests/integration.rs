//! Integration tests for plotfill CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const SQUARE_WITH_HOLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <path id="frame" fill="#ff0000" d="M0 0 H100 V100 H0 Z M25 25 V75 H75 V25 Z"/>
  <rect id="dot" fill="#0000ff" x="110" y="0" width="20" height="20"/>
</svg>"##;

fn plotfill() -> Command {
    Command::new(env!("CARGO_BIN_EXE_plotfill"))
}

/// Write the test document into a fresh temp dir.
fn fixture() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.svg");
    fs::write(&path, SQUARE_WITH_HOLE).unwrap();
    (dir, path)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn patterns_command_lists_all_patterns() {
    let output = plotfill().arg("patterns").output().unwrap();
    assert!(output.status.success());

    let text = stdout(&output);
    for name in [
        "lines", "crosshatch", "wiggle", "zigzag", "spiral", "concentric", "honeycomb", "gyroid", "radial",
        "brick", "hilbert",
    ] {
        assert!(text.contains(name), "missing pattern {name}");
    }
    // Header plus one line per pattern
    assert_eq!(text.lines().count(), 12);
}

#[test]
fn fill_command_produces_svg() {
    let (_dir, svg) = fixture();
    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "-p", "lines", "-s", "5"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("<svg"));
    assert!(text.contains(r#"viewBox="0 0 100 100""#));
    assert!(text.contains(r##"stroke="#ff0000""##));
    assert!(text.contains(r##"stroke="#0000ff""##));
    assert!(text.contains(r#"data-source="frame""#));
}

#[test]
fn fill_command_writes_json_file() {
    let (dir, svg) = fixture();
    let out = dir.path().join("fill.json");
    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "-p", "crosshatch", "--json", "-o"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["pattern"], "crosshatch");
    assert!(json["line_count"].as_u64().unwrap() > 0);
    assert!(json["travel_after"].as_f64().unwrap() <= json["travel_before"].as_f64().unwrap() + 1e-9);

    let shapes = json["shapes"].as_array().unwrap();
    assert!(shapes.iter().any(|s| s["path_id"] == "frame"));
    assert!(shapes.iter().all(|s| s["d"].as_str().unwrap().starts_with('M')));
}

#[test]
fn fill_reads_stdin() {
    let mut child = plotfill()
        .args(["fill", "-", "-p", "concentric", "-s", "4"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(SQUARE_WITH_HOLE.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("<path"));
}

#[test]
fn fill_uses_yaml_config() {
    let (dir, svg) = fixture();
    let config = dir.path().join("fill.yaml");
    fs::write(&config, "pattern: brick\nspacing: 6\norder: color\ncolor_order: [\"#0000ff\", \"#ff0000\"]\n").unwrap();

    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "--json", "-c"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["pattern"], "brick");
    assert_eq!(json["spacing"], 6.0);
    assert_eq!(json["order"], "color");
    // Blue shapes are drawn first
    assert_eq!(json["shapes"][0]["color"], "#0000ff");
}

#[test]
fn flags_override_config() {
    let (dir, svg) = fixture();
    let config = dir.path().join("fill.json");
    fs::write(&config, r#"{"pattern": "brick", "spacing": 6}"#).unwrap();

    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "--json", "-p", "radial", "-c"])
        .arg(&config)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["pattern"], "radial");
    assert_eq!(json["spacing"], 6.0);
}

#[test]
fn unknown_pattern_fails() {
    let (_dir, svg) = fixture();
    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "-p", "plaid"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn bad_spacing_fails() {
    let (_dir, svg) = fixture();
    let output = plotfill()
        .args(["fill", svg.to_str().unwrap(), "-s", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn unknown_command_exits_with_usage() {
    let output = plotfill().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn simplify_reduces_collinear_strokes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("strokes.svg");
    fs::write(
        &input,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 10">
  <path id="walk" fill="none" stroke="black" d="M0 0 L10 0.01 L20 0 L30 0.01 L40 0"/>
</svg>"#,
    )
    .unwrap();
    let out = dir.path().join("simple.svg");

    let output = plotfill()
        .args(["simplify", input.to_str().unwrap(), "-t", "0.5", "-o"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains(r#"d="M 0 0 L 40 0""#), "got {text}");
}

#[test]
fn simplify_requires_tolerance() {
    let (_dir, svg) = fixture();
    let output = plotfill()
        .args(["simplify", svg.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
