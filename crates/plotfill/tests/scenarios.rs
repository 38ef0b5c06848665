//! End-to-end scenarios through the public API.

use plotfill::{
    extract_polygons, generate_fill, optimize_order, parse_compound_path, simplify,
    to_compound_path, FillParams, FillRule, HoleMode, Line, LineGroup, Pattern, Point, Polygon,
    Shape, ShapeDescriptor,
};

fn square(size: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ])
}

#[test]
fn square_with_horizontal_lines() {
    let lines = generate_fill(&square(100.0), &FillParams::new(Pattern::Lines, 10.0, 0.0));

    assert_eq!(lines.len(), 10);
    let mut ys: Vec<f64> = lines.iter().map(|l| l.y1).collect();
    ys.sort_by(f64::total_cmp);
    for (i, y) in ys.iter().enumerate() {
        assert!((y - (5.0 + 10.0 * i as f64)).abs() < 1e-9);
    }
    for line in &lines {
        assert!((line.y1 - line.y2).abs() < 1e-9);
        assert!((line.x1.min(line.x2)).abs() < 1e-9);
        assert!((line.x1.max(line.x2) - 100.0).abs() < 1e-9);
    }
}

#[test]
fn centred_hole_stays_empty() {
    let shape = Shape::new(
        "donut",
        ShapeDescriptor::path("M0 0 H100 V100 H0 Z M25 25 V75 H75 V25 Z"),
    );
    let polygons = extract_polygons(&shape, HoleMode::Suppress, FillRule::NonZero);
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].holes.len(), 1);

    for pattern in [Pattern::Lines, Pattern::Crosshatch, Pattern::Radial, Pattern::Honeycomb] {
        let lines = generate_fill(&polygons[0], &FillParams::new(pattern, 10.0, 30.0));
        assert!(!lines.is_empty(), "{pattern} produced nothing");
        for line in &lines {
            let m = line.midpoint();
            let in_hole = m.x > 25.0 + 1e-9 && m.x < 75.0 - 1e-9 && m.y > 25.0 + 1e-9 && m.y < 75.0 - 1e-9;
            assert!(!in_hole, "{pattern}: midpoint {m:?} inside the hole");
        }
    }
}

#[test]
fn even_odd_hole_matches_nonzero_reversed_hole() {
    let same_winding = Shape::new("a", ShapeDescriptor::path("M0 0 H100 V100 H0 Z M25 25 H75 V75 H25 Z"));
    let nonzero = extract_polygons(&same_winding, HoleMode::Suppress, FillRule::NonZero);
    let evenodd = extract_polygons(&same_winding, HoleMode::Suppress, FillRule::EvenOdd);

    // Same winding under nonzero fills the inner square too
    assert!(nonzero[0].holes.is_empty());
    assert_eq!(evenodd[0].holes.len(), 1);
}

#[test]
fn concentric_loops_shrink() {
    let lines = generate_fill(&square(100.0), &FillParams::new(Pattern::Concentric, 10.0, 0.0));

    // Ring edges are axis aligned; connectors are diagonal
    let mut insets: Vec<f64> = lines
        .iter()
        .filter(|l| (l.x1 - l.x2).abs() < 1e-9 || (l.y1 - l.y2).abs() < 1e-9)
        .map(|l| {
            let m = l.midpoint();
            m.x.min(100.0 - m.x).min(m.y).min(100.0 - m.y)
        })
        .collect();
    insets.sort_by(f64::total_cmp);
    insets.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

    assert!(!insets.is_empty() && insets.len() <= 6, "loops: {insets:?}");
    let areas: Vec<f64> = insets.iter().map(|d| (100.0 - 2.0 * d).powi(2)).collect();
    for pair in areas.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn three_segments_nearest_first() {
    let input = vec![
        Line::new(5.0, 0.0, 6.0, 0.0),
        Line::new(2.0, 0.0, 1.0, 0.0),
        Line::new(0.0, 1.0, 0.0, 0.0),
    ];
    let result = optimize_order(&[LineGroup::new("a", None, input.clone())]);

    assert_eq!(result.ordered_lines.len(), 3);
    let first = &result.ordered_lines[0];
    assert_eq!(first.original_index, 2);
    assert_eq!(first.line.start(), Point::new(0.0, 0.0));

    let input_points: Vec<Point> = input.iter().flat_map(|l| [l.start(), l.end()]).collect();
    for entry in &result.ordered_lines {
        assert!(input_points.contains(&entry.line.start()));
        assert!(input_points.contains(&entry.line.end()));
    }
    assert!(result.travel_after <= result.travel_before);
}

#[test]
fn full_pipeline_round_trips_through_path_data() {
    let shape = Shape::new("c", ShapeDescriptor::Circle { cx: 50.0, cy: 50.0, r: 40.0 })
        .with_color("#ff0000")
        .with_transform_str("translate(10 0)");
    let polygons = extract_polygons(&shape, HoleMode::Suppress, FillRule::NonZero);
    let params = FillParams::new(Pattern::Wiggle, 4.0, 15.0);

    let lines: Vec<Line> = polygons.iter().flat_map(|p| generate_fill(p, &params)).collect();
    let simplified = simplify(&lines, 0.05);
    assert!(simplified.len() <= lines.len());

    let result = optimize_order(&[LineGroup::new(shape.id.clone(), shape.color.clone(), simplified)]);
    let drawn = result.lines();
    assert_eq!(parse_compound_path(&to_compound_path(&drawn)), drawn);

    for line in &drawn {
        // Circle spans x 20..100 after the translate; wiggles may overshoot slightly
        assert!(line.x1.min(line.x2) >= 19.0 && line.x1.max(line.x2) <= 101.0);
    }
}
