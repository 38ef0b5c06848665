//! Wiggle and zigzag fill patterns - wavy hatch lines.
//!
//! Both start from the clipped straight hatch and replace every segment
//! with a sampled wave displaced perpendicular to it. The wave phase
//! restarts at each segment start, so each stroke begins on the hatch line.

use std::f64::consts::PI;

use super::util::polyline_inside;
use crate::geometry::{Line, Point, Polygon};
use crate::hatch::generate_lines_fill;

/// Samples per wavelength; a multiple of 4 so triangle peaks are hit exactly.
const SAMPLES_PER_WAVE: f64 = 16.0;
/// Upper bound on samples along one hatch segment.
const MAX_SAMPLES: usize = 8192;

/// Shape of the displacement wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Wave value in [-1, 1] at `phase` cycles; both shapes rise from 0.
    #[inline]
    pub fn value(&self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => {
                let f = phase - phase.floor();
                if f < 0.25 {
                    4.0 * f
                } else if f < 0.75 {
                    2.0 - 4.0 * f
                } else {
                    4.0 * f - 4.0
                }
            }
        }
    }
}

/// Generate wiggle (sine) or zigzag (triangle) fill for a polygon.
///
/// `amplitude` is the perpendicular displacement, `frequency` the number of
/// waves per unit of length along each stroke.
pub fn generate_wiggle_fill(
    polygon: &Polygon,
    spacing: f64,
    angle_degrees: f64,
    amplitude: f64,
    frequency: f64,
    waveform: Waveform,
) -> Vec<Line> {
    let hatch = generate_lines_fill(polygon, spacing, angle_degrees);

    if amplitude == 0.0 || !amplitude.is_finite() || !(frequency.is_finite() && frequency > 0.0) {
        return hatch;
    }

    let step = 1.0 / frequency / SAMPLES_PER_WAVE;
    let mut lines = Vec::new();
    let mut points = Vec::new();

    for seg in &hatch {
        let len = seg.length();
        if len < 1e-12 {
            continue;
        }
        let (dir_x, dir_y) = ((seg.x2 - seg.x1) / len, (seg.y2 - seg.y1) / len);
        let (perp_x, perp_y) = (-dir_y, dir_x);

        let count = ((len / step).ceil() as usize).clamp(1, MAX_SAMPLES);
        let step = if count == MAX_SAMPLES { len / count as f64 } else { step };

        points.clear();
        for i in 0..=count {
            let t = (i as f64 * step).min(len);
            let offset = amplitude * waveform.value(t * frequency);
            points.push(Point::new(
                seg.x1 + dir_x * t + perp_x * offset,
                seg.y1 + dir_y * t + perp_y * offset,
            ));
        }

        // Pieces that swing out over the boundary are dropped
        polyline_inside(&points, polygon, &mut lines);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::point_in_body;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ])
    }

    #[test]
    fn generates_wiggle_lines() {
        let lines = generate_wiggle_fill(&square(), 10.0, 0.0, 3.0, 0.1, Waveform::Sine);
        assert!(lines.len() > 10);
        for line in &lines {
            let mid = line.midpoint();
            assert!(point_in_body(mid.x, mid.y, &square()));
        }
    }

    #[test]
    fn amplitude_is_respected() {
        let lines = generate_wiggle_fill(&square(), 10.0, 0.0, 2.0, 0.1, Waveform::Sine);
        // Rows sit at y = 5, 15, ...; displacement stays within 2 of them
        for line in &lines {
            for y in [line.y1, line.y2] {
                let row = ((y - 5.0) / 10.0).round() * 10.0 + 5.0;
                assert!((y - row).abs() <= 2.0 + 1e-9);
            }
        }
    }

    #[test]
    fn zigzag_reaches_full_amplitude() {
        let lines = generate_wiggle_fill(&square(), 20.0, 0.0, 3.0, 0.1, Waveform::Triangle);
        let peak = lines
            .iter()
            .flat_map(|l| [l.y1, l.y2])
            .map(|y| (y - 10.0).abs())
            .filter(|d| *d < 5.0)
            .fold(0.0, f64::max);
        assert!((peak - 3.0).abs() < 1e-9, "peak {}", peak);
    }

    #[test]
    fn triangle_wave_shape() {
        let w = Waveform::Triangle;
        assert!(w.value(0.0).abs() < 1e-12);
        assert!((w.value(0.25) - 1.0).abs() < 1e-12);
        assert!(w.value(0.5).abs() < 1e-12);
        assert!((w.value(0.75) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_amplitude_is_plain_hatch() {
        let wavy = generate_wiggle_fill(&square(), 10.0, 0.0, 0.0, 0.1, Waveform::Sine);
        assert_eq!(wavy, generate_lines_fill(&square(), 10.0, 0.0));
    }
}
