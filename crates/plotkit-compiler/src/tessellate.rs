//! Curve flattening
//!
//! Cubic and quadratic Beziers are flattened by uniform parametric sampling
//! with the standard Bernstein-basis forms. The sample count is chosen once
//! per curve from the control-polygon length and the configured deviation
//! tolerance. Arcs are approximated by straight-line interpolation between
//! their endpoints; the radii and rotation parameters are accepted but not
//! honored.

/// Fewest segments any curve is flattened into.
const MIN_SEGMENTS: usize = 10;

/// Most segments any curve is flattened into.
const MAX_SEGMENTS: usize = 100;

/// Fixed step count for the linear arc approximation.
const ARC_SEGMENTS: usize = 20;

fn dist(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

/// Segment count for a curve with the given control-polygon length.
fn segment_count(control_length: f64, tolerance: f64) -> usize {
    let estimated = if tolerance > 0.0 {
        (control_length / tolerance).floor() as usize
    } else {
        MAX_SEGMENTS
    };
    estimated.max(MIN_SEGMENTS).min(MAX_SEGMENTS)
}

/// Flatten a cubic Bezier into line-segment endpoints.
///
/// The starting point (t=0) is excluded because the caller's cursor already
/// holds it; the final sample (t=1) equals the curve's end control point
/// exactly.
pub fn cubic(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    tolerance: f64,
) -> Vec<(f64, f64)> {
    let control_length =
        dist(x0, y0, x1, y1) + dist(x1, y1, x2, y2) + dist(x2, y2, x3, y3);
    let segments = segment_count(control_length, tolerance);

    let mut points = Vec::with_capacity(segments);
    for i in 1..=segments {
        let t = i as f64 / segments as f64;
        let mt = 1.0 - t;
        let x = mt.powi(3) * x0
            + 3.0 * mt.powi(2) * t * x1
            + 3.0 * mt * t.powi(2) * x2
            + t.powi(3) * x3;
        let y = mt.powi(3) * y0
            + 3.0 * mt.powi(2) * t * y1
            + 3.0 * mt * t.powi(2) * y2
            + t.powi(3) * y3;
        points.push((x, y));
    }
    points
}

/// Flatten a quadratic Bezier into line-segment endpoints.
///
/// Same sampling contract as [`cubic`].
pub fn quadratic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, tolerance: f64) -> Vec<(f64, f64)> {
    let control_length = dist(x0, y0, x1, y1) + dist(x1, y1, x2, y2);
    let segments = segment_count(control_length, tolerance);

    let mut points = Vec::with_capacity(segments);
    for i in 1..=segments {
        let t = i as f64 / segments as f64;
        let mt = 1.0 - t;
        let x = mt.powi(2) * x0 + 2.0 * mt * t * x1 + t.powi(2) * x2;
        let y = mt.powi(2) * y0 + 2.0 * mt * t * y1 + t.powi(2) * y2;
        points.push((x, y));
    }
    points
}

/// Approximate an arc as a straight line from start to end.
///
/// A known limitation: no circular or elliptical math is performed, so
/// arcs flatten to their chord.
pub fn arc_chord(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(ARC_SEGMENTS);
    for i in 1..=ARC_SEGMENTS {
        let t = i as f64 / ARC_SEGMENTS as f64;
        points.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
    }
    points
}
