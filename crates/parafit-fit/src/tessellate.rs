//! Tessellation of fitted parabolas into polylines.
//!
//! A chord spanning `h` in `u` on `w = a·u² + b·u + c` misses the curve at
//! its midpoint by exactly `|a|·h²/4`, wherever the chord sits. A uniform
//! step in `u` is therefore already the coarsest polyline that meets a chord
//! tolerance; no recursive subdivision is needed.

use parafit_math::Point3;

use crate::curve::{Curve, FittedCurve};
use crate::quadratic::QuadraticCoefficients;

/// Upper bound on the segment count of [`curve_to_polyline`].
pub const MAX_SEGMENTS: usize = 4096;

/// Midpoint gap between the curve and a chord spanning `h` in `u`.
pub fn chord_deviation(coefficients: &QuadraticCoefficients, h: f64) -> f64 {
    coefficients.a.abs() * h * h * 0.25
}

/// Smallest segment count over `width` whose chords all stay within
/// `tolerance` of the curve, clamped to `1..=MAX_SEGMENTS`.
pub fn segments_for_tolerance(
    coefficients: &QuadraticCoefficients,
    width: f64,
    tolerance: f64,
) -> usize {
    let width = width.abs();
    if chord_deviation(coefficients, width) <= tolerance {
        return 1;
    }
    if !(tolerance > 0.0) {
        return MAX_SEGMENTS;
    }
    let n = (0.5 * width * (coefficients.a.abs() / tolerance).sqrt()).ceil();
    if n.is_finite() {
        (n as usize).clamp(1, MAX_SEGMENTS)
    } else {
        MAX_SEGMENTS
    }
}

/// Convert a fitted curve to a polyline with maximum chord deviation `tolerance`.
///
/// A straight fit (`a == 0`) becomes a single segment.
pub fn curve_to_polyline(curve: &FittedCurve, tolerance: f64) -> Vec<Point3> {
    let (t_min, t_max) = curve.domain();
    let segments = segments_for_tolerance(&curve.fit.coefficients, t_max - t_min, tolerance);
    let step = (t_max - t_min) / segments as f64;
    (0..=segments)
        .map(|i| curve.point_at(t_min + i as f64 * step))
        .collect()
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
}
