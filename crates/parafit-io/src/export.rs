//! Export of fit results for downstream renderers.

use std::fmt::Write;

use parafit_core::{FitConfig, FitError, Result};
use parafit_fit::{FitResult, QuadraticCoefficients};
use parafit_math::{Point3, Vector3};
use serde::Serialize;

/// Everything a renderer needs to redraw a fit, plus quality figures.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub coefficients: QuadraticCoefficients,
    pub centroid: Point3,
    pub basis_u: Vector3,
    pub basis_w: Vector3,
    pub u_range: (f64, f64),
    pub sample_range: (f64, f64),
    pub point_count: usize,
    pub rms_residual: f64,
}

impl FitReport {
    pub fn new(fit: &FitResult, points: &[Point3], config: &FitConfig) -> Self {
        Self {
            coefficients: fit.coefficients,
            centroid: fit.centroid(),
            basis_u: fit.basis_u(),
            basis_w: fit.basis_w(),
            u_range: fit.u_range,
            sample_range: fit.padded_range(config),
            point_count: points.len(),
            rms_residual: fit.rms_residual(points),
        }
    }
}

/// Serialize a [`FitResult`] as pretty-printed JSON.
pub fn fit_to_json(fit: &FitResult) -> Result<String> {
    serde_json::to_string_pretty(fit).map_err(|e| FitError::Serialization(e.to_string()))
}

/// Write points as `x,y,z` lines with a header row.
pub fn polyline_to_csv(points: &[Point3]) -> String {
    let mut out = String::from("x,y,z\n");
    for p in points {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{},{},{}", p.x, p.y, p.z);
    }
    out
}
