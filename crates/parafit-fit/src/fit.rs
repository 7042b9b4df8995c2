//! Spatial parabola fitting: best-fit plane, projection, quadratic solve.

use log::debug;
use parafit_core::traits::Validate;
use parafit_core::{FitConfig, FitError, Result};
use parafit_math::{Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::FittedCurve;
use crate::plane::{estimate_plane_with, PlaneBasis};
use crate::quadratic::{NormalSums, QuadraticCoefficients};

/// A parabola `w = a·u² + b·u + c` living in the local frame of a plane.
///
/// World-space point at parameter `u`: `centroid + u·basis_u + w(u)·basis_w`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitResult {
    pub coefficients: QuadraticCoefficients,
    pub basis: PlaneBasis,
    /// `(min_u, max_u)` over the projected input points.
    pub u_range: (f64, f64),
}

impl FitResult {
    pub fn a(&self) -> f64 {
        self.coefficients.a
    }

    pub fn b(&self) -> f64 {
        self.coefficients.b
    }

    pub fn c(&self) -> f64 {
        self.coefficients.c
    }

    pub fn centroid(&self) -> Point3 {
        self.basis.centroid
    }

    pub fn basis_u(&self) -> Vector3 {
        self.basis.basis_u
    }

    pub fn basis_w(&self) -> Vector3 {
        self.basis.basis_w
    }

    /// `w` of the fitted quadratic at `u`.
    pub fn eval_local(&self, u: f64) -> f64 {
        self.coefficients.eval(u)
    }

    /// World-space point on the fitted curve at in-plane parameter `u`.
    pub fn point_at_u(&self, u: f64) -> Point3 {
        self.basis.to_world(u, self.eval_local(u))
    }

    /// Sampling interval: the observed `u` range widened by
    /// `pad_fraction · width` on each side, or by `fallback_pad` when the
    /// range is empty.
    pub fn padded_range(&self, config: &FitConfig) -> (f64, f64) {
        let pad = self.pad(config);
        (self.u_range.0 - pad, self.u_range.1 + pad)
    }

    fn pad(&self, config: &FitConfig) -> f64 {
        let width = self.u_range.1 - self.u_range.0;
        if config.tolerance.is_empty_range(width) {
            config.fallback_pad
        } else {
            width * config.pad_fraction
        }
    }

    /// Resample the curve as `steps + 1` world points with the default padding.
    pub fn sample(&self, steps: usize) -> Vec<Point3> {
        self.sample_with(steps, &FitConfig::default())
    }

    /// Resample the curve as `steps + 1` world points.
    ///
    /// Sample `i` sits at
    /// `u = (min_u - pad) + (i / steps) · ((max_u - min_u) + 2·pad)`.
    /// `steps == 0` is treated as `1`.
    pub fn sample_with(&self, steps: usize, config: &FitConfig) -> Vec<Point3> {
        let steps = steps.max(1);
        let (min_u, max_u) = self.u_range;
        let pad = self.pad(config);
        let start = min_u - pad;
        let span = (max_u - min_u) + 2.0 * pad;

        (0..=steps)
            .map(|i| {
                let u = start + (i as f64 / steps as f64) * span;
                self.point_at_u(u)
            })
            .collect()
    }

    /// View this fit as a [`crate::Curve`] over its padded range.
    pub fn to_curve(&self, config: &FitConfig) -> FittedCurve {
        FittedCurve::new(*self, self.padded_range(config))
    }

    /// In-plane residual `w - f(u)` of each point.
    pub fn residuals(&self, points: &[Point3]) -> Vec<f64> {
        points
            .iter()
            .map(|&p| {
                let lp = self.basis.project(p);
                lp.w - self.eval_local(lp.u)
            })
            .collect()
    }

    /// Root-mean-square of [`Self::residuals`]; `0.0` for no points.
    pub fn rms_residual(&self, points: &[Point3]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.residuals(points).iter().map(|r| r * r).sum();
        (sum / points.len() as f64).sqrt()
    }

    /// Signed out-of-plane distance of each point.
    pub fn plane_distances(&self, points: &[Point3]) -> Vec<f64> {
        let plane = self.basis.plane();
        points.iter().map(|&p| plane.signed_distance(p)).collect()
    }
}

impl Validate for FitResult {
    fn validate(&self) -> Result<()> {
        self.basis.validate()?;
        let q = self.coefficients;
        if !(q.a.is_finite() && q.b.is_finite() && q.c.is_finite()) {
            return Err(FitError::InvalidOperation("fit coefficients are not finite".into()));
        }
        if !(self.u_range.0 <= self.u_range.1) {
            return Err(FitError::InvalidOperation("u range is inverted".into()));
        }
        Ok(())
    }
}

/// Fit a parabola to a 3D point cloud with the default [`FitConfig`].
pub fn fit_spatial_parabola(points: &[Point3]) -> Result<FitResult> {
    fit_spatial_parabola_with(points, &FitConfig::default())
}

/// Fit a parabola to a 3D point cloud.
///
/// Estimates the dominant plane, projects every point into its `(u, w)`
/// frame, and solves the quadratic least-squares problem in that frame.
/// Fails with [`FitError::DegenerateInput`] for fewer than 3 points and
/// with [`FitError::SingularSystem`] when the projected points lack spread
/// along `u`.
pub fn fit_spatial_parabola_with(points: &[Point3], config: &FitConfig) -> Result<FitResult> {
    config.validate()?;
    if points.len() < 3 {
        return Err(FitError::DegenerateInput {
            points: points.len(),
        });
    }

    let basis = estimate_plane_with(points, config)?;

    let mut sums = NormalSums::new();
    let mut min_u = f64::INFINITY;
    let mut max_u = f64::NEG_INFINITY;
    for &p in points {
        let lp = basis.project(p);
        min_u = min_u.min(lp.u);
        max_u = max_u.max(lp.u);
        sums.push(lp);
    }

    let coefficients = sums.solve(config.tolerance)?;
    debug!(
        "fitted parabola: a={} b={} c={} u_range=({}, {})",
        coefficients.a, coefficients.b, coefficients.c, min_u, max_u
    );

    Ok(FitResult {
        coefficients,
        basis,
        u_range: (min_u, max_u),
    })
}

/// Fit many independent clouds in parallel with the default [`FitConfig`].
pub fn fit_many<C>(clouds: &[C]) -> Vec<Result<FitResult>>
where
    C: AsRef<[Point3]> + Sync,
{
    let config = FitConfig::default();
    clouds
        .par_iter()
        .map(|cloud| fit_spatial_parabola_with(cloud.as_ref(), &config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use parafit_math::DVec3;

    fn dvec3(x: f64, y: f64, z: f64) -> Point3 {
        DVec3::new(x, y, z)
    }

    fn flat_parabola() -> Vec<Point3> {
        // z = x² in the XZ plane, symmetric so the principal axes are X and Z.
        (-10..=10)
            .map(|i| {
                let x = i as f64;
                dvec3(x, 0.0, 0.05 * x * x)
            })
            .collect()
    }

    #[test]
    fn test_rejects_small_clouds() {
        assert!(matches!(
            fit_spatial_parabola(&[]),
            Err(FitError::DegenerateInput { points: 0 })
        ));
        assert!(matches!(
            fit_spatial_parabola(&[dvec3(1.0, 2.0, 3.0)]),
            Err(FitError::DegenerateInput { points: 1 })
        ));
        assert!(matches!(
            fit_spatial_parabola(&[DVec3::ZERO, DVec3::ONE]),
            Err(FitError::DegenerateInput { points: 2 })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FitConfig::default().with_iterations(0);
        assert!(matches!(
            fit_spatial_parabola_with(&flat_parabola(), &config),
            Err(FitError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_u_range_covers_projection() {
        let pts = flat_parabola();
        let fit = fit_spatial_parabola(&pts).unwrap();
        let us: Vec<f64> = pts.iter().map(|&p| fit.basis.project(p).u).collect();
        let min = us.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = us.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(fit.u_range, (min, max));
        assert_abs_diff_eq!(max - min, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_count_and_padding() {
        let fit = fit_spatial_parabola(&flat_parabola()).unwrap();
        let samples = fit.sample(60);
        assert_eq!(samples.len(), 61);

        let (lo, hi) = fit.padded_range(&FitConfig::default());
        assert_abs_diff_eq!(hi - lo, 20.0 * 1.4, epsilon = 1e-9);
        assert!((samples[0] - fit.point_at_u(lo)).length() < 1e-9);
        assert!((samples[60] - fit.point_at_u(hi)).length() < 1e-9);
    }

    #[test]
    fn test_zero_width_range_uses_fallback_pad() {
        let fit = FitResult {
            coefficients: QuadraticCoefficients::new(1.0, 0.0, 0.0),
            basis: PlaneBasis::new(DVec3::ZERO, DVec3::X, DVec3::Z),
            u_range: (2.0, 2.0),
        };
        assert_eq!(fit.padded_range(&FitConfig::default()), (1.0, 3.0));
        let pts = fit.sample(0);
        assert_eq!(pts.len(), 2);
        assert!((pts[0] - dvec3(1.0, 0.0, 1.0)).length() < 1e-12);
        assert!((pts[1] - dvec3(3.0, 0.0, 9.0)).length() < 1e-12);
    }

    #[test]
    fn test_residuals_vanish_on_exact_data() {
        let pts = flat_parabola();
        let fit = fit_spatial_parabola(&pts).unwrap();
        assert!(fit.rms_residual(&pts) < 1e-9);
        for d in fit.plane_distances(&pts) {
            assert!(d.abs() < 1e-9);
        }
        fit.validate().unwrap();
    }

    #[test]
    fn test_fit_many_matches_sequential() {
        let a = flat_parabola();
        let b = vec![DVec3::ZERO, DVec3::X];
        let results = fit_many(&[a.clone(), b]);
        assert_eq!(results.len(), 2);
        let parallel = results[0].as_ref().unwrap();
        let sequential = fit_spatial_parabola(&a).unwrap();
        assert_eq!(parallel.coefficients, sequential.coefficients);
        assert!(matches!(results[1], Err(FitError::DegenerateInput { points: 2 })));
    }
}
