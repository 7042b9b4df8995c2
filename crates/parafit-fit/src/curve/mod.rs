//! Curve trait and the fitted-parabola curve.

use parafit_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::fit::FitResult;

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);
}

/// A fitted parabola restricted to a `u` interval, parameterized by `u` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedCurve {
    pub fit: FitResult,
    pub range: (f64, f64),
}

impl FittedCurve {
    pub fn new(fit: FitResult, range: (f64, f64)) -> Self {
        Self { fit, range }
    }
}

impl Curve for FittedCurve {
    fn point_at(&self, t: f64) -> Point3 {
        self.fit.point_at_u(t)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        self.fit.basis.basis_u + self.fit.coefficients.derivative(t) * self.fit.basis.basis_w
    }

    fn domain(&self) -> (f64, f64) {
        self.range
    }
}
