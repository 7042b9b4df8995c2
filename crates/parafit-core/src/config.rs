//! Fit configuration.

use crate::error::{FitError, Result};
use crate::tolerance::Tolerance;

/// Knobs of the plane estimator, quadratic solver and curve reconstruction.
///
/// `FitConfig::default()` reproduces the reference behaviour: 10 power
/// iterations from a `(1, 1, 1)` seed, a `1e-10` determinant cut-off and a
/// 20 % sampling pad (or a fixed pad of `1.0` when the data range is empty).
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct FitConfig {
    /// Number of power-iteration steps per eigenvector.
    pub power_iterations: usize,
    /// Starting vector of every power iteration.
    pub seed: [f64; 3],
    pub tolerance: Tolerance,
    /// Fraction of the observed `u` range added on each side when resampling.
    pub pad_fraction: f64,
    /// Pad used instead when the observed `u` range is empty.
    pub fallback_pad: f64,
}

impl FitConfig {
    pub const DEFAULT_POWER_ITERATIONS: usize = 10;
    pub const DEFAULT_SEED: [f64; 3] = [1.0, 1.0, 1.0];
    pub const DEFAULT_PAD_FRACTION: f64 = 0.2;
    pub const DEFAULT_FALLBACK_PAD: f64 = 1.0;

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.power_iterations = iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.power_iterations == 0 {
            return Err(FitError::InvalidOperation(
                "power_iterations must be at least 1".into(),
            ));
        }
        if self.seed.iter().all(|c| *c == 0.0) || self.seed.iter().any(|c| !c.is_finite()) {
            return Err(FitError::InvalidOperation(
                "seed must be a finite, non-zero vector".into(),
            ));
        }
        let tol = self.tolerance;
        if [tol.normalization, tol.determinant, tol.range]
            .iter()
            .any(|t| !t.is_finite() || *t < 0.0)
        {
            return Err(FitError::InvalidOperation(
                "tolerances must be finite and non-negative".into(),
            ));
        }
        if !(self.pad_fraction >= 0.0 && self.fallback_pad >= 0.0) {
            return Err(FitError::InvalidOperation(
                "padding must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            power_iterations: Self::DEFAULT_POWER_ITERATIONS,
            seed: Self::DEFAULT_SEED,
            tolerance: Tolerance::default(),
            pad_fraction: Self::DEFAULT_PAD_FRACTION,
            fallback_pad: Self::DEFAULT_FALLBACK_PAD,
        }
    }
}
