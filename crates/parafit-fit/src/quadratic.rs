//! Ordinary least-squares fit of `w = a·u² + b·u + c`.

use log::debug;
use parafit_core::{FitError, Result, Tolerance};
use parafit_math::Vector3;
use serde::{Deserialize, Serialize};

use crate::plane::LocalPoint;

/// Coefficients of `w = a·u² + b·u + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticCoefficients {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn eval(&self, u: f64) -> f64 {
        (self.a * u + self.b) * u + self.c
    }

    /// `dw/du`.
    pub fn derivative(&self, u: f64) -> f64 {
        2.0 * self.a * u + self.b
    }
}

/// Running power sums for the 3x3 normal equations.
///
/// `su[k] = Σ uᵏ` for `k = 0..=4` (so `su[0]` is the point count) and
/// `suw[k] = Σ uᵏ·w` for `k = 0..=2`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalSums {
    su: [f64; 5],
    suw: [f64; 3],
    count: usize,
}

impl NormalSums {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: LocalPoint) {
        let u2 = p.u * p.u;
        self.su[0] += 1.0;
        self.su[1] += p.u;
        self.su[2] += u2;
        self.su[3] += u2 * p.u;
        self.su[4] += u2 * u2;
        self.suw[0] += p.w;
        self.suw[1] += p.u * p.w;
        self.suw[2] += u2 * p.w;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Solve the normal equations by Cramer's rule.
    ///
    /// ```text
    /// [Σu⁴ Σu³ Σu²] [a]   [Σu²w]
    /// [Σu³ Σu² Σu ] [b] = [Σuw ]
    /// [Σu² Σu  n  ] [c]   [Σw  ]
    /// ```
    pub fn solve(&self, tol: Tolerance) -> Result<QuadraticCoefficients> {
        if self.count < 3 {
            return Err(FitError::DegenerateInput { points: self.count });
        }

        let s = &self.su;
        // The matrix is symmetric, so rows and columns coincide.
        let col0 = Vector3::new(s[4], s[3], s[2]);
        let col1 = Vector3::new(s[3], s[2], s[1]);
        let col2 = Vector3::new(s[2], s[1], s[0]);
        let rhs = Vector3::new(self.suw[2], self.suw[1], self.suw[0]);

        let det = det3(col0, col1, col2);
        debug!("normal equations: n={} det={:e}", self.count, det);
        if tol.is_singular(det) {
            return Err(FitError::SingularSystem { determinant: det });
        }

        Ok(QuadraticCoefficients {
            a: det3(rhs, col1, col2) / det,
            b: det3(col0, rhs, col2) / det,
            c: det3(col0, col1, rhs) / det,
        })
    }
}

impl Extend<LocalPoint> for NormalSums {
    fn extend<I: IntoIterator<Item = LocalPoint>>(&mut self, iter: I) {
        for p in iter {
            self.push(p);
        }
    }
}

impl FromIterator<LocalPoint> for NormalSums {
    fn from_iter<I: IntoIterator<Item = LocalPoint>>(iter: I) -> Self {
        let mut sums = Self::new();
        sums.extend(iter);
        sums
    }
}

/// Determinant of the matrix with columns `c0, c1, c2` (scalar triple product).
fn det3(c0: Vector3, c1: Vector3, c2: Vector3) -> f64 {
    c0.dot(c1.cross(c2))
}

/// Fit `w = a·u² + b·u + c` to local points with the default tolerance.
///
/// Fails with [`FitError::DegenerateInput`] for fewer than 3 points and with
/// [`FitError::SingularSystem`] when the points have fewer than 3 distinct `u`
/// values (or too little spread along `u` to pin down a quadratic).
pub fn fit_quadratic(points: &[LocalPoint]) -> Result<QuadraticCoefficients> {
    points.iter().copied().collect::<NormalSums>().solve(Tolerance::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample(a: f64, b: f64, c: f64, us: &[f64]) -> Vec<LocalPoint> {
        let q = QuadraticCoefficients::new(a, b, c);
        us.iter().map(|&u| LocalPoint::new(u, q.eval(u))).collect()
    }

    #[test]
    fn test_exact_three_points() {
        let pts = sample(2.0, -3.0, 0.5, &[-1.0, 0.0, 2.0]);
        let q = fit_quadratic(&pts).unwrap();
        assert_abs_diff_eq!(q.a, 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q.b, -3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q.c, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_exact_many_points() {
        let us: Vec<f64> = (-10..=10).map(|i| i as f64 * 0.37).collect();
        let pts = sample(-0.75, 1.25, 4.0, &us);
        let q = fit_quadratic(&pts).unwrap();
        assert_abs_diff_eq!(q.a, -0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(q.b, 1.25, epsilon = 1e-9);
        assert_abs_diff_eq!(q.c, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_least_squares_line_through_noise() {
        // Symmetric noise around w = u: the best quadratic is the line itself.
        let pts = vec![
            LocalPoint::new(-2.0, -2.0),
            LocalPoint::new(-1.0, -0.5),
            LocalPoint::new(-1.0, -1.5),
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(1.0, 1.5),
            LocalPoint::new(1.0, 0.5),
            LocalPoint::new(2.0, 2.0),
        ];
        let q = fit_quadratic(&pts).unwrap();
        assert_abs_diff_eq!(q.a, 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q.b, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q.c, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_same_u_is_singular() {
        let pts = vec![
            LocalPoint::new(1.0, 0.0),
            LocalPoint::new(1.0, 2.0),
            LocalPoint::new(1.0, -3.0),
        ];
        assert!(matches!(
            fit_quadratic(&pts),
            Err(FitError::SingularSystem { .. })
        ));
    }

    #[test]
    fn test_two_distinct_u_is_singular() {
        let pts = vec![
            LocalPoint::new(-1.0, 0.0),
            LocalPoint::new(-1.0, 1.0),
            LocalPoint::new(1.0, 0.0),
            LocalPoint::new(1.0, 1.0),
        ];
        assert!(matches!(
            fit_quadratic(&pts),
            Err(FitError::SingularSystem { .. })
        ));
    }

    #[test]
    fn test_too_few_points() {
        let pts = sample(1.0, 0.0, 0.0, &[0.0, 1.0]);
        assert!(matches!(
            fit_quadratic(&pts),
            Err(FitError::DegenerateInput { points: 2 })
        ));
    }

    #[test]
    fn test_sums_accumulate_incrementally() {
        let pts = sample(1.0, 2.0, 3.0, &[0.0, 1.0, 2.0, 3.0]);
        let mut sums = NormalSums::new();
        assert!(sums.is_empty());
        for p in &pts {
            sums.push(*p);
        }
        assert_eq!(sums.len(), 4);
        assert_eq!(sums, pts.iter().copied().collect::<NormalSums>());
    }

    #[test]
    fn test_eval_and_derivative() {
        let q = QuadraticCoefficients::new(1.0, -2.0, 3.0);
        assert_abs_diff_eq!(q.eval(2.0), 3.0);
        assert_abs_diff_eq!(q.derivative(2.0), 2.0);
    }
}
