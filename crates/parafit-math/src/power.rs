//! Fixed-step power iteration.
//!
//! This is an approximate eigensolver: it runs a fixed number of steps and
//! never checks convergence. After `k` steps the error along the second
//! eigenvector shrinks like `(λ2 / λ1)^k`, which is plenty for well-separated
//! spreads and poor when the two largest eigenvalues are close.

use parafit_core::Tolerance;

use crate::sym::SymMat3;
use crate::vector::try_normalize;
use crate::Vector3;

/// Approximate the eigenvector of `m` with the largest-magnitude eigenvalue.
///
/// Starts from `seed` and applies `x <- normalize(M x)` exactly `iterations`
/// times. Returns `None` when an iterate collapses to (numerically) zero,
/// i.e. the seed has no component outside the null space of `m`.
pub fn power_iteration(
    m: &SymMat3,
    seed: Vector3,
    iterations: usize,
    tol: Tolerance,
) -> Option<Vector3> {
    let mut v = seed;
    for _ in 0..iterations {
        v = try_normalize(m.mul_vec(v), tol)?;
    }
    Some(v)
}
