//! Best-fit plane estimation by principal component analysis.
//!
//! The two dominant principal directions come from [`power_iteration`] on the
//! scatter matrix. The second direction is extracted from a deflated matrix
//! `C - trace(C) · v1 ⊗ v1`. Scaling by the trace instead of the dominant
//! eigenvalue is intentional: it keeps `v1` an eigenvector with eigenvalue
//! `-(λ2 + λ3)`, and the Gram-Schmidt step that follows removes whatever
//! `v1` component power iteration leaves behind. The result is close to the
//! true second eigenvector when `λ3 ≪ λ2` and degrades as the cloud becomes
//! isotropic.

use log::{debug, warn};
use parafit_core::traits::Validate;
use parafit_core::{FitConfig, FitError, Result, Tolerance};
use parafit_math::vector::{centroid, reject_from, try_normalize};
use parafit_math::{power_iteration, Plane, Point3, SymMat3, Vector3};
use serde::{Deserialize, Serialize};

/// A point expressed in the local `(u, w)` frame of a [`PlaneBasis`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    pub u: f64,
    pub w: f64,
}

impl LocalPoint {
    pub fn new(u: f64, w: f64) -> Self {
        Self { u, w }
    }
}

/// Origin and orthonormal in-plane axes of the plane that best explains a point cloud.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaneBasis {
    pub centroid: Point3,
    /// Direction of maximal variance.
    pub basis_u: Vector3,
    /// Direction of second-greatest variance, orthogonal to `basis_u`.
    pub basis_w: Vector3,
}

impl PlaneBasis {
    pub fn new(centroid: Point3, basis_u: Vector3, basis_w: Vector3) -> Self {
        Self {
            centroid,
            basis_u,
            basis_w,
        }
    }

    /// Unit normal `basis_u × basis_w`.
    pub fn normal(&self) -> Vector3 {
        self.basis_u.cross(self.basis_w)
    }

    pub fn project(&self, p: Point3) -> LocalPoint {
        let d = p - self.centroid;
        LocalPoint::new(d.dot(self.basis_u), d.dot(self.basis_w))
    }

    pub fn to_world(&self, u: f64, w: f64) -> Point3 {
        self.centroid + u * self.basis_u + w * self.basis_w
    }

    pub fn plane(&self) -> Plane {
        Plane::from_span(self.centroid, self.basis_u, self.basis_w)
    }
}

impl Validate for PlaneBasis {
    fn validate(&self) -> Result<()> {
        let eps = Tolerance::ORTHONORMAL;
        if !(self.centroid.is_finite() && self.basis_u.is_finite() && self.basis_w.is_finite()) {
            return Err(FitError::InvalidOperation("plane basis has non-finite components".into()));
        }
        if (self.basis_u.length() - 1.0).abs() > eps || (self.basis_w.length() - 1.0).abs() > eps {
            return Err(FitError::InvalidOperation("plane basis vectors are not unit length".into()));
        }
        if self.basis_u.dot(self.basis_w).abs() > eps {
            return Err(FitError::InvalidOperation("plane basis vectors are not orthogonal".into()));
        }
        Ok(())
    }
}

/// Estimate the best-fit plane of `points` with the default [`FitConfig`].
pub fn estimate_plane(points: &[Point3]) -> Result<PlaneBasis> {
    estimate_plane_with(points, &FitConfig::default())
}

/// Estimate the best-fit plane of `points`.
///
/// Fails with [`FitError::DegenerateInput`] for an empty cloud, and with
/// [`FitError::UnresolvedPlane`] when the dominant axis is orthogonal to the
/// seed and power iteration cannot reach it. Clouds that do not span a plane
/// still produce an orthonormal basis:
/// - coincident points (zero scatter) fall back to the normalized seed for `basis_u`;
/// - collinear points fall back to an arbitrary unit vector orthogonal to `basis_u`.
pub fn estimate_plane_with(points: &[Point3], config: &FitConfig) -> Result<PlaneBasis> {
    let centroid = centroid(points).ok_or(FitError::DegenerateInput { points: 0 })?;
    let scatter = SymMat3::covariance(points, centroid);
    let tol = config.tolerance;
    let seed = Vector3::from_array(config.seed);
    let iterations = config.power_iterations;

    let basis_u = match power_iteration(&scatter, seed, iterations, tol) {
        Some(v) => v,
        None => {
            warn!("point cloud has no spread, using seed direction as dominant axis");
            try_normalize(seed, tol).unwrap_or(Vector3::X)
        }
    };

    let trace = scatter.trace();
    let captured = scatter.rayleigh_quotient(basis_u);
    let slack = Tolerance::SPREAD * trace;

    let deflated = scatter.sub_scaled_outer(basis_u, trace);
    let basis_w = power_iteration(&deflated, seed, iterations, tol)
        .and_then(|v| try_normalize(reject_from(v, basis_u), tol));
    let basis_w = match basis_w {
        Some(v) => v,
        None => {
            // The deflated iterate collapsed onto `basis_u`. Only a collinear
            // cloud may do that; otherwise the seed missed the dominant axis.
            let missed = trace - captured;
            if missed > slack {
                return Err(FitError::UnresolvedPlane { captured, missed });
            }
            warn!("point cloud has no secondary spread, choosing an arbitrary orthogonal axis");
            basis_u.any_orthonormal_vector()
        }
    };

    // A seed orthogonal to the dominant axis leaves it as the plane normal.
    let off_plane = scatter.rayleigh_quotient(basis_u.cross(basis_w));
    if off_plane > captured + slack {
        return Err(FitError::UnresolvedPlane {
            captured,
            missed: off_plane,
        });
    }

    debug!(
        "estimated plane: centroid={:?} u={:?} w={:?} spread=({:.6e}, {:.6e})",
        centroid,
        basis_u,
        basis_w,
        captured,
        scatter.rayleigh_quotient(basis_w),
    );

    Ok(PlaneBasis::new(centroid, basis_u, basis_w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use parafit_math::DVec3;

    fn dvec3(x: f64, y: f64, z: f64) -> Point3 {
        DVec3::new(x, y, z)
    }

    #[test]
    fn test_empty_cloud_is_degenerate() {
        assert!(matches!(
            estimate_plane(&[]),
            Err(FitError::DegenerateInput { points: 0 })
        ));
    }

    #[test]
    fn test_xy_plane_cloud() {
        let pts = vec![
            dvec3(-4.0, 0.0, 0.0),
            dvec3(4.0, 0.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
            dvec3(0.0, -1.0, 0.0),
            dvec3(2.0, 0.5, 0.0),
        ];
        let basis = estimate_plane(&pts).unwrap();
        basis.validate().unwrap();
        assert_abs_diff_eq!(basis.normal().z.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_project_and_back() {
        let basis = PlaneBasis::new(dvec3(1.0, 2.0, 3.0), DVec3::X, DVec3::Z);
        let lp = basis.project(dvec3(4.0, 2.0, -1.0));
        assert_abs_diff_eq!(lp.u, 3.0);
        assert_abs_diff_eq!(lp.w, -4.0);
        let p = basis.to_world(lp.u, lp.w);
        assert!((p - dvec3(4.0, 2.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_coincident_points_fall_back_to_orthonormal_basis() {
        let pts = vec![dvec3(1.0, 2.0, 3.0); 4];
        let basis = estimate_plane(&pts).unwrap();
        basis.validate().unwrap();
        assert!((basis.centroid - dvec3(1.0, 2.0, 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_collinear_points_fall_back_to_orthonormal_basis() {
        let pts: Vec<_> = (0..4).map(|i| DVec3::splat(i as f64)).collect();
        let basis = estimate_plane(&pts).unwrap();
        basis.validate().unwrap();
        let dir = DVec3::splat(1.0).normalize();
        assert_abs_diff_eq!(basis.basis_u.dot(dir).abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dominant_axis_orthogonal_to_seed_is_rejected() {
        // Dominant axis (1, -1, 0) is orthogonal to the (1, 1, 1) seed.
        let pts: Vec<_> = (-5..=5)
            .map(|i| {
                let t = i as f64;
                dvec3(t, -t, 0.1 * t * t)
            })
            .collect();
        match estimate_plane(&pts) {
            Err(FitError::UnresolvedPlane { captured, missed }) => {
                assert!(missed > captured, "captured {captured}, missed {missed}");
            }
            other => panic!("expected UnresolvedPlane, got {:?}", other),
        }
    }

    #[test]
    fn test_seed_reaching_only_minor_axes_is_rejected() {
        // Spreads 10, 9 and 8 along (1,-1,0), (1,1,0) and z: the seed has no
        // component on the first, so the plane it finds is the wrong one.
        let s = 0.5f64.sqrt();
        let axes = [(10.0, dvec3(s, -s, 0.0)), (9.0, dvec3(s, s, 0.0)), (8.0, DVec3::Z)];
        let pts: Vec<_> = axes
            .iter()
            .flat_map(|&(len, dir)| [dir * len, -dir * len])
            .collect();
        let err = estimate_plane(&pts).unwrap_err();
        assert!(matches!(err, FitError::UnresolvedPlane { .. }), "got {err}");
    }

    #[test]
    fn test_validate_rejects_skewed_basis() {
        let basis = PlaneBasis::new(DVec3::ZERO, DVec3::X, dvec3(1.0, 1.0, 0.0).normalize());
        assert!(basis.validate().is_err());
        let basis = PlaneBasis::new(DVec3::ZERO, DVec3::X * 2.0, DVec3::Y);
        assert!(basis.validate().is_err());
    }
}
