//! Small vector helpers on top of glam.

use parafit_core::Tolerance;

use crate::{Point3, Vector3};

/// Arithmetic mean of a point set, `None` when the set is empty.
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point3::ZERO, |acc, &p| acc + p);
    Some(sum / points.len() as f64)
}

/// Normalize `v`, or return `None` when its length is below the normalization tolerance.
pub fn try_normalize(v: Vector3, tol: Tolerance) -> Option<Vector3> {
    let len = v.length();
    if !len.is_finite() || tol.is_null_length(len) {
        None
    } else {
        Some(v / len)
    }
}

/// Remove the component of `v` along the unit vector `axis` (one Gram-Schmidt step).
pub fn reject_from(v: Vector3, axis: Vector3) -> Vector3 {
    v - axis * v.dot(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;

    #[test]
    fn test_centroid() {
        let pts = vec![dvec3(0.0, 0.0, 0.0), dvec3(2.0, 4.0, 6.0), dvec3(1.0, -1.0, 0.0)];
        let c = centroid(&pts).unwrap();
        assert_abs_diff_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_try_normalize() {
        let tol = Tolerance::default();
        let n = try_normalize(dvec3(3.0, 0.0, 4.0), tol).unwrap();
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert!(try_normalize(Vector3::ZERO, tol).is_none());
        assert!(try_normalize(dvec3(1e-14, 0.0, 0.0), tol).is_none());
    }

    #[test]
    fn test_reject_from() {
        let r = reject_from(dvec3(1.0, 1.0, 0.0), Vector3::X);
        assert!((r - Vector3::Y).length() < 1e-12);
    }
}
