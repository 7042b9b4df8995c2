use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and unit normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Plane through `origin` spanned by two in-plane directions.
    pub fn from_span(origin: Point3, u: Vector3, w: Vector3) -> Self {
        Self::new(origin, u.cross(w))
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }
}
