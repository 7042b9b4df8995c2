//! Symmetric 3x3 matrix.

use serde::{Deserialize, Serialize};

use crate::{DMat3, Point3, Vector3};

/// A symmetric 3x3 matrix stored as its six unique entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymMat3 {
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub yy: f64,
    pub yz: f64,
    pub zz: f64,
}

impl SymMat3 {
    pub const ZERO: Self = Self {
        xx: 0.0,
        xy: 0.0,
        xz: 0.0,
        yy: 0.0,
        yz: 0.0,
        zz: 0.0,
    };

    pub fn new(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Self {
        Self {
            xx,
            xy,
            xz,
            yy,
            yz,
            zz,
        }
    }

    /// Outer product `v ⊗ v`.
    pub fn outer(v: Vector3) -> Self {
        Self::new(
            v.x * v.x,
            v.x * v.y,
            v.x * v.z,
            v.y * v.y,
            v.y * v.z,
            v.z * v.z,
        )
    }

    /// Scatter matrix `Σ (p - mean)(p - mean)ᵀ` of a point set around `mean`.
    ///
    /// Not divided by the point count; only the directions of its
    /// eigenvectors are used downstream.
    pub fn covariance(points: &[Point3], mean: Point3) -> Self {
        points.iter().fold(Self::ZERO, |acc, &p| {
            let d = p - mean;
            acc + Self::outer(d)
        })
    }

    pub fn trace(&self) -> f64 {
        self.xx + self.yy + self.zz
    }

    pub fn mul_vec(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.xx * v.x + self.xy * v.y + self.xz * v.z,
            self.xy * v.x + self.yy * v.y + self.yz * v.z,
            self.xz * v.x + self.yz * v.y + self.zz * v.z,
        )
    }

    /// `self - scale * (v ⊗ v)`.
    pub fn sub_scaled_outer(&self, v: Vector3, scale: f64) -> Self {
        *self - Self::outer(v) * scale
    }

    /// `vᵀ M v / vᵀ v`, the variance captured along `v`.
    pub fn rayleigh_quotient(&self, v: Vector3) -> f64 {
        let denom = v.length_squared();
        if denom == 0.0 {
            return 0.0;
        }
        v.dot(self.mul_vec(v)) / denom
    }

    pub fn to_dmat3(&self) -> DMat3 {
        DMat3::from_cols(
            Vector3::new(self.xx, self.xy, self.xz),
            Vector3::new(self.xy, self.yy, self.yz),
            Vector3::new(self.xz, self.yz, self.zz),
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.xx, self.xy, self.xz, self.yy, self.yz, self.zz]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl std::ops::Add for SymMat3 {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::new(
            self.xx + o.xx,
            self.xy + o.xy,
            self.xz + o.xz,
            self.yy + o.yy,
            self.yz + o.yz,
            self.zz + o.zz,
        )
    }
}

impl std::ops::Sub for SymMat3 {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::new(
            self.xx - o.xx,
            self.xy - o.xy,
            self.xz - o.xz,
            self.yy - o.yy,
            self.yz - o.yz,
            self.zz - o.zz,
        )
    }
}

impl std::ops::Mul<f64> for SymMat3 {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(
            self.xx * s,
            self.xy * s,
            self.xz * s,
            self.yy * s,
            self.yz * s,
            self.zz * s,
        )
    }
}
