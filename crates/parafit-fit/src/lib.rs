//! Parafit fitting engine: best-fit plane, quadratic least squares, and
//! reconstruction of the fitted parabola in world space.

pub mod curve;
pub mod fit;
pub mod plane;
pub mod quadratic;
pub mod tessellate;

pub use curve::{Curve, FittedCurve};
pub use fit::{fit_many, fit_spatial_parabola, fit_spatial_parabola_with, FitResult};
pub use plane::{estimate_plane, estimate_plane_with, LocalPoint, PlaneBasis};
pub use quadratic::{fit_quadratic, NormalSums, QuadraticCoefficients};
