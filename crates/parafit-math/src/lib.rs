pub mod plane;
pub mod power;
pub mod sym;
pub mod vector;

pub use glam::{DMat3, DVec3};
pub use plane::Plane;
pub use power::power_iteration;
pub use sym::SymMat3;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
