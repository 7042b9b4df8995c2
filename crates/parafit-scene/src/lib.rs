pub mod store;

pub use store::{CurveId, CurveRecord, CurveStore};
