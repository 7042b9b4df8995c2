pub mod config;
pub mod error;
pub mod tolerance;
pub mod traits;

pub use config::FitConfig;
pub use error::{FitError, FitErrorKind, Result};
pub use tolerance::Tolerance;
