use crate::error::Result;

/// Validate structural integrity of a derived geometric value.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
