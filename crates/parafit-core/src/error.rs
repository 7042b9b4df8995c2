use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Degenerate input: too few usable points ({points} point(s) supplied)")]
    DegenerateInput { points: usize },

    #[error("Degenerate input: dominant spread missed by the iteration seed (captured {captured:e}, missed {missed:e})")]
    UnresolvedPlane { captured: f64, missed: f64 },

    #[error("Singular system: normal-equation determinant {determinant:e} is below tolerance")]
    SingularSystem { determinant: f64 },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Coarse classification of a [`FitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitErrorKind {
    /// Too few points, or points that cannot span a plane.
    DegenerateInput,
    /// The least-squares system has no unique solution.
    SingularSystem,
    /// Everything outside the fitting engine (parsing, IO, lookups, configuration).
    Input,
}

impl FitError {
    pub fn kind(&self) -> FitErrorKind {
        match self {
            FitError::DegenerateInput { .. } | FitError::UnresolvedPlane { .. } => {
                FitErrorKind::DegenerateInput
            }
            FitError::SingularSystem { .. } => FitErrorKind::SingularSystem,
            _ => FitErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, FitError>;
