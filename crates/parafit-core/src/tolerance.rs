/// Numeric thresholds used by the fitting engine.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Below this magnitude a vector is treated as zero and cannot be normalized.
    pub normalization: f64,
    /// Below this absolute value the normal-equation determinant is treated as singular.
    pub determinant: f64,
    /// Below this width a projected `u` range is treated as empty.
    pub range: f64,
}

impl Tolerance {
    pub const DEFAULT_NORMALIZATION: f64 = 1e-12;
    pub const DEFAULT_DETERMINANT: f64 = 1e-10;
    pub const DEFAULT_RANGE: f64 = 1e-12;

    /// Orthonormality checks on derived bases use this slack.
    pub const ORTHONORMAL: f64 = 1e-6;

    /// Spread below this fraction of the total scatter is treated as absent.
    pub const SPREAD: f64 = 1e-9;

    pub fn new(normalization: f64, determinant: f64, range: f64) -> Self {
        Self {
            normalization,
            determinant,
            range,
        }
    }

    pub fn default_precision() -> Self {
        Self {
            normalization: Self::DEFAULT_NORMALIZATION,
            determinant: Self::DEFAULT_DETERMINANT,
            range: Self::DEFAULT_RANGE,
        }
    }

    /// Check if a vector length is too small to normalize
    pub fn is_null_length(self, length: f64) -> bool {
        length < self.normalization
    }

    /// Check if a determinant is numerically singular
    pub fn is_singular(self, det: f64) -> bool {
        !det.is_finite() || det.abs() < self.determinant
    }

    /// Check if a range width is effectively zero
    pub fn is_empty_range(self, width: f64) -> bool {
        width.abs() < self.range
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
