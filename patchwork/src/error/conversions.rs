//! Trait-based conversions between external error types and `MergeError`.

use figment::Error as FigmentError;

use super::MergeError;

impl From<FigmentError> for MergeError {
    fn from(e: FigmentError) -> Self {
        Self::Config(Box::new(e))
    }
}

impl From<MergeError> for FigmentError {
    /// Allow using `?` in tests that return `figment::Error`, such as
    /// closures passed to `figment::Jail`.
    fn from(e: MergeError) -> Self {
        match e {
            // Preserve the original Figment error (keeps kind, metadata, and sources).
            MergeError::Config(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
