//! Extensions for mapping foreign errors to `MergeResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| MergeError::…(e))` patterns
//! when converting external error types into the crate's
//! [`MergeResult<T>`](crate::MergeResult) alias.
//!
//! # Examples
//!
//! ```
//! use patchwork::{MergeResult, MergeResultExt};
//!
//! fn encode() -> MergeResult<serde_json::Value> {
//!     // serde_json::Error implements Into<MergeError>
//!     serde_json::to_value(42).into_merge()
//! }
//! # assert_eq!(encode().ok(), Some(serde_json::json!(42)));
//! ```

use crate::{MergeError, MergeResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<MergeError>`
/// into a `MergeResult<T>`.
pub trait MergeResultExt<T, E> {
    /// Convert `Result<T, E>` into `MergeResult<T>` using `Into<MergeError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into [`MergeError`].
    fn into_merge(self) -> MergeResult<T>;
}

impl<T, E> MergeResultExt<T, E> for Result<T, E>
where
    E: Into<MergeError>,
{
    fn into_merge(self) -> MergeResult<T> {
        self.map_err(Into::into)
    }
}
