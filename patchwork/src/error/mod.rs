//! Error types produced by the merge engine.

mod constructors;
mod conversions;
mod types;

pub use types::MergeError;

/// Result alias used by every fallible engine entry point.
pub type MergeResult<T> = Result<T, MergeError>;
