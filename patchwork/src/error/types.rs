//! Primary error enum for merge, patch and operation failures.

use figment::Error as FigmentError;
use thiserror::Error;

use crate::Tag;

/// Errors raised while merging values or running declarative operations.
///
/// Every error aborts the call that raised it. Operations run in order, so a
/// failing verb observed through [`crate::Merger::perform_operation`] leaves
/// the target holding whatever the earlier verbs wrote.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// No rule, not even the `Any` x `Any` fallback, matched a tag pair.
    #[error("unsupported merge type: no rule registered for {tag_a} x {tag_b}")]
    UnsupportedMergeType {
        /// Tag of the left operand.
        tag_a: Tag,
        /// Tag of the right operand.
        tag_b: Tag,
    },

    /// An operation name was rejected at registration time.
    #[error("invalid operation name '{name}': {reason}")]
    InvalidOperationName {
        /// Name supplied by the caller.
        name: String,
        /// Constraint the name violated.
        reason: &'static str,
    },

    /// The left tag of a merge rule registration was rejected.
    #[error("invalid merge tag for the left operand '{tag}': {reason}")]
    InvalidMergeTagA {
        /// Tag supplied by the caller.
        tag: String,
        /// Constraint the tag violated.
        reason: &'static str,
    },

    /// The right tag of a merge rule registration was rejected.
    #[error("invalid merge tag for the right operand '{tag}': {reason}")]
    InvalidMergeTagB {
        /// Tag supplied by the caller.
        tag: String,
        /// Constraint the tag violated.
        reason: &'static str,
    },

    /// A verb ran against a value of the wrong shape.
    #[error("{verb}: invalid operation target: {reason}")]
    InvalidOperationTarget {
        /// Verb that rejected its target.
        verb: String,
        /// Constraint the target violated.
        reason: String,
    },

    /// A verb received parameters of the wrong shape or an unusable path.
    #[error("{verb}: invalid operation params: {reason}")]
    InvalidOperationParams {
        /// Verb that rejected its parameters.
        verb: String,
        /// Constraint the parameters violated.
        reason: String,
    },

    /// A custom value offered no JSON representation.
    #[error("value tagged '{tag}' has no JSON representation")]
    Unrepresentable {
        /// Tag of the offending value.
        tag: Tag,
    },

    /// JSON encoding or decoding failed while converting merged output.
    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be gathered from its providers.
    #[error("failed to load merger configuration: {0}")]
    Config(#[from] Box<FigmentError>),

    /// Configuration values were gathered but are unusable together.
    #[error("invalid merger configuration: {reason}")]
    InvalidConfig {
        /// Explanation of the conflict.
        reason: String,
    },
}
