//! Constructors for the verb and dispatch variants of `MergeError`.

use super::MergeError;
use crate::{Tag, Value, tag_of};

impl MergeError {
    /// Construct an [`MergeError::UnsupportedMergeType`] naming the tags of
    /// both operands.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::{MergeError, Value};
    ///
    /// let err = MergeError::unsupported(&Value::Undefined, &Value::from(1));
    /// assert_eq!(
    ///     err.to_string(),
    ///     "unsupported merge type: no rule registered for Undefined x Number"
    /// );
    /// ```
    #[must_use]
    pub fn unsupported(a: &Value, b: &Value) -> Self {
        Self::UnsupportedMergeType {
            tag_a: tag_of(a),
            tag_b: tag_of(b),
        }
    }

    /// Construct an [`MergeError::UnsupportedMergeType`] from tags already
    /// resolved by the dispatcher.
    #[must_use]
    pub fn unsupported_tags(tag_a: &Tag, tag_b: &Tag) -> Self {
        Self::UnsupportedMergeType {
            tag_a: tag_a.clone(),
            tag_b: tag_b.clone(),
        }
    }

    /// Construct an [`MergeError::InvalidOperationTarget`] for `verb`.
    #[must_use]
    pub fn target(verb: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOperationTarget {
            verb: verb.to_owned(),
            reason: reason.into(),
        }
    }

    /// Construct an [`MergeError::InvalidOperationParams`] for `verb`.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::MergeError;
    ///
    /// let err = MergeError::params("$set", "expected a keyed map");
    /// assert!(matches!(err, MergeError::InvalidOperationParams { .. }));
    /// assert_eq!(err.to_string(), "$set: invalid operation params: expected a keyed map");
    /// ```
    #[must_use]
    pub fn params(verb: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOperationParams {
            verb: verb.to_owned(),
            reason: reason.into(),
        }
    }
}
