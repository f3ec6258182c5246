//! Capability hook for caller-defined value types.

use std::{any::Any, fmt, sync::Arc};

use crate::Tag;

/// A value type that supplies its own dispatch tag.
///
/// Registering a single `Undefined` x `<tag>` rule is enough to plug such a
/// type into cloning and merging: the catch-all rule delegates to it whenever
/// a custom value is carried into the output.
///
/// # Examples
///
/// ```
/// use std::{any::Any, sync::Arc};
/// use patchwork::{CustomValue, Tag, Value, tag_of};
///
/// #[derive(Debug, PartialEq)]
/// struct Money(i64);
///
/// impl CustomValue for Money {
///     fn tag(&self) -> Tag {
///         Tag::from_static("Object:Money")
///     }
///
///     fn deep_clone(&self) -> Arc<dyn CustomValue> {
///         Arc::new(Money(self.0))
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// assert_eq!(tag_of(&Value::custom(Money(5))).as_str(), "Object:Money");
/// ```
pub trait CustomValue: fmt::Debug + Send + Sync + 'static {
    /// Dispatch tag for this value.
    fn tag(&self) -> Tag;

    /// Produce an independent copy.
    fn deep_clone(&self) -> Arc<dyn CustomValue>;

    /// Borrow as [`Any`] so custom rules can downcast.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another custom value.
    ///
    /// The default only recognises the very same allocation, which
    /// [`crate::Value`]'s `PartialEq` already checks before calling this.
    fn eq_value(&self, _other: &dyn CustomValue) -> bool {
        false
    }

    /// JSON form used when serialising merged output.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}
