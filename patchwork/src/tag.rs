//! Shape tags used to select merge rules.

use std::{borrow::Cow, fmt};

use crate::Value;

/// Short textual classifier for a value's shape.
///
/// Built-in tags are provided as associated constants. Custom values supply
/// their own tag through [`crate::CustomValue::tag`]; by convention these are
/// `PascalCase`, optionally suffixed, e.g. `Object:Money`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    /// Wildcard used in rule keys; never produced by [`tag_of`].
    pub const ANY: Self = Self::from_static("Any");
    /// Tag of [`Value::Undefined`].
    pub const UNDEFINED: Self = Self::from_static("Undefined");
    /// Tag of [`Value::Null`].
    pub const NULL: Self = Self::from_static("Null");
    /// Tag of [`Value::Bool`].
    pub const BOOLEAN: Self = Self::from_static("Boolean");
    /// Tag of [`Value::Number`].
    pub const NUMBER: Self = Self::from_static("Number");
    /// Tag of [`Value::String`].
    pub const STRING: Self = Self::from_static("String");
    /// Tag of [`Value::Array`].
    pub const ARRAY: Self = Self::from_static("Array");
    /// Tag of [`Value::Object`].
    pub const OBJECT: Self = Self::from_static("Object");

    /// Build a tag from a static string without allocating.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Build a tag from any string.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Borrow the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the [`Tag::ANY`] wildcard.
    #[must_use]
    pub fn is_any(&self) -> bool {
        *self == Self::ANY
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Resolve the dispatch tag for `value`. Total over every input.
///
/// # Examples
///
/// ```
/// use patchwork::{Tag, Value, tag_of};
///
/// assert_eq!(tag_of(&Value::Undefined), Tag::UNDEFINED);
/// assert_eq!(tag_of(&Value::from(vec![Value::from(1)])), Tag::ARRAY);
/// assert_eq!(tag_of(&Value::from("text")), Tag::STRING);
/// ```
#[must_use]
pub fn tag_of(value: &Value) -> Tag {
    match value {
        Value::Undefined => Tag::UNDEFINED,
        Value::Null => Tag::NULL,
        Value::Bool(_) => Tag::BOOLEAN,
        Value::Number(_) => Tag::NUMBER,
        Value::String(_) => Tag::STRING,
        Value::Array(_) => Tag::ARRAY,
        Value::Object(_) => Tag::OBJECT,
        Value::Custom(custom) => custom.tag(),
    }
}
