//! The value graph the engine merges.
//!
//! Containers are reference counted so that "sharing by reference" is a
//! pointer copy and identity is observable through [`Value::same`]. Mutation
//! goes through [`Arc::make_mut`], so a caller holding a clone of an input
//! never sees it change.

mod convert;
mod custom;
mod object;

use std::sync::Arc;

pub use convert::{from_value, to_value};
pub use custom::CustomValue;
pub use object::{Key, Object, Symbol};

/// Any datum flowing through the engine.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absence of a value. Merging `Undefined` on the right keeps the left.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean primitive.
    Bool(bool),
    /// Numeric primitive.
    Number(serde_json::Number),
    /// String primitive.
    String(String),
    /// Ordered, index-addressed sequence.
    Array(Arc<Vec<Value>>),
    /// Insertion-ordered keyed map.
    Object(Arc<Object>),
    /// Value of a caller-defined type carrying its own tag.
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Wrap a custom value.
    #[must_use]
    pub fn custom(value: impl CustomValue) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Build an object value from key/value pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::Value;
    ///
    /// let value = Value::object([("b", Value::from(1)), ("a", Value::from(2))]);
    /// let keys: Vec<_> = value
    ///     .as_object()
    ///     .into_iter()
    ///     .flat_map(|object| object.names())
    ///     .collect();
    /// assert_eq!(keys, ["b", "a"]);
    /// ```
    #[must_use]
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(Arc::new(entries.into_iter().collect()))
    }

    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for containers and custom values.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_) | Self::Custom(_))
    }

    /// Borrow the map when this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrow the elements when this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the text when this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the custom value when this is one.
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(custom) => Some(custom.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to the map, detaching it from other holders first.
    pub fn object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(object) => Some(Arc::make_mut(object)),
            _ => None,
        }
    }

    /// Mutable access to the elements, detaching them from other holders
    /// first.
    pub fn array_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Array(items) => Some(Arc::make_mut(items)),
            _ => None,
        }
    }

    /// Identity comparison: containers and custom values compare by
    /// allocation, primitives by value.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::Value;
    ///
    /// let list = Value::from(vec![Value::from(1)]);
    /// assert!(list.same(&list.clone()));
    /// assert!(!list.same(&Value::from(vec![Value::from(1)])));
    /// assert!(Value::from(3).same(&Value::from(3)));
    /// ```
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ if self.is_structured() || other.is_structured() => false,
            _ => self == other,
        }
    }

    /// Copy the whole graph so that no container or custom value is shared
    /// with `self`.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::Array(items) => {
                Self::from(items.iter().map(Self::deep_clone).collect::<Vec<_>>())
            }
            Self::Object(object) => Self::Object(Arc::new(
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), value.deep_clone()))
                    .collect(),
            )),
            Self::Custom(custom) => Self::Custom(custom.deep_clone()),
            primitive => primitive.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b) || a.eq_value(b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(number.into())
    }
}

impl From<u64> for Value {
    fn from(number: u64) -> Self {
        Self::Number(number.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no numeric representation and become `Null`.
    fn from(number: f64) -> Self {
        serde_json::Number::from_f64(number).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(Arc::new(items))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(Arc::new(object))
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
