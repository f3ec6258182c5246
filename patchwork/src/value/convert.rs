//! Conversions between engine values, JSON and typed data.

use std::sync::Arc;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned, ser::Error as _,
};
use serde_json::{Map, Value as Json};

use super::{Object, Value};
use crate::{MergeError, MergeResult, MergeResultExt, tag_of};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(flag) => Self::Bool(flag),
            Json::Number(number) => Self::Number(number),
            Json::String(text) => Self::String(text),
            Json::Array(items) => {
                Self::Array(Arc::new(items.into_iter().map(Self::from).collect()))
            }
            Json::Object(map) => Self::Object(Arc::new(Object::from(map))),
        }
    }
}

impl From<Map<String, Json>> for Object {
    fn from(map: Map<String, Json>) -> Self {
        map.into_iter().map(|(key, value)| (key, Value::from(value))).collect()
    }
}

impl TryFrom<&Value> for Json {
    type Error = MergeError;

    /// Objects drop opaque keys and `Undefined` entries, `Undefined` array
    /// elements become `null`, and custom values use
    /// [`crate::CustomValue::to_json`].
    fn try_from(value: &Value) -> MergeResult<Self> {
        Ok(match value {
            Value::Undefined | Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => Self::Number(number.clone()),
            Value::String(text) => Self::String(text.clone()),
            Value::Array(items) => Self::Array(
                items
                    .iter()
                    .map(Self::try_from)
                    .collect::<MergeResult<Vec<_>>>()?,
            ),
            Value::Object(object) => {
                let mut map = Map::with_capacity(object.len());
                for (name, entry) in object.named_entries() {
                    if !entry.is_undefined() {
                        map.insert(name.to_owned(), Self::try_from(entry)?);
                    }
                }
                Self::Object(map)
            }
            Value::Custom(custom) => custom
                .to_json()
                .ok_or_else(|| MergeError::Unrepresentable { tag: tag_of(value) })?,
        })
    }
}

impl TryFrom<Value> for Json {
    type Error = MergeError;

    fn try_from(value: Value) -> MergeResult<Self> {
        Self::try_from(&value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Json::try_from(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(feature = "toml")]
impl From<toml::Value> for Value {
    /// Datetimes become strings; non-finite floats become `Null`.
    fn from(document: toml::Value) -> Self {
        match document {
            toml::Value::String(text) => Self::String(text),
            toml::Value::Integer(number) => Self::from(number),
            toml::Value::Float(number) => Self::from(number),
            toml::Value::Boolean(flag) => Self::Bool(flag),
            toml::Value::Datetime(stamp) => Self::String(stamp.to_string()),
            toml::Value::Array(items) => items.into_iter().map(Self::from).collect(),
            toml::Value::Table(table) => Self::Object(Arc::new(
                table
                    .into_iter()
                    .map(|(key, entry)| (key, Self::from(entry)))
                    .collect(),
            )),
        }
    }
}

/// Deserialise merged output into `T`.
///
/// # Errors
///
/// Returns [`MergeError::Unrepresentable`] when the value holds a custom
/// value without a JSON form, or [`MergeError::Json`] when deserialisation
/// fails.
///
/// # Examples
///
/// ```rust
/// use patchwork::{Value, from_value};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct App { port: u16 }
///
/// let merged = patchwork::merge([
///     Value::from(json!({"port": 3000})),
///     Value::from(json!({"port": 8080})),
/// ])?;
/// let app: App = from_value(&merged)?;
/// assert_eq!(app.port, 8080);
/// # Ok::<_, patchwork::MergeError>(())
/// ```
pub fn from_value<T: DeserializeOwned>(value: &Value) -> MergeResult<T> {
    serde_json::from_value(Json::try_from(value)?).into_merge()
}

/// Serialise typed data into an engine value.
///
/// # Errors
///
/// Returns [`MergeError::Json`] when `T` cannot be represented as JSON.
pub fn to_value<T: Serialize>(data: &T) -> MergeResult<Value> {
    serde_json::to_value(data).into_merge().map(Value::from)
}
