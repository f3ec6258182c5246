//! Separator-delimited addressing into nested values.
//!
//! Paths only reach addressable (textual) keys. Numeric segments index into
//! arrays. Mutating helpers confirm there is something to change before
//! detaching any shared container, so a no-op never disturbs identity.

use std::sync::Arc;

use thiserror::Error;

use crate::{Object, Value};

/// Separator used by the primary verb spellings.
pub const DEFAULT_SEPARATOR: char = '.';

/// Separator used by the alternate verb spellings, for keys that contain
/// dots.
pub const ALTERNATE_SEPARATOR: char = '›';

/// Segment matching every addressable child.
pub const WILDCARD: &str = "*";

/// How far past the end of an array a write may land. The gap is padded
/// with `Undefined`.
pub const MAX_INDEX_GAP: usize = 1024;

/// Reasons a path string is rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path was the empty string.
    #[error("path is empty")]
    Empty,
    /// Two separators were adjacent, or the path began or ended with one.
    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment {
        /// Offending path.
        path: String,
        /// Zero-based segment index.
        position: usize,
    },
    /// A wildcard appeared where only concrete keys are allowed.
    #[error("path '{path}' uses a wildcard, which this operation does not support")]
    Wildcard {
        /// Offending path.
        path: String,
    },
    /// A write addressed an array index too far past its end.
    #[error("path '{path}' writes index {index} of an array holding {len} items")]
    IndexOutOfRange {
        /// Offending path.
        path: String,
        /// Requested index.
        index: usize,
        /// Length of the array at that point.
        len: usize,
    },
}

/// One step of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A concrete key or array index.
    Key(&'a str),
    /// `*`, matching every addressable child.
    Wildcard,
}

/// A parsed path borrowing from its source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<'a> {
    raw: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> Path<'a> {
    /// Parse `raw`, accepting wildcard segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] or [`PathError::EmptySegment`].
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::path::{Path, Segment};
    ///
    /// let path = Path::parse("a.*.b", '.')?;
    /// assert_eq!(path.segments(), [Segment::Key("a"), Segment::Wildcard, Segment::Key("b")]);
    /// # Ok::<_, patchwork::path::PathError>(())
    /// ```
    pub fn parse(raw: &'a str, separator: char) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = raw
            .split(separator)
            .enumerate()
            .map(|(position, segment)| match segment {
                "" => Err(PathError::EmptySegment {
                    path: raw.to_owned(),
                    position,
                }),
                WILDCARD => Ok(Segment::Wildcard),
                name => Ok(Segment::Key(name)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { raw, segments })
    }

    /// Parse `raw`, rejecting wildcard segments.
    ///
    /// # Errors
    ///
    /// As [`Path::parse`], plus [`PathError::Wildcard`].
    pub fn parse_exact(raw: &'a str, separator: char) -> Result<Self, PathError> {
        let path = Self::parse(raw, separator)?;
        if path.has_wildcard() {
            return Err(PathError::Wildcard {
                path: raw.to_owned(),
            });
        }
        Ok(path)
    }

    /// The source text.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Returns `true` when any segment is a wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }
}

/// Read the value at `path`.
#[must_use]
pub fn get<'v>(value: &'v Value, path: &Path<'_>) -> Option<&'v Value> {
    get_segments(value, path.segments())
}

/// Returns `true` when `path` holds something other than `Undefined`.
#[must_use]
pub fn has(value: &Value, path: &Path<'_>) -> bool {
    get(value, path).is_some_and(|found| !found.is_undefined())
}

/// Write `new_value` at `path`, creating intermediate objects and replacing
/// intermediate primitives. Returns `false` when the very same value was
/// already there.
///
/// # Errors
///
/// Returns [`PathError::IndexOutOfRange`], before touching `value`, when an
/// array index lies more than [`MAX_INDEX_GAP`] past the array's end.
pub fn set(value: &mut Value, path: &Path<'_>, new_value: Value) -> Result<bool, PathError> {
    if get(value, path).is_some_and(|existing| existing.same(&new_value)) {
        return Ok(false);
    }
    check_indices(value, path)?;
    Ok(set_segments(value, path.segments(), new_value))
}

/// Write `new_value` at `path` only when [`has`] is `false`.
///
/// # Errors
///
/// As [`set`].
pub fn default_to(
    value: &mut Value,
    path: &Path<'_>,
    new_value: Value,
) -> Result<bool, PathError> {
    if has(value, path) {
        return Ok(false);
    }
    set(value, path, new_value)
}

/// Remove whatever `path` addresses. Wildcards remove every matching child.
pub fn unset(value: &mut Value, path: &Path<'_>) -> bool {
    reaches(value, path.segments()) && unset_segments(value, path.segments())
}

/// Delete and reinsert the object entry at `path`, moving it to the end of
/// its parent's enumeration order. A no-op for array elements.
pub fn relocate(value: &mut Value, path: &Path<'_>) -> bool {
    let Some((Segment::Key(name), parents)) = path.segments().split_last() else {
        return false;
    };
    let present = get_segments(value, parents)
        .and_then(Value::as_object)
        .is_some_and(|parent| parent.contains_key(name));
    present
        && descend_mut(value, parents)
            .and_then(Value::object_mut)
            .is_some_and(|parent| parent.relocate(name))
}

/// Every leaf path in enumeration order, depth first.
///
/// Primitives, custom values, and containers without addressable children
/// are leaves. Opaque keys are skipped.
///
/// # Examples
///
/// ```
/// use patchwork::{Value, path::flatten};
/// use serde_json::json;
///
/// let value = Value::from(json!({"a": {"b": 1, "c": [true]}, "d": {}}));
/// assert_eq!(flatten(&value, '.'), ["a.b", "a.c.0", "d"]);
/// ```
#[must_use]
pub fn flatten(value: &Value, separator: char) -> Vec<String> {
    let mut leaves = Vec::new();
    flatten_into(value, None, separator, &mut leaves);
    leaves
}

fn flatten_into(value: &Value, prefix: Option<&str>, separator: char, leaves: &mut Vec<String>) {
    let join = |name: &str| {
        prefix.map_or_else(|| name.to_owned(), |parent| format!("{parent}{separator}{name}"))
    };
    match value {
        Value::Object(object) if object.names().next().is_some() => {
            for (name, child) in object.named_entries() {
                flatten_into(child, Some(&join(name)), separator, leaves);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, Some(&join(&index.to_string())), separator, leaves);
            }
        }
        _ => leaves.extend(prefix.map(str::to_owned)),
    }
}

fn child<'v>(value: &'v Value, name: &str) -> Option<&'v Value> {
    match value {
        Value::Object(object) => object.get(name),
        Value::Array(items) => name.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'v>(value: &'v mut Value, name: &str) -> Option<&'v mut Value> {
    match value {
        Value::Object(object) => Arc::make_mut(object).get_mut(name),
        Value::Array(items) => {
            let index = name.parse::<usize>().ok()?;
            Arc::make_mut(items).get_mut(index)
        }
        _ => None,
    }
}

fn get_segments<'v>(value: &'v Value, segments: &[Segment<'_>]) -> Option<&'v Value> {
    segments.iter().try_fold(value, |current, segment| match segment {
        Segment::Key(name) => child(current, name),
        Segment::Wildcard => None,
    })
}

fn descend_mut<'v>(value: &'v mut Value, segments: &[Segment<'_>]) -> Option<&'v mut Value> {
    segments.iter().try_fold(value, |current, segment| match segment {
        Segment::Key(name) => child_mut(current, name),
        Segment::Wildcard => None,
    })
}

/// Walk the existing part of `path` and reject array writes that would pad
/// beyond [`MAX_INDEX_GAP`]. Containers `set` creates are always objects, so
/// only arrays already present need checking.
fn check_indices(value: &Value, path: &Path<'_>) -> Result<(), PathError> {
    let mut current = Some(value);
    for segment in path.segments() {
        let (Some(found), Segment::Key(name)) = (current, segment) else {
            break;
        };
        if let (Value::Array(items), Ok(index)) = (found, name.parse::<usize>()) {
            let within = items
                .len()
                .checked_add(MAX_INDEX_GAP)
                .is_some_and(|limit| index <= limit);
            if !within {
                return Err(PathError::IndexOutOfRange {
                    path: path.as_str().to_owned(),
                    index,
                    len: items.len(),
                });
            }
        }
        current = child(found, name);
    }
    Ok(())
}

/// Slot for `name` under `value`, creating containers as `set` requires.
fn child_slot<'v>(value: &'v mut Value, name: &str) -> Option<&'v mut Value> {
    let array_index = match &*value {
        Value::Array(_) => name.parse::<usize>().ok(),
        _ => None,
    };
    if let Some(index) = array_index {
        let items = value.array_mut()?;
        let len = index.checked_add(1)?;
        if items.len() < len {
            items.resize(len, Value::Undefined);
        }
        return items.get_mut(index);
    }
    if !matches!(value, Value::Object(_)) {
        *value = Value::Object(Arc::new(Object::new()));
    }
    value.object_mut().map(|object| object.slot(name))
}

fn set_segments(value: &mut Value, segments: &[Segment<'_>], new_value: Value) -> bool {
    match segments.split_first() {
        None => {
            *value = new_value;
            true
        }
        Some((Segment::Key(name), rest)) => {
            child_slot(value, name).is_some_and(|slot| set_segments(slot, rest, new_value))
        }
        Some((Segment::Wildcard, _)) => false,
    }
}

fn addressable_children(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(object) => object
            .named_entries()
            .map(|(name, child)| (name.to_owned(), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (index.to_string(), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether unsetting `segments` would remove anything.
fn reaches(value: &Value, segments: &[Segment<'_>]) -> bool {
    match segments.split_first() {
        None => false,
        Some((Segment::Key(name), [])) => child(value, name).is_some(),
        Some((Segment::Wildcard, [])) => !addressable_children(value).is_empty(),
        Some((Segment::Key(name), rest)) => {
            child(value, name).is_some_and(|next| reaches(next, rest))
        }
        Some((Segment::Wildcard, rest)) => addressable_children(value)
            .into_iter()
            .any(|(_, next)| reaches(next, rest)),
    }
}

fn unset_segments(value: &mut Value, segments: &[Segment<'_>]) -> bool {
    match segments.split_first() {
        None => false,
        Some((last, [])) => remove_child(value, *last),
        Some((Segment::Key(name), rest)) => {
            child(value, name).is_some_and(|next| reaches(next, rest))
                && child_mut(value, name).is_some_and(|next| unset_segments(next, rest))
        }
        Some((Segment::Wildcard, rest)) => {
            let matching: Vec<String> = addressable_children(value)
                .into_iter()
                .filter(|(_, next)| reaches(next, rest))
                .map(|(name, _)| name)
                .collect();
            let mut removed = false;
            for name in matching {
                removed |= child_mut(value, &name).is_some_and(|next| unset_segments(next, rest));
            }
            removed
        }
    }
}

fn remove_child(value: &mut Value, segment: Segment<'_>) -> bool {
    match (value, segment) {
        (Value::Object(object), Segment::Key(name)) => {
            object.contains_key(name) && Arc::make_mut(object).remove(name).is_some()
        }
        (Value::Object(object), Segment::Wildcard) => {
            let had_names = object.names().next().is_some();
            if had_names {
                Arc::make_mut(object).retain(|key, _| key.is_opaque());
            }
            had_names
        }
        (Value::Array(items), Segment::Key(name)) => match name.parse::<usize>() {
            Ok(index) if index < items.len() => {
                Arc::make_mut(items).remove(index);
                true
            }
            _ => false,
        },
        (Value::Array(items), Segment::Wildcard) => {
            let had_items = !items.is_empty();
            if had_items {
                Arc::make_mut(items).clear();
            }
            had_items
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests;
