//! `$keySortOrder`: reorder keys without touching values.

use std::{collections::HashSet, sync::Arc};

use super::{
    OperationCallback,
    verbs::{exact_path, expect_object_target, sequence_params},
};
use crate::{
    KeySortMode, MergeResult, Value,
    path::{self, Path},
};

pub(crate) const KEY_SORT_ORDER: &str = "$keySortOrder";
pub(crate) const PROP_SORT_ORDER: &str = "$propSortOrder";

pub(super) fn key_sort_order(mode: KeySortMode) -> OperationCallback {
    Arc::new(move |target: &mut Value, params: &Value, separator: char| {
        let paths = sequence_params(KEY_SORT_ORDER, params)?;
        sort_keys(target, &paths, separator, mode)
    })
}

/// Move the keys named by `paths` to the end of their parents, in the given
/// order, then move every other addressable key after them in its original
/// order.
///
/// The remainder is moved leaf by leaf. Before a leaf moves, each of its
/// containers that was not itself named in `paths` moves too, the first time
/// it is seen, so unsorted keys holding nested values also land behind the
/// sorted ones. Array-index keys still enumerate first and opaque keys keep
/// their place ahead of everything relocated. Under
/// [`KeySortMode::Compatible`] leaves beneath a sorted path are relocated a
/// second time with the remainder. Paths that do not exist are skipped.
///
/// Returns `false`, leaving `target` untouched, when the enumeration order
/// comes out unchanged.
///
/// # Errors
///
/// Returns [`crate::MergeError::InvalidOperationTarget`] when `target` is not
/// an object and [`crate::MergeError::InvalidOperationParams`] for a
/// malformed or wildcard path.
///
/// # Examples
///
/// ```
/// use patchwork::{KeySortMode, Value, operations::sort_keys};
/// use serde_json::json;
///
/// let mut value = Value::from(json!({"x": 1, "y": 2, "z": 3}));
/// assert!(sort_keys(&mut value, &["z"], '.', KeySortMode::Compatible)?);
/// let keys: Vec<_> = value.as_object().into_iter().flat_map(|o| o.names()).collect();
/// assert_eq!(keys, ["z", "x", "y"]);
/// # Ok::<_, patchwork::MergeError>(())
/// ```
pub fn sort_keys(
    target: &mut Value,
    paths: &[&str],
    separator: char,
    mode: KeySortMode,
) -> MergeResult<bool> {
    expect_object_target(KEY_SORT_ORDER, target)?;
    let requested = paths
        .iter()
        .map(|raw| exact_path(KEY_SORT_ORDER, raw, separator))
        .collect::<MergeResult<Vec<_>>>()?;
    let original = target.clone();
    let mut unsorted = path::flatten(target, separator);
    for sorted in &requested {
        if path::get(target, sorted).is_none() {
            continue;
        }
        let exact = sorted.as_str();
        unsorted.retain(|leaf| leaf != exact);
        if mode == KeySortMode::Strict {
            let prefix = format!("{exact}{separator}");
            unsorted.retain(|leaf| !leaf.starts_with(&prefix));
        }
        path::relocate(target, sorted);
    }
    let explicit: HashSet<&str> = requested.iter().map(Path::as_str).collect();
    let mut moved: HashSet<&str> = HashSet::new();
    for leaf in &unsorted {
        let Ok(parsed) = Path::parse_exact(leaf, separator) else {
            continue;
        };
        for ancestor in ancestors(leaf, separator) {
            if explicit.contains(ancestor) || !moved.insert(ancestor) {
                continue;
            }
            if let Ok(container) = Path::parse_exact(ancestor, separator) {
                path::relocate(target, &container);
            }
        }
        path::relocate(target, &parsed);
    }
    if same_layout(&original, target) {
        *target = original;
        return Ok(false);
    }
    Ok(true)
}

/// Proper prefixes of `leaf` that end on a segment boundary, outermost first.
fn ancestors(leaf: &str, separator: char) -> impl Iterator<Item = &str> {
    leaf.match_indices(separator).filter_map(move |(end, _)| leaf.get(..end))
}

/// Whether both values enumerate the same keys in the same order at every
/// level.
fn same_layout(before: &Value, after: &Value) -> bool {
    if before.same(after) {
        return true;
    }
    match (before, after) {
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|((left_key, left_value), (right_key, right_value))| {
                        left_key == right_key && same_layout(left_value, right_value)
                    })
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left_item, right_item)| same_layout(left_item, right_item))
        }
        _ => true,
    }
}
