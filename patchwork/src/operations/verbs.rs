//! Built-in verb implementations.

use std::{collections::HashMap, sync::Arc};

use super::{OperationCallback, key_sort};
use crate::{
    KeySortMode, MergeError, MergeResult, Object, Value,
    path::{self, Path, Segment},
    tag_of,
};

pub(crate) const SET: &str = "$set";
pub(crate) const UNSET: &str = "$unset";
pub(crate) const OMIT: &str = "$omit";
pub(crate) const LEAVE: &str = "$leave";
pub(crate) const PICK: &str = "$pick";
pub(crate) const PUSH: &str = "$push";
pub(crate) const PULL: &str = "$pull";
pub(crate) const CONCAT: &str = "$concat";
pub(crate) const DEFAULT: &str = "$default";
pub(crate) const DEFAULTS: &str = "$defaults";

/// Primary spellings of every built-in verb, synonyms included.
pub(crate) fn builtins(key_sort: KeySortMode) -> [(&'static str, OperationCallback); 12] {
    let sort = key_sort::key_sort_order(key_sort);
    [
        (SET, Arc::new(set)),
        (UNSET, Arc::new(unset)),
        (OMIT, Arc::new(unset)),
        (LEAVE, Arc::new(leave)),
        (PICK, Arc::new(leave)),
        (PUSH, Arc::new(push)),
        (PULL, Arc::new(pull)),
        (CONCAT, Arc::new(concat)),
        (DEFAULT, Arc::new(default)),
        (DEFAULTS, Arc::new(default)),
        (key_sort::KEY_SORT_ORDER, Arc::clone(&sort)),
        (key_sort::PROP_SORT_ORDER, sort),
    ]
}

/// `$set`: write each `path: value` pair.
pub(crate) fn set(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(SET, target)?;
    let mut changed = false;
    for (raw, value) in keyed_params(SET, params)?.named_entries() {
        changed |= write(SET, target, &exact_path(SET, raw, separator)?, value.clone())?;
    }
    Ok(changed)
}

/// `$unset` / `$omit`: remove each listed path. Wildcards are honoured.
pub(crate) fn unset(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(UNSET, target)?;
    let mut changed = false;
    for raw in sequence_params(UNSET, params)? {
        let parsed = Path::parse(raw, separator)
            .map_err(|err| MergeError::params(UNSET, err.to_string()))?;
        changed |= path::unset(target, &parsed);
    }
    Ok(changed)
}

/// `$leave` / `$pick`: keep only the listed paths, level by level.
pub(crate) fn leave(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(LEAVE, target)?;
    let paths = sequence_params(LEAVE, params)?
        .into_iter()
        .map(|raw| exact_path(LEAVE, raw, separator))
        .collect::<MergeResult<Vec<_>>>()?;
    let requested: Vec<&[Segment<'_>]> = paths.iter().map(Path::segments).collect();
    let Some(kept) = target.as_object().and_then(|object| pruned(object, &requested)) else {
        return Ok(false);
    };
    *target = Value::from(kept);
    Ok(true)
}

/// The entries of `object` reachable by `requested`, or `None` when that is
/// all of them. Opaque keys are out of reach of paths and always survive.
fn pruned(object: &Object, requested: &[&[Segment<'_>]]) -> Option<Object> {
    let mut groups: HashMap<&str, Vec<&[Segment<'_>]>> = HashMap::new();
    for segments in requested {
        if let Some((Segment::Key(first), rest)) = segments.split_first() {
            groups.entry(*first).or_default().push(rest);
        }
    }
    let mut kept = Object::with_capacity(object.len());
    let mut changed = false;
    for (key, value) in object.iter() {
        let Some(name) = key.as_name() else {
            kept.insert(key.clone(), value.clone());
            continue;
        };
        match groups.get(name) {
            None => changed = true,
            Some(rests) if rests.iter().any(|rest| rest.is_empty()) => {
                kept.insert(key.clone(), value.clone());
            }
            Some(rests) => {
                let nested = value.as_object().and_then(|child| pruned(child, rests));
                changed |= nested.is_some();
                kept.insert(key.clone(), nested.map_or_else(|| value.clone(), Value::from));
            }
        }
    }
    changed.then_some(kept)
}

/// `$push`: append each value to the sequence at its path.
pub(crate) fn push(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(PUSH, target)?;
    let mut changed = false;
    for (raw, value) in keyed_params(PUSH, params)?.named_entries() {
        let parsed = exact_path(PUSH, raw, separator)?;
        let mut items = sequence_at(PUSH, target, &parsed)?;
        items.push(value.clone());
        changed |= write(PUSH, target, &parsed, Value::from(items))?;
    }
    Ok(changed)
}

/// `$pull`: per path, remove the last element deep-equal to the given value
/// or to any of the given values.
pub(crate) fn pull(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(PULL, target)?;
    let mut changed = false;
    for (raw, unwanted) in keyed_params(PULL, params)?.named_entries() {
        let parsed = exact_path(PULL, raw, separator)?;
        let candidates: &[Value] = match unwanted {
            Value::Array(values) => values.as_slice(),
            single => std::slice::from_ref(single),
        };
        let mut items = sequence_at(PULL, target, &parsed)?;
        let Some(position) = items.iter().rposition(|item| candidates.contains(item)) else {
            continue;
        };
        items.remove(position);
        changed |= write(PULL, target, &parsed, Value::from(items))?;
    }
    Ok(changed)
}

/// `$concat`: append a value, or every element of a sequence, to the
/// sequence at its path.
pub(crate) fn concat(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(CONCAT, target)?;
    let mut changed = false;
    for (raw, tail) in keyed_params(CONCAT, params)?.named_entries() {
        let parsed = exact_path(CONCAT, raw, separator)?;
        let mut items = sequence_at(CONCAT, target, &parsed)?;
        match tail {
            // Already a sequence with nothing to add.
            Value::Array(extra) if extra.is_empty() && path::has(target, &parsed) => continue,
            Value::Array(extra) => items.extend(extra.iter().cloned()),
            single => items.push(single.clone()),
        }
        changed |= write(CONCAT, target, &parsed, Value::from(items))?;
    }
    Ok(changed)
}

/// `$default` / `$defaults`: write each `path: value` pair where nothing is
/// set yet.
pub(crate) fn default(target: &mut Value, params: &Value, separator: char) -> MergeResult<bool> {
    expect_object_target(DEFAULT, target)?;
    let mut changed = false;
    for (raw, value) in keyed_params(DEFAULT, params)?.named_entries() {
        let parsed = exact_path(DEFAULT, raw, separator)?;
        changed |= path::default_to(target, &parsed, value.clone())
            .map_err(|err| MergeError::params(DEFAULT, err.to_string()))?;
    }
    Ok(changed)
}

pub(super) fn expect_object_target(verb: &str, target: &Value) -> MergeResult<()> {
    match target {
        Value::Object(_) => Ok(()),
        other => Err(MergeError::target(
            verb,
            format!("expected a keyed map, found {}", tag_of(other)),
        )),
    }
}

fn keyed_params<'p>(verb: &str, params: &'p Value) -> MergeResult<&'p Object> {
    params.as_object().ok_or_else(|| {
        MergeError::params(verb, format!("expected a keyed map of paths, found {}", tag_of(params)))
    })
}

pub(super) fn sequence_params<'p>(verb: &str, params: &'p Value) -> MergeResult<Vec<&'p str>> {
    let items = params.as_array().ok_or_else(|| {
        MergeError::params(verb, format!("expected a sequence of paths, found {}", tag_of(params)))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| {
                MergeError::params(verb, format!("expected path strings, found {}", tag_of(item)))
            })
        })
        .collect()
}

pub(super) fn exact_path<'p>(verb: &str, raw: &'p str, separator: char) -> MergeResult<Path<'p>> {
    Path::parse_exact(raw, separator).map_err(|err| MergeError::params(verb, err.to_string()))
}

fn write(verb: &str, target: &mut Value, at: &Path<'_>, value: Value) -> MergeResult<bool> {
    path::set(target, at, value).map_err(|err| MergeError::params(verb, err.to_string()))
}

/// Copy of the sequence at `at`; a missing or `Undefined` slot reads as
/// empty.
fn sequence_at(verb: &str, target: &Value, at: &Path<'_>) -> MergeResult<Vec<Value>> {
    match path::get(target, at) {
        None | Some(Value::Undefined) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.to_vec()),
        Some(other) => Err(MergeError::target(
            verb,
            format!("'{}' holds {}, not a sequence", at.as_str(), tag_of(other)),
        )),
    }
}
