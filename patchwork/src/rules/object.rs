//! `Object` x `Object`: key-wise recursion plus deferred verbs.

use std::sync::Arc;

use crate::{
    Key, MergeError, MergeKind, MergeResult, Merger, Value,
    operations::{Classified, PendingOperation},
};

/// Merge two maps key by key.
///
/// The output enumerates `a`'s keys in `a`'s order, then `b`'s new data keys
/// in `b`'s order. A new key whose merged value is `Undefined` is left out.
/// Verb keys found in `b` never reach the output; they run against the
/// result, in `b`'s order, once every data key is placed.
///
/// `patch` writes into `a`. `update` builds a fresh map but returns `a`
/// itself when no key and no verb changed anything.
pub(crate) fn merge_objects(
    merger: &Merger,
    a: Value,
    b: Value,
    kind: MergeKind,
) -> MergeResult<Value> {
    let (left, right) = match (a, b) {
        (Value::Object(left), Value::Object(right)) => (left, right),
        (a_other, b_other) => return Err(MergeError::unsupported(&a_other, &b_other)),
    };
    let Classified { data, operations } = merger.operations().classify(&right);
    let is_operation = |key: &Key| {
        key.as_name()
            .is_some_and(|name| operations.iter().any(|operation| operation.name == name))
    };

    let mut changed = kind.returns_clone();
    let mut merged: Vec<(Key, Value)> = Vec::with_capacity(left.len() + data.len());
    for (key, current) in left.iter() {
        let counterpart = right.get_key(key).filter(|_| !is_operation(key));
        let result = match counterpart {
            Some(incoming) => merger.dispatch(current.clone(), incoming.clone(), kind)?,
            None => merger.dispatch(Value::Undefined, current.clone(), kind)?,
        };
        changed |= !result.same(current);
        merged.push((key.clone(), result));
    }
    for (key, incoming) in data {
        if left.contains(key) {
            continue;
        }
        let result = merger.dispatch(Value::Undefined, incoming.clone(), kind)?;
        if result.is_undefined() {
            continue;
        }
        changed = true;
        merged.push((key.clone(), result));
    }

    if kind.mutates_target() {
        let mut target = Value::Object(left);
        place_changed(&mut target, merged);
        apply_operations(merger, &mut target, &operations)?;
        return Ok(target);
    }
    let mut fresh = Value::Object(Arc::new(merged.into_iter().collect()));
    changed |= apply_operations(merger, &mut fresh, &operations)?;
    Ok(if changed { fresh } else { Value::Object(left) })
}

/// Write only the entries whose identity changed, so an untouched target is
/// never detached from its other holders.
fn place_changed(target: &mut Value, merged: Vec<(Key, Value)>) {
    for (key, result) in merged {
        let unchanged = target
            .as_object()
            .and_then(|object| object.get_key(&key))
            .is_some_and(|existing| existing.same(&result));
        if unchanged {
            continue;
        }
        if let Some(object) = target.object_mut() {
            object.insert(key, result);
        }
    }
}

fn apply_operations(
    merger: &Merger,
    target: &mut Value,
    operations: &[PendingOperation<'_>],
) -> MergeResult<bool> {
    let mut changed = false;
    for operation in operations {
        changed |= merger.perform_operation(target, operation.name, operation.params)?;
    }
    Ok(changed)
}
