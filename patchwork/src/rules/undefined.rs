//! `Undefined` x `Array` and `Undefined` x `Object`: a value with nothing to
//! merge into.

use std::sync::Arc;

use crate::{MergeKind, MergeResult, Merger, Value};

use super::{merge_arrays, merge_objects};

pub(crate) fn undefined_array(
    merger: &Merger,
    _a: Value,
    b: Value,
    kind: MergeKind,
) -> MergeResult<Value> {
    if kind.returns_clone() {
        return merge_arrays(merger, Value::Array(Arc::default()), b, kind);
    }
    Ok(b)
}

/// Cloning kinds merge into an empty map. `patch` and `update` still pull
/// any embedded verbs out of `b` and apply them to it, exactly as an
/// `Object` x `Object` merge would.
pub(crate) fn undefined_object(
    merger: &Merger,
    _a: Value,
    b: Value,
    kind: MergeKind,
) -> MergeResult<Value> {
    if kind.returns_clone() {
        return merge_objects(merger, Value::Object(Arc::default()), b, kind);
    }
    let mut data = b;
    let operations = merger.extract_operations(&mut data);
    merger.dispatch(data, Value::from(operations), kind)
}
