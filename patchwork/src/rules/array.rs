//! `Array` x `Array`: the right-hand sequence wins wholesale.

use crate::{MergeError, MergeKind, MergeResult, Merger, Value};

/// Arrays are never spliced. Cloning kinds rebuild the right-hand sequence
/// element by element; `patch` and `update` hand it over as is.
pub(crate) fn merge_arrays(
    merger: &Merger,
    a: Value,
    b: Value,
    kind: MergeKind,
) -> MergeResult<Value> {
    let items = match b {
        Value::Array(items) => items,
        other => return Err(MergeError::unsupported(&a, &other)),
    };
    if !kind.returns_clone() {
        return Ok(Value::Array(items));
    }
    items
        .iter()
        .map(|item| merger.dispatch(Value::Undefined, item.clone(), kind))
        .collect::<MergeResult<Vec<_>>>()
        .map(Value::from)
}
