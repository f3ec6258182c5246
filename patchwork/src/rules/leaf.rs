//! `Any` x `Any`: the catch-all.

use crate::{MergeKind, MergeResult, Merger, Tag, Value, tag_of};

/// `b` wins unless it is `Undefined`. Primitives pass through untouched.
/// Structured winners go to an `Undefined` x `<tag>` rule when one exists,
/// so a custom type needs only that one registration; otherwise they are
/// shared, or deep-cloned under [`MergeKind::MergeClones`].
pub(crate) fn merge_leaves(
    merger: &Merger,
    a: Value,
    b: Value,
    kind: MergeKind,
) -> MergeResult<Value> {
    let chosen = if b.is_undefined() { a } else { b };
    if !chosen.is_structured() {
        return Ok(chosen);
    }
    if let Some(rule) = merger.rules().get(&Tag::UNDEFINED, &tag_of(&chosen)) {
        return rule(merger, Value::Undefined, chosen, kind);
    }
    Ok(match kind {
        MergeKind::MergeClones => chosen.deep_clone(),
        MergeKind::Merge | MergeKind::Patch | MergeKind::Update => chosen,
    })
}
