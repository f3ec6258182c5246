//! The process-wide engine behind the crate's free functions.
//!
//! Merges share a read lock; registration takes the write lock. Rules and
//! verbs run under the read lock, so they must recurse through the `Merger`
//! they are handed rather than calling back into these functions to
//! register anything.

use std::sync::LazyLock;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{MergeKind, MergeResult, MergeRule, Merger, OperationCallback, Tag, Value};

static GLOBAL: LazyLock<RwLock<Merger>> = LazyLock::new(|| RwLock::new(Merger::default()));

/// Shared access to the process-wide engine, for inspection or for running
/// several merges under one lock.
#[must_use]
pub fn global() -> RwLockReadGuard<'static, Merger> {
    GLOBAL.read()
}

/// [`Merger::merge`] on the process-wide engine.
///
/// # Errors
///
/// Propagates rule and verb failures.
pub fn merge<I>(values: I) -> MergeResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    GLOBAL.read().reduce(MergeKind::Merge, values)
}

/// [`Merger::merge_clones`] on the process-wide engine.
///
/// # Errors
///
/// Propagates rule and verb failures.
pub fn merge_clones<I>(values: I) -> MergeResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    GLOBAL.read().reduce(MergeKind::MergeClones, values)
}

/// [`Merger::update`] on the process-wide engine.
///
/// # Errors
///
/// Propagates rule and verb failures.
pub fn update<I>(values: I) -> MergeResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    GLOBAL.read().reduce(MergeKind::Update, values)
}

/// [`Merger::patch`] on the process-wide engine.
///
/// # Errors
///
/// Propagates rule and verb failures; `target` is left as it was.
///
/// # Examples
///
/// ```
/// use patchwork::Value;
/// use serde_json::json;
///
/// let mut settings = Value::from(json!({"plugins": ["a"]}));
/// patchwork::patch(&mut settings, [Value::from(json!({"$push": {"plugins": "b"}}))])?;
/// assert_eq!(settings, Value::from(json!({"plugins": ["a", "b"]})));
/// # Ok::<_, patchwork::MergeError>(())
/// ```
pub fn patch<I>(target: &mut Value, patches: I) -> MergeResult<()>
where
    I: IntoIterator<Item = Value>,
{
    GLOBAL.read().patch(target, patches)
}

/// [`Merger::add_merge_rule`] on the process-wide engine.
///
/// # Errors
///
/// Returns [`crate::MergeError::InvalidMergeTagA`] or
/// [`crate::MergeError::InvalidMergeTagB`] for a blank tag.
pub fn add_merge_rule<F>(
    tag_a: impl Into<Tag>,
    tag_b: impl Into<Tag>,
    rule: F,
) -> MergeResult<Option<MergeRule>>
where
    F: Fn(&Merger, Value, Value, MergeKind) -> MergeResult<Value> + Send + Sync + 'static,
{
    let tag_a = tag_a.into();
    let tag_b = tag_b.into();
    let previous = GLOBAL
        .write()
        .add_merge_rule(tag_a.clone(), tag_b.clone(), rule)?;
    if previous.is_some() {
        tracing::warn!(%tag_a, %tag_b, "replaced a merge rule on the global engine");
    }
    Ok(previous)
}

/// [`Merger::add_operation`] on the process-wide engine.
///
/// # Errors
///
/// Returns [`crate::MergeError::InvalidOperationName`] for a malformed name.
pub fn add_operation<F>(name: &str, callback: F) -> MergeResult<Option<OperationCallback>>
where
    F: Fn(&mut Value, &Value, char) -> MergeResult<bool> + Send + Sync + 'static,
{
    let previous = GLOBAL.write().add_operation(name, callback)?;
    if previous.is_some() {
        tracing::warn!(verb = name, "replaced an operation on the global engine");
    }
    Ok(previous)
}
