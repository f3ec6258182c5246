//! Built-in structural merge rules.

mod array;
mod leaf;
mod object;
mod undefined;

use std::sync::Arc;

use crate::{RuleRegistry, Tag};

pub(crate) use array::merge_arrays;
pub(crate) use leaf::merge_leaves;
pub(crate) use object::merge_objects;
pub(crate) use undefined::{undefined_array, undefined_object};

/// Bind every built-in rule into `registry`.
pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    let builtins: [(Tag, Tag, crate::MergeRule); 5] = [
        (Tag::ARRAY, Tag::ARRAY, Arc::new(merge_arrays)),
        (Tag::OBJECT, Tag::OBJECT, Arc::new(merge_objects)),
        (Tag::UNDEFINED, Tag::ARRAY, Arc::new(undefined_array)),
        (Tag::UNDEFINED, Tag::OBJECT, Arc::new(undefined_object)),
        (Tag::ANY, Tag::ANY, Arc::new(merge_leaves)),
    ];
    for (left, right, rule) in builtins {
        // Built-in tags are never blank.
        if let Err(err) = registry.insert(left, right, rule) {
            tracing::error!(error = %err, "failed to register built-in merge rule");
        }
    }
}
