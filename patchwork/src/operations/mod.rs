//! Declarative verbs embedded in merge input.
//!
//! A key of a right-hand map whose name is a registered verb is not data: it
//! is split off before the structural merge and applied to the merged result
//! afterwards. Every verb has a primary spelling bound to the default path
//! separator and an alternate spelling, the primary name suffixed with the
//! alternate separator, bound to that separator.

mod key_sort;
mod verbs;

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Key, MergeError, MergeResult, MergerConfig, Object, Value};

pub use key_sort::sort_keys;

/// First character of every verb name.
pub const SIGIL: char = '$';

/// A verb implementation: mutate `target` according to `params`, splitting
/// paths on the separator bound to the spelling that was invoked. Returns
/// `true` when the target changed.
pub type OperationCallback =
    Arc<dyn Fn(&mut Value, &Value, char) -> MergeResult<bool> + Send + Sync>;

#[derive(Clone)]
struct Binding {
    callback: OperationCallback,
    separator: char,
}

/// A verb found in a right-hand map, waiting for the data keys to be placed.
#[derive(Clone, Copy, Debug)]
pub struct PendingOperation<'o> {
    /// Registered verb name.
    pub name: &'o str,
    /// Parameters given under that name.
    pub params: &'o Value,
}

/// A right-hand map split into data entries and verbs, both in map order.
#[derive(Debug, Default)]
pub struct Classified<'o> {
    /// Entries merged as data.
    pub data: Vec<(&'o Key, &'o Value)>,
    /// Entries applied as verbs.
    pub operations: Vec<PendingOperation<'o>>,
}

/// Verb names and their callbacks.
#[derive(Clone)]
pub struct OperationRegistry {
    bindings: HashMap<String, Binding>,
    separator: char,
    alternate_separator: char,
}

impl OperationRegistry {
    /// Create a registry with no verbs, binding names to the given
    /// separators.
    #[must_use]
    pub fn new(separator: char, alternate_separator: char) -> Self {
        Self {
            bindings: HashMap::new(),
            separator,
            alternate_separator,
        }
    }

    /// Create a registry holding every built-in verb in both spellings.
    #[must_use]
    pub fn with_builtins(config: &MergerConfig) -> Self {
        let mut registry = Self::new(config.separator, config.alternate_separator);
        for (name, callback) in verbs::builtins(config.key_sort) {
            let alternate = format!("{name}{}", config.alternate_separator);
            for spelling in [name, alternate.as_str()] {
                // Built-in names always carry the sigil.
                if let Err(err) = registry.insert(spelling, Arc::clone(&callback)) {
                    tracing::error!(error = %err, "failed to register built-in verb");
                }
            }
        }
        registry
    }

    /// Bind `callback` to `name`, returning the callback it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidOperationName`] unless `name` is the
    /// sigil followed by at least one non-blank character.
    pub fn insert(
        &mut self,
        name: &str,
        callback: OperationCallback,
    ) -> MergeResult<Option<OperationCallback>> {
        validate_name(name)?;
        let binding = Binding {
            callback,
            separator: self.separator_for(name),
        };
        let previous = self
            .bindings
            .insert(name.to_owned(), binding)
            .map(|replaced| replaced.callback);
        if previous.is_some() {
            tracing::debug!(verb = name, "replaced operation");
        }
        Ok(previous)
    }

    /// Unbind `name`, returning its callback.
    pub fn remove(&mut self, name: &str) -> Option<OperationCallback> {
        self.bindings.remove(name).map(|binding| binding.callback)
    }

    /// Returns `true` when `name` is a registered verb.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The callback bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OperationCallback> {
        self.bindings.get(name).map(|binding| &binding.callback)
    }

    /// Separator a verb registered as `name` would split its paths on.
    #[must_use]
    pub fn separator_for(&self, name: &str) -> char {
        if name.ends_with(self.alternate_separator) {
            self.alternate_separator
        } else {
            self.separator
        }
    }

    /// Registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Run the verb `name` against `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidOperationName`] for an unknown verb,
    /// otherwise whatever the verb reports.
    pub fn perform(&self, target: &mut Value, name: &str, params: &Value) -> MergeResult<bool> {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| MergeError::InvalidOperationName {
                name: name.to_owned(),
                reason: "no operation is registered under this name",
            })?;
        tracing::trace!(verb = name, separator = %binding.separator, "performing operation");
        (binding.callback)(target, params, binding.separator)
    }

    /// Split `object` into data entries and verbs in one pass.
    #[must_use]
    pub fn classify<'o>(&self, object: &'o Object) -> Classified<'o> {
        let mut classified = Classified::default();
        for (key, value) in object.iter() {
            match key.as_name().filter(|name| self.contains(name)) {
                Some(name) => classified.operations.push(PendingOperation {
                    name,
                    params: value,
                }),
                None => classified.data.push((key, value)),
            }
        }
        classified
    }

    /// Remove every verb key from `value` and return them, in order, as a
    /// map from name to parameters. Non-objects yield an empty map.
    pub fn extract(&self, value: &mut Value) -> Object {
        let names: Vec<String> = value.as_object().map_or_else(Vec::new, |object| {
            object
                .names()
                .filter(|name| self.contains(name))
                .map(str::to_owned)
                .collect()
        });
        if names.is_empty() {
            return Object::new();
        }
        let Some(object) = value.object_mut() else {
            return Object::new();
        };
        names
            .into_iter()
            .filter_map(|name| object.remove(&name).map(|params| (name, params)))
            .collect()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins(&MergerConfig::default())
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("OperationRegistry")
            .field("verbs", &names)
            .field("separator", &self.separator)
            .field("alternate_separator", &self.alternate_separator)
            .finish()
    }
}

fn validate_name(name: &str) -> MergeResult<()> {
    let Some(rest) = name.strip_prefix(SIGIL) else {
        return Err(MergeError::InvalidOperationName {
            name: name.to_owned(),
            reason: "operation names must start with '$'",
        });
    };
    if rest.trim().is_empty() {
        return Err(MergeError::InvalidOperationName {
            name: name.to_owned(),
            reason: "operation names need at least one character after '$'",
        });
    }
    Ok(())
}
