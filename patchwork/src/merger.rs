//! The engine: rule and verb registries plus the four merge kinds.

use std::sync::Arc;

use crate::{
    MergeKind, MergeResult, MergeRule, MergerConfig, Object, OperationCallback,
    OperationRegistry, RuleRegistry, Tag, Value, rules, tag_of,
};

/// A merge engine with its own rule and verb registries.
///
/// Registration takes `&mut self` and merging takes `&self`, so a merge
/// never observes a registry mid-update.
///
/// # Examples
///
/// ```
/// use patchwork::{Merger, Value};
/// use serde_json::json;
///
/// let merger = Merger::default();
/// let merged = merger.merge([
///     Value::from(json!({"a": {"b": 1, "c": 2}})),
///     Value::from(json!({"a": {"c": 3, "d": 4}})),
/// ])?;
/// assert_eq!(merged, Value::from(json!({"a": {"b": 1, "c": 3, "d": 4}})));
/// # Ok::<_, patchwork::MergeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Merger {
    rules: RuleRegistry,
    operations: OperationRegistry,
    config: MergerConfig,
}

impl Default for Merger {
    fn default() -> Self {
        Self::build(MergerConfig::default())
    }
}

impl Merger {
    /// Create an engine with the default configuration and every built-in
    /// rule and verb.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom separators or key-sort mode.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::InvalidConfig`] when `config` fails
    /// [`MergerConfig::validate`].
    pub fn with_config(config: MergerConfig) -> MergeResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MergerConfig) -> Self {
        let mut rules = RuleRegistry::new();
        rules::register_builtins(&mut rules);
        Self {
            rules,
            operations: OperationRegistry::with_builtins(&config),
            config,
        }
    }

    /// Settings this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// The rule registry.
    #[must_use]
    pub const fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// The verb registry.
    #[must_use]
    pub const fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Merge one pair through the rule resolved for their tags.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::UnsupportedMergeType`] when no rule
    /// matches, or whatever the chosen rule reports.
    pub fn dispatch(&self, a: Value, b: Value, kind: MergeKind) -> MergeResult<Value> {
        let tag_a = tag_of(&a);
        let tag_b = tag_of(&b);
        let (tier, rule) = self.rules.resolve(&tag_a, &tag_b)?;
        tracing::trace!(%tag_a, %tag_b, ?tier, %kind, "dispatching merge rule");
        rule(self, a, b, kind)
    }

    /// Fold `values` left to right through [`Merger::dispatch`]. An empty
    /// input yields [`Value::Undefined`].
    ///
    /// # Errors
    ///
    /// Propagates the first dispatch failure.
    pub fn reduce<I>(&self, kind: MergeKind, values: I) -> MergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Ok(Value::Undefined);
        };
        values.try_fold(first, |acc, value| self.dispatch(acc, value, kind))
    }

    /// Merge into fresh containers; custom values are shared.
    ///
    /// # Errors
    ///
    /// Propagates rule and verb failures.
    pub fn merge<I>(&self, values: I) -> MergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        self.reduce(MergeKind::Merge, values)
    }

    /// Merge into fresh containers, deep-cloning custom values too.
    ///
    /// # Errors
    ///
    /// Propagates rule and verb failures.
    pub fn merge_clones<I>(&self, values: I) -> MergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        self.reduce(MergeKind::MergeClones, values)
    }

    /// Merge without touching the first value, returning it as-is when
    /// nothing changed.
    ///
    /// # Errors
    ///
    /// Propagates rule and verb failures.
    pub fn update<I>(&self, values: I) -> MergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        self.reduce(MergeKind::Update, values)
    }

    /// Apply `patches` to `target` in place, sharing every subtree that did
    /// not change.
    ///
    /// The call is all-or-nothing: on error `target` keeps the value it had
    /// before the call.
    ///
    /// # Errors
    ///
    /// Propagates rule and verb failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchwork::{Merger, Value};
    /// use serde_json::json;
    ///
    /// let merger = Merger::default();
    /// let mut config = Value::from(json!({"a": {"b": 1, "c": 2}}));
    /// merger.patch(&mut config, [Value::from(json!({"a": {"c": 3, "$unset": ["b"]}}))])?;
    /// assert_eq!(config, Value::from(json!({"a": {"c": 3}})));
    /// # Ok::<_, patchwork::MergeError>(())
    /// ```
    pub fn patch<I>(&self, target: &mut Value, patches: I) -> MergeResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        let patched = patches
            .into_iter()
            .try_fold(target.clone(), |acc, patch| self.dispatch(acc, patch, MergeKind::Patch))?;
        *target = patched;
        Ok(())
    }

    /// Bind `rule` to `tag_a` x `tag_b`, returning the rule it replaced.
    /// Use [`Tag::ANY`] on either side for a one-sided specialisation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::InvalidMergeTagA`] or
    /// [`crate::MergeError::InvalidMergeTagB`] for a blank tag.
    pub fn add_merge_rule<F>(
        &mut self,
        tag_a: impl Into<Tag>,
        tag_b: impl Into<Tag>,
        rule: F,
    ) -> MergeResult<Option<MergeRule>>
    where
        F: Fn(&Self, Value, Value, MergeKind) -> MergeResult<Value> + Send + Sync + 'static,
    {
        self.rules.insert(tag_a.into(), tag_b.into(), Arc::new(rule))
    }

    /// Unbind `tag_a` x `tag_b`, returning the removed rule. Removing the
    /// `Any` x `Any` fallback makes unmatched pairs fail.
    pub fn remove_merge_rule(&mut self, tag_a: &Tag, tag_b: &Tag) -> Option<MergeRule> {
        self.rules.remove(tag_a, tag_b)
    }

    /// Bind a verb, returning the callback it replaced. A name ending with
    /// the alternate separator runs with that separator.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::InvalidOperationName`] unless `name`
    /// starts with `$` and names something.
    pub fn add_operation<F>(
        &mut self,
        name: &str,
        callback: F,
    ) -> MergeResult<Option<OperationCallback>>
    where
        F: Fn(&mut Value, &Value, char) -> MergeResult<bool> + Send + Sync + 'static,
    {
        self.operations.insert(name, Arc::new(callback))
    }

    /// Returns `true` when `name` is a registered verb.
    #[must_use]
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains(name)
    }

    /// Run one verb against `target`, returning whether it changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::InvalidOperationName`] for an unknown
    /// verb, otherwise whatever the verb reports. Verbs that fail part way
    /// leave their earlier writes in place.
    pub fn perform_operation(
        &self,
        target: &mut Value,
        name: &str,
        params: &Value,
    ) -> MergeResult<bool> {
        self.operations.perform(target, name, params)
    }

    /// Remove the verb keys from `value`, returning them in order.
    pub fn extract_operations(&self, value: &mut Value) -> Object {
        self.operations.extract(value)
    }
}
