//! Tag-pair rule registry and its four-tier resolution.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{MergeError, MergeKind, MergeResult, Merger, Tag, Value};

/// A merge rule: given both operands and the kind, produce the merged value.
///
/// Rules receive the running [`Merger`] so they can recurse through
/// [`Merger::dispatch`].
pub type MergeRule =
    Arc<dyn Fn(&Merger, Value, Value, MergeKind) -> MergeResult<Value> + Send + Sync>;

/// Ordered pair of tags identifying a rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleKey {
    /// Tag of the left operand, or [`Tag::ANY`].
    pub left: Tag,
    /// Tag of the right operand, or [`Tag::ANY`].
    pub right: Tag,
}

impl RuleKey {
    /// Pair two tags.
    #[must_use]
    pub const fn new(left: Tag, right: Tag) -> Self {
        Self { left, right }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.left, self.right)
    }
}

/// Which probe of the resolution order found a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// Exact left tag, exact right tag.
    Exact,
    /// Exact left tag, `Any` on the right.
    LeftSpecific,
    /// `Any` on the left, exact right tag.
    RightSpecific,
    /// `Any` x `Any`.
    Fallback,
}

/// Mapping from tag pairs to rules.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<RuleKey, MergeRule>,
}

impl RuleRegistry {
    /// Create an empty registry. Without an `Any` x `Any` rule every
    /// unmatched pair fails with [`MergeError::UnsupportedMergeType`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `rule` to `left` x `right`, returning the rule it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidMergeTagA`] or
    /// [`MergeError::InvalidMergeTagB`] when a tag is blank.
    pub fn insert(
        &mut self,
        left: Tag,
        right: Tag,
        rule: MergeRule,
    ) -> MergeResult<Option<MergeRule>> {
        if left.as_str().trim().is_empty() {
            return Err(MergeError::InvalidMergeTagA {
                tag: left.as_str().to_owned(),
                reason: "tag must not be blank",
            });
        }
        if right.as_str().trim().is_empty() {
            return Err(MergeError::InvalidMergeTagB {
                tag: right.as_str().to_owned(),
                reason: "tag must not be blank",
            });
        }
        let key = RuleKey::new(left, right);
        let previous = self.rules.insert(key.clone(), rule);
        if previous.is_some() {
            tracing::debug!(rule = %key, "replaced merge rule");
        }
        Ok(previous)
    }

    /// Unbind `left` x `right`, returning the removed rule.
    pub fn remove(&mut self, left: &Tag, right: &Tag) -> Option<MergeRule> {
        self.rules
            .remove(&RuleKey::new(left.clone(), right.clone()))
    }

    /// Exact lookup with no fallback.
    #[must_use]
    pub fn get(&self, left: &Tag, right: &Tag) -> Option<&MergeRule> {
        self.rules.get(&RuleKey::new(left.clone(), right.clone()))
    }

    /// Returns `true` when `left` x `right` is bound exactly.
    #[must_use]
    pub fn contains(&self, left: &Tag, right: &Tag) -> bool {
        self.get(left, right).is_some()
    }

    /// Number of bound rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rule is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the rule for `left` x `right`, probing exact x exact, exact x
    /// `Any`, `Any` x exact and finally `Any` x `Any`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::UnsupportedMergeType`] when no probe matches,
    /// which only happens once the fallback has been removed.
    pub fn resolve(&self, left: &Tag, right: &Tag) -> MergeResult<(Tier, &MergeRule)> {
        let any = Tag::ANY;
        let probes = [
            (Tier::Exact, left, right),
            (Tier::LeftSpecific, left, &any),
            (Tier::RightSpecific, &any, right),
            (Tier::Fallback, &any, &any),
        ];
        probes
            .into_iter()
            .find_map(|(tier, probe_left, probe_right)| {
                self.get(probe_left, probe_right).map(|rule| (tier, rule))
            })
            .ok_or_else(|| MergeError::unsupported_tags(left, right))
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.rules.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("RuleRegistry").field("rules", &keys).finish()
    }
}

#[cfg(test)]
mod tests;
