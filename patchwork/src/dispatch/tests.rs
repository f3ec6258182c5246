//! Unit tests for rule registration and tiered resolution.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface broken invariants"
)]

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::{MergeRule, RuleRegistry, Tier};
use crate::{MergeError, Tag, Value};

fn constant(label: &'static str) -> MergeRule {
    Arc::new(move |_, _, _, _| Ok(Value::from(label)))
}

#[fixture]
fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    for (left, right, label) in [
        ("Money", "Money", "exact"),
        ("Money", "Any", "left"),
        ("Any", "Money", "right"),
        ("Any", "Any", "fallback"),
    ] {
        registry
            .insert(Tag::from(left), Tag::from(right), constant(label))
            .expect("valid tags");
    }
    registry
}

#[rstest]
#[case("Money", "Money", Tier::Exact)]
#[case("Money", "Number", Tier::LeftSpecific)]
#[case("String", "Money", Tier::RightSpecific)]
#[case("String", "Number", Tier::Fallback)]
fn resolves_in_tier_order(
    registry: RuleRegistry,
    #[case] left: &'static str,
    #[case] right: &'static str,
    #[case] expected: Tier,
) {
    let (tier, _) = registry
        .resolve(&Tag::from(left), &Tag::from(right))
        .expect("fallback present");
    assert_eq!(tier, expected);
}

#[rstest]
fn removing_the_fallback_makes_unmatched_pairs_fail(mut registry: RuleRegistry) {
    assert!(registry.remove(&Tag::ANY, &Tag::ANY).is_some());
    let err = registry
        .resolve(&Tag::STRING, &Tag::NUMBER)
        .err()
        .expect("no rule should match");
    assert!(matches!(
        err,
        MergeError::UnsupportedMergeType { ref tag_a, ref tag_b }
            if *tag_a == Tag::STRING && *tag_b == Tag::NUMBER
    ));
}

#[rstest]
fn insert_returns_the_replaced_rule(mut registry: RuleRegistry) {
    let previous = registry
        .insert(Tag::from("Money"), Tag::from("Money"), constant("newer"))
        .expect("valid tags");
    assert!(previous.is_some());
    assert_eq!(registry.len(), 4);
}

#[rstest]
#[case("", "Any")]
#[case("  ", "Any")]
fn rejects_blank_left_tags(#[case] left: &'static str, #[case] right: &'static str) {
    let err = RuleRegistry::new()
        .insert(Tag::from(left), Tag::from(right), constant("x"))
        .err()
        .expect("blank tag");
    assert!(matches!(err, MergeError::InvalidMergeTagA { .. }));
}

#[test]
fn rejects_blank_right_tags() {
    let err = RuleRegistry::new()
        .insert(Tag::OBJECT, Tag::from(""), constant("x"))
        .err()
        .expect("blank tag");
    assert!(matches!(err, MergeError::InvalidMergeTagB { .. }));
}

#[rstest]
fn debug_lists_rules_sorted(registry: RuleRegistry) {
    let rendered = format!("{registry:?}");
    assert!(rendered.contains("\"Any x Any\", \"Any x Money\""), "{rendered}");
}
