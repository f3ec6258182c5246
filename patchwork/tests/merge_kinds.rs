//! End-to-end behaviour of the four merge kinds.

use anyhow::{Context, Result, ensure};
use patchwork::{Merger, Value};
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::json::ensure_same_document;

#[fixture]
fn merger() -> Merger {
    Merger::default()
}

fn field<'v>(value: &'v Value, path: &[&str]) -> Result<&'v Value> {
    path.iter().try_fold(value, |current, name| {
        current
            .as_object()
            .and_then(|object| object.get(name))
            .with_context(|| format!("missing field '{name}'"))
    })
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(serde_json::Value::try_from(value)?)
}

#[rstest]
fn merge_combines_nested_maps(merger: Merger) -> Result<()> {
    let a = Value::from(json!({"a": {"b": 1, "c": 2}}));
    let b = Value::from(json!({"a": {"c": 3, "d": 4}}));
    let merged = merger.merge([a.clone(), b.clone()])?;
    ensure_same_document(&to_json(&merged)?, &json!({"a": {"b": 1, "c": 3, "d": 4}}))?;
    ensure!(!field(&merged, &["a"])?.same(field(&a, &["a"])?));
    ensure!(!field(&merged, &["a"])?.same(field(&b, &["a"])?));
    Ok(())
}

#[rstest]
fn merge_isolates_arrays_from_both_inputs(merger: Merger) -> Result<()> {
    let a = Value::from(json!({"a": [1]}));
    let b = Value::from(json!({"a": [2]}));
    let merged = merger.merge([a.clone(), b.clone()])?;
    let list = field(&merged, &["a"])?;
    ensure!(*list == Value::from(json!([2])));
    ensure!(!list.same(field(&a, &["a"])?) && !list.same(field(&b, &["a"])?));
    Ok(())
}

#[rstest]
fn merge_never_mutates_its_inputs(merger: Merger) -> Result<()> {
    let a = Value::from(json!({"keep": {"x": 1}, "drop": 2}));
    let b = Value::from(json!({"keep": {"y": 2}, "$unset": ["drop"]}));
    let snapshot = (a.deep_clone(), b.deep_clone());
    let merged = merger.merge([a.clone(), b.clone()])?;
    ensure!(merged == Value::from(json!({"keep": {"x": 1, "y": 2}})));
    ensure!(a == snapshot.0 && b == snapshot.1);
    Ok(())
}

#[rstest]
fn merge_folds_many_values_left_to_right(merger: Merger) -> Result<()> {
    let merged = merger.merge([
        Value::from(json!({"n": 1, "first": true})),
        Value::from(json!({"n": 2})),
        Value::from(json!({"n": 3, "last": true})),
    ])?;
    ensure_same_document(&to_json(&merged)?, &json!({"n": 3, "first": true, "last": true}))
}

#[rstest]
fn reduce_of_nothing_is_undefined(merger: Merger) -> Result<()> {
    ensure!(merger.merge(std::iter::empty())?.is_undefined());
    Ok(())
}

#[rstest]
fn a_single_value_passes_through(merger: Merger) -> Result<()> {
    let only = Value::from(json!({"a": 1}));
    ensure!(merger.update([only.clone()])?.same(&only));
    Ok(())
}

#[rstest]
#[case(json!({"x": 1, "y": {"z": [1, 2]}}))]
#[case(json!({"list": [], "nested": {}}))]
fn patch_with_an_empty_map_keeps_the_target(
    merger: Merger,
    #[case] document: serde_json::Value,
) -> Result<()> {
    let mut target = Value::from(document);
    let before = target.clone();
    merger.patch(&mut target, [Value::from(json!({}))])?;
    ensure!(target.same(&before));
    Ok(())
}

#[rstest]
fn patch_with_identical_primitives_keeps_the_target(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"x": 1}));
    let before = target.clone();
    merger.patch(&mut target, [Value::from(json!({"x": 1}))])?;
    ensure!(target.same(&before));
    Ok(())
}

#[rstest]
fn patch_replaces_arrays_rather_than_splicing(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"a": [1, 2]}));
    merger.patch(&mut target, [Value::from(json!({"a": [3]}))])?;
    ensure!(*field(&target, &["a"])? == Value::from(json!([3])));
    Ok(())
}

#[rstest]
fn patch_shares_untouched_siblings(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"big": {"deep": [1, 2, 3]}, "n": 1}));
    let big = field(&target, &["big"])?.clone();
    merger.patch(&mut target, [Value::from(json!({"n": 2}))])?;
    ensure!(field(&target, &["big"])?.same(&big));
    ensure!(*field(&target, &["n"])? == Value::from(2));
    Ok(())
}

#[rstest]
fn patch_applies_embedded_verbs(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"a": {"b": 1, "c": 2}}));
    merger.patch(&mut target, [Value::from(json!({"a": {"c": 3, "$unset": ["b"]}}))])?;
    ensure_same_document(&to_json(&target)?, &json!({"a": {"c": 3}}))
}

#[rstest]
fn patch_unset_at_the_top_level(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"a": 1}));
    merger.patch(&mut target, [Value::from(json!({"$unset": ["a"]}))])?;
    ensure!(target.as_object().is_some_and(|object| !object.contains_key("a")));
    Ok(())
}

#[rstest]
fn patch_is_all_or_nothing(merger: Merger) -> Result<()> {
    let mut target = Value::from(json!({"a": 1, "list": 5}));
    let before = target.clone();
    let failed = merger.patch(
        &mut target,
        [
            Value::from(json!({"a": 2})),
            Value::from(json!({"$push": {"list": 1}})),
        ],
    );
    ensure!(failed.is_err());
    ensure!(target.same(&before));
    Ok(())
}

#[rstest]
fn update_leaves_its_input_alone(merger: Merger) -> Result<()> {
    let original = Value::from(json!({"a": {"b": 1}, "c": 1}));
    let updated = merger.update([original.clone(), Value::from(json!({"c": 2}))])?;
    ensure!(original == Value::from(json!({"a": {"b": 1}, "c": 1})));
    ensure!(*field(&updated, &["c"])? == Value::from(2));
    ensure!(field(&updated, &["a"])?.same(field(&original, &["a"])?));
    Ok(())
}

#[rstest]
fn merge_clones_deep_copies_everything(merger: Merger) -> Result<()> {
    let a = Value::from(json!({"a": {"b": [1, {"c": 2}]}}));
    let merged = merger.merge_clones([a.clone(), Value::from(json!({}))])?;
    ensure!(merged == a);
    let original = field(&a, &["a", "b"])?;
    let copy = field(&merged, &["a", "b"])?;
    ensure!(!copy.same(original));
    Ok(())
}

#[rstest]
fn right_undefined_entries_keep_left_values(merger: Merger) -> Result<()> {
    let right = Value::object([("x", Value::Undefined), ("y", Value::from(2))]);
    let merged = merger.merge([Value::from(json!({"x": 1})), right])?;
    ensure_same_document(&to_json(&merged)?, &json!({"x": 1, "y": 2}))
}
