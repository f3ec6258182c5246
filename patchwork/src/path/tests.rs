//! Unit tests for path parsing and path-addressed reads and writes.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface broken invariants"
)]

use rstest::{fixture, rstest};
use serde_json::json;

use super::{Path, PathError, Segment, default_to, flatten, get, has, relocate, set, unset};
use crate::{Symbol, Value};

fn path(raw: &str) -> Path<'_> {
    Path::parse(raw, '.').expect("valid path")
}

fn json(value: &Value) -> serde_json::Value {
    serde_json::Value::try_from(value).expect("convertible")
}

#[fixture]
fn document() -> Value {
    Value::from(json!({
        "a": {"b": 1, "c": [10, 20, {"d": true}]},
        "e": "text",
    }))
}

#[rstest]
#[case("", PathError::Empty)]
#[case("a..b", PathError::EmptySegment { path: "a..b".into(), position: 1 })]
#[case(".a", PathError::EmptySegment { path: ".a".into(), position: 0 })]
fn rejects_malformed_paths(#[case] raw: &str, #[case] expected: PathError) {
    assert_eq!(Path::parse(raw, '.'), Err(expected));
}

#[test]
fn exact_parsing_rejects_wildcards() {
    assert!(matches!(
        Path::parse_exact("a.*", '.'),
        Err(PathError::Wildcard { .. })
    ));
}

#[test]
fn alternate_separator_keeps_dotted_keys_whole() {
    let parsed = Path::parse("files›tsconfig.json", '›').expect("valid path");
    assert_eq!(
        parsed.segments(),
        [Segment::Key("files"), Segment::Key("tsconfig.json")]
    );
}

#[rstest]
#[case("a.b", Some(json!(1)))]
#[case("a.c.1", Some(json!(20)))]
#[case("a.c.2.d", Some(json!(true)))]
#[case("a.c.9", None)]
#[case("e.length", None)]
fn reads_nested_values(
    document: Value,
    #[case] raw: &str,
    #[case] expected: Option<serde_json::Value>,
) {
    assert_eq!(get(&document, &path(raw)).map(json), expected);
}

#[rstest]
fn has_treats_undefined_as_absent(document: Value) {
    let mut value = document;
    assert_eq!(set(&mut value, &path("gap"), Value::Undefined), Ok(true));
    assert!(!has(&value, &path("gap")));
    assert!(has(&value, &path("a.b")));
}

#[rstest]
fn set_creates_intermediate_objects(document: Value) {
    let mut value = document;
    assert_eq!(set(&mut value, &path("x.y.z"), Value::from(5)), Ok(true));
    assert_eq!(get(&value, &path("x.y.z")), Some(&Value::from(5)));
}

#[rstest]
fn set_replaces_primitive_intermediates(document: Value) {
    let mut value = document;
    assert_eq!(set(&mut value, &path("e.inner"), Value::from(1)), Ok(true));
    assert_eq!(json(&value)["e"], json!({"inner": 1}));
}

#[rstest]
fn set_pads_arrays_when_writing_past_the_end(document: Value) {
    let mut value = document;
    assert_eq!(set(&mut value, &path("a.c.4"), Value::from(50)), Ok(true));
    assert_eq!(json(&value)["a"]["c"], json!([10, 20, {"d": true}, null, 50]));
}

#[rstest]
#[case("a.c.18446744073709551615")]
#[case("a.c.4000000000")]
#[case("a.c.1028")]
fn set_rejects_indices_far_past_the_end(document: Value, #[case] raw: &str) {
    let mut value = document;
    let before = value.clone();
    let err = set(&mut value, &path(raw), Value::from(1)).expect_err("gap too large");
    assert!(matches!(err, PathError::IndexOutOfRange { len: 3, .. }));
    assert!(value.same(&before));
}

#[rstest]
fn set_accepts_the_largest_allowed_gap(document: Value) {
    let mut value = document;
    assert_eq!(set(&mut value, &path("a.c.1027"), Value::from(1)), Ok(true));
    let items = get(&value, &path("a.c")).and_then(Value::as_array).map(<[Value]>::len);
    assert_eq!(items, Some(1028));
}

#[rstest]
fn default_rejects_indices_far_past_the_end(document: Value) {
    let mut value = document;
    assert!(default_to(&mut value, &path("a.c.99999"), Value::from(1)).is_err());
}

#[rstest]
fn setting_the_same_value_preserves_identity(document: Value) {
    let mut value = document;
    let before = value.clone();
    assert_eq!(set(&mut value, &path("a.b"), Value::from(1)), Ok(false));
    assert!(value.same(&before));
}

#[rstest]
fn set_leaves_the_original_untouched(document: Value) {
    let original = document.clone();
    let mut value = document;
    assert_eq!(set(&mut value, &path("a.b"), Value::from(2)), Ok(true));
    assert_eq!(get(&original, &path("a.b")), Some(&Value::from(1)));
}

#[rstest]
fn default_only_fills_missing_paths(document: Value) {
    let mut value = document;
    assert_eq!(default_to(&mut value, &path("a.b"), Value::from(5)), Ok(false));
    assert_eq!(default_to(&mut value, &path("a.f"), Value::from(5)), Ok(true));
    assert_eq!(json(&value)["a"]["b"], json!(1));
    assert_eq!(json(&value)["a"]["f"], json!(5));
}

#[rstest]
#[case("a.b", json!({"a": {"c": [10, 20, {"d": true}]}, "e": "text"}))]
#[case("a.c.0", json!({"a": {"b": 1, "c": [20, {"d": true}]}, "e": "text"}))]
#[case("a.*", json!({"a": {}, "e": "text"}))]
#[case("a.c.*.d", json!({"a": {"b": 1, "c": [10, 20, {}]}, "e": "text"}))]
fn unset_removes_addressed_entries(
    document: Value,
    #[case] raw: &str,
    #[case] expected: serde_json::Value,
) {
    let mut value = document;
    assert!(unset(&mut value, &path(raw)));
    assert_eq!(json(&value), expected);
}

#[rstest]
fn unset_of_missing_path_is_a_no_op(document: Value) {
    let mut value = document;
    let before = value.clone();
    assert!(!unset(&mut value, &path("a.zz.y")));
    assert!(!unset(&mut value, &path("*.missing")));
    assert!(value.same(&before));
}

#[test]
fn wildcard_unset_spares_opaque_keys() {
    let symbol = Symbol::new("meta");
    let mut value = Value::object([("a", Value::from(1))]);
    if let Some(object) = value.object_mut() {
        object.insert(symbol, Value::from(2));
    }
    assert!(unset(&mut value, &path("*")));
    assert_eq!(value.as_object().map(crate::Object::len), Some(1));
}

#[rstest]
fn flatten_lists_leaves_depth_first(document: Value) {
    assert_eq!(
        flatten(&document, '.'),
        ["a.b", "a.c.0", "a.c.1", "a.c.2.d", "e"]
    );
}

#[test]
fn flatten_skips_opaque_keys() {
    let mut object = crate::Object::new();
    object.insert(Symbol::new("hidden"), Value::from(1));
    object.insert("shown", Value::from(2));
    assert_eq!(flatten(&Value::from(object), '.'), ["shown"]);
}

#[rstest]
fn relocate_moves_entry_to_the_end(document: Value) {
    let mut value = document;
    assert!(relocate(&mut value, &path("a")));
    let names: Vec<_> = value.as_object().expect("object").names().map(str::to_owned).collect();
    assert_eq!(names, ["e", "a"]);
}

#[rstest]
fn relocate_ignores_array_elements(document: Value) {
    let mut value = document;
    assert!(!relocate(&mut value, &path("a.c.0")));
}
