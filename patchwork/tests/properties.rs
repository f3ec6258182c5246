//! Randomised checks of the merge kinds' invariants.

use patchwork::{Merger, Value};
use proptest::prelude::*;
use serde_json::{Map, Value as Json};

fn leaf() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::from),
        (-1000_i64..1000).prop_map(Json::from),
        "[a-z]{0,6}".prop_map(Json::from),
    ]
}

/// Documents with short keys that never collide with verb names.
fn document() -> impl Strategy<Value = Json> {
    leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            prop::collection::vec(("[a-e0-2]{1,2}", inner), 0..5)
                .prop_map(|entries| Json::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn object() -> impl Strategy<Value = Json> {
    prop::collection::vec(("[a-e]{1,2}", document()), 0..5)
        .prop_map(|entries| Json::Object(entries.into_iter().collect::<Map<_, _>>()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn patch_with_nothing_keeps_identity(doc in object()) {
        let merger = Merger::default();
        let mut target = Value::from(doc);
        let before = target.clone();
        merger.patch(&mut target, [Value::from(Json::Object(Map::new()))])?;
        prop_assert!(target.same(&before));
    }

    #[test]
    fn patch_with_a_copy_of_itself_keeps_content(doc in object()) {
        let merger = Merger::default();
        let expected = Value::from(doc.clone());
        let mut target = Value::from(doc.clone());
        merger.patch(&mut target, [Value::from(doc)])?;
        prop_assert_eq!(target, expected);
    }

    #[test]
    fn merge_with_nothing_copies_content(doc in object()) {
        let merger = Merger::default();
        let source = Value::from(doc);
        let merged = merger.merge([source.clone(), Value::from(Json::Object(Map::new()))])?;
        prop_assert!(!merged.same(&source));
        prop_assert_eq!(merged, source);
    }

    #[test]
    fn merge_leaves_inputs_untouched(a in object(), b in object()) {
        let merger = Merger::default();
        let left = Value::from(a.clone());
        let right = Value::from(b.clone());
        merger.merge([left.clone(), right.clone()])?;
        prop_assert_eq!(left, Value::from(a));
        prop_assert_eq!(right, Value::from(b));
    }

    #[test]
    fn kinds_agree_on_content(a in object(), b in object()) {
        let merger = Merger::default();
        let merged = merger.merge([Value::from(a.clone()), Value::from(b.clone())])?;
        let updated = merger.update([Value::from(a.clone()), Value::from(b.clone())])?;
        let mut patched = Value::from(a);
        merger.patch(&mut patched, [Value::from(b)])?;
        prop_assert_eq!(&merged, &updated);
        prop_assert_eq!(&merged, &patched);
    }

    #[test]
    fn right_hand_leaves_win(a in object(), b in object()) {
        let merger = Merger::default();
        let merged = merger.merge([Value::from(a.clone()), Value::from(b.clone())])?;
        let merged = Json::try_from(merged)?;
        for (key, incoming) in b.as_object().into_iter().flatten() {
            let replaces = !(incoming.is_object() && a.get(key).is_some_and(Json::is_object));
            if replaces {
                prop_assert_eq!(merged.get(key), Some(incoming));
            }
        }
        for key in a.as_object().into_iter().flatten().map(|(key, _)| key) {
            prop_assert!(merged.get(key).is_some());
        }
    }
}
