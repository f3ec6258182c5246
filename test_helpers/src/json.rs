//! Assertions over JSON documents that care about key order.
//!
//! `serde_json` is built with `preserve_order`, so object keys enumerate in
//! the order the producer emitted them.

use anyhow::{Context, Result, anyhow, ensure};
use serde_json::Value;

/// Keys of the object found at `pointer` (RFC 6901, `""` for the root), in
/// enumeration order.
///
/// # Errors
///
/// Returns an error when `pointer` does not resolve or does not name an
/// object.
pub fn keys_at(document: &Value, pointer: &str) -> Result<Vec<String>> {
    let found = document
        .pointer(pointer)
        .with_context(|| format!("nothing at '{pointer}'"))?;
    let object = found
        .as_object()
        .ok_or_else(|| anyhow!("'{pointer}' holds {found}, not an object"))?;
    Ok(object.keys().cloned().collect())
}

/// Fails unless the object at `pointer` enumerates exactly `expected`.
///
/// # Errors
///
/// Returns an error describing both orders when they differ, or when
/// [`keys_at`] fails.
pub fn ensure_key_order(document: &Value, pointer: &str, expected: &[&str]) -> Result<()> {
    let actual = keys_at(document, pointer)?;
    ensure!(
        actual.iter().map(String::as_str).eq(expected.iter().copied()),
        "keys at '{pointer}' are {actual:?}, expected {expected:?}"
    );
    Ok(())
}

/// Fails unless `actual` and `expected` are equal, keys in the same order at
/// every level.
///
/// # Errors
///
/// Returns an error showing both documents when they differ.
pub fn ensure_same_document(actual: &Value, expected: &Value) -> Result<()> {
    ensure!(
        ordered_eq(actual, expected),
        "documents differ:\n  actual:   {actual}\n  expected: {expected}"
    );
    Ok(())
}

fn ordered_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && ordered_eq(va, vb))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| ordered_eq(x, y))
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ensure_key_order, ensure_same_document, keys_at};

    #[test]
    fn reads_nested_key_order() -> anyhow::Result<()> {
        let document = json!({"a": {"z": 1, "y": 2}});
        anyhow::ensure!(keys_at(&document, "/a")? == ["z", "y"]);
        ensure_key_order(&document, "", &["a"])
    }

    #[test]
    fn key_order_mismatch_is_an_error() {
        let document = json!({"b": 1, "a": 2});
        assert!(ensure_key_order(&document, "", &["a", "b"]).is_err());
        assert!(keys_at(&document, "/b").is_err());
    }

    #[test]
    fn same_document_is_order_sensitive() {
        let left = json!({"a": 1, "b": [{"c": 2, "d": 3}]});
        let reordered = json!({"b": [{"d": 3, "c": 2}], "a": 1});
        assert!(ensure_same_document(&left, &left.clone()).is_ok());
        assert!(ensure_same_document(&left, &reordered).is_err());
    }
}
