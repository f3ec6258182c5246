//! Building engines from layered configuration.

use anyhow::{Result, ensure};
use patchwork::{KeySortMode, MergeError, Merger, MergerConfig, Value};
use rstest::rstest;
use serde_json::json;
use test_helpers::env::with_vars;

#[rstest]
fn environment_selects_separators() -> Result<()> {
    let config = with_vars(&[("PATCHWORK_SEPARATOR", "/")], MergerConfig::load)?;
    ensure!(config.separator == '/');
    let merger = Merger::with_config(config)?;
    let mut target = Value::from(json!({"a.b": {"c": 1}}));
    merger.patch(&mut target, [Value::from(json!({"$set": {"a.b/c": 2}}))])?;
    ensure!(target == Value::from(json!({"a.b": {"c": 2}})));
    Ok(())
}

#[rstest]
fn environment_selects_the_key_sort_mode() -> Result<()> {
    let config = with_vars(&[("PATCHWORK_KEY_SORT", "strict")], MergerConfig::load)?;
    ensure!(config.key_sort == KeySortMode::Strict);
    ensure!(Merger::with_config(config)?.config().key_sort == KeySortMode::Strict);
    Ok(())
}

#[rstest]
fn custom_alternate_separators_rename_the_alternate_spellings() -> Result<()> {
    let merger = Merger::with_config(MergerConfig {
        alternate_separator: '|',
        ..MergerConfig::default()
    })?;
    ensure!(merger.has_operation("$set|"));
    ensure!(!merger.has_operation("$set›"));
    let mut target = Value::from(json!({}));
    merger.patch(&mut target, [Value::from(json!({"$set|": {"x.y|z": 1}}))])?;
    ensure!(target == Value::from(json!({"x.y": {"z": 1}})));
    Ok(())
}

#[rstest]
fn conflicting_settings_are_refused() {
    let result = Merger::with_config(MergerConfig {
        separator: '›',
        ..MergerConfig::default()
    });
    assert!(matches!(result, Err(MergeError::InvalidConfig { .. })));
}

#[rstest]
fn invalid_environment_is_reported() {
    let result = with_vars(&[("PATCHWORK_ALTERNATE_SEPARATOR", "$")], MergerConfig::load);
    assert!(result.is_err_and(|err| err.to_string().contains("reserved for verb names")));
}
