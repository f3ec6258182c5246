//! Test helpers shared across crates in the workspace.
//!
//! Assertions operate on `serde_json::Value` so they stay independent of the
//! crates under test.

pub mod env;
pub mod json;
