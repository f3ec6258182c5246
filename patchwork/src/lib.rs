//! Deep merging and declarative patching of nested data graphs.
//!
//! Values are merged pairwise by rules chosen from the type tags of both
//! operands, under one of four [`MergeKind`]s. Right-hand maps may embed
//! verbs such as `$set`, `$unset` or `$push`, which are split off before the
//! structural merge and applied to its result.
//!
//! ```
//! use patchwork::Value;
//! use serde_json::json;
//!
//! let merged = patchwork::merge([
//!     Value::from(json!({"server": {"port": 80, "tls": false}})),
//!     Value::from(json!({"server": {"tls": true}, "$set": {"server.port": 443}})),
//! ])?;
//! assert_eq!(merged, Value::from(json!({"server": {"port": 443, "tls": true}})));
//! # Ok::<_, patchwork::MergeError>(())
//! ```
//!
//! Use a [`Merger`] for an engine with its own registries and settings, or
//! the free functions for the shared process-wide engine.

mod config;
mod dispatch;
mod error;
mod global;
mod kind;
mod merger;
pub mod operations;
pub mod path;
mod result_ext;
mod rules;
mod tag;
mod value;

pub use config::{ENV_PREFIX, KeySortMode, MergerConfig};
pub use dispatch::{MergeRule, RuleKey, RuleRegistry, Tier};
pub use error::{MergeError, MergeResult};
pub use global::{add_merge_rule, add_operation, global, merge, merge_clones, patch, update};
pub use kind::MergeKind;
pub use merger::Merger;
pub use operations::{OperationCallback, OperationRegistry};
pub use result_ext::MergeResultExt;
pub use tag::{Tag, tag_of};
pub use value::{CustomValue, Key, Object, Symbol, Value, from_value, to_value};
