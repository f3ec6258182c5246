//! The four merge kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selects how a merge treats its inputs.
///
/// All kinds share one dispatch and recursion structure. They differ only in
/// whether unchanged subtrees are shared or cloned and whether the first
/// operand is the mutation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeKind {
    /// Rebuild every container; nothing in the output aliases an input
    /// container. Custom values are still shared.
    Merge,
    /// As [`MergeKind::Merge`], and custom values are deep-cloned too.
    MergeClones,
    /// Write into the first operand, sharing everything that did not change.
    Patch,
    /// As [`MergeKind::Patch`], but results are built fresh and the first
    /// operand is only returned when nothing changed.
    Update,
}

impl MergeKind {
    /// Returns `true` when the kind always produces freshly allocated
    /// containers.
    #[must_use]
    pub const fn returns_clone(self) -> bool {
        matches!(self, Self::Merge | Self::MergeClones)
    }

    /// Returns `true` when the first operand is the mutation target.
    #[must_use]
    pub const fn mutates_target(self) -> bool {
        matches!(self, Self::Patch)
    }

    /// Name of the kind as used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::MergeClones => "mergeClones",
            Self::Patch => "patch",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for MergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
