//! Engine settings and their layered loading.
//!
//! Settings come from serde defaults overlaid by `PATCHWORK_`-prefixed
//! environment variables, the same provider layering `figment` applies to
//! any configuration struct.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::{
    MergeError, MergeResult, MergeResultExt,
    operations::SIGIL,
    path::{ALTERNATE_SEPARATOR, DEFAULT_SEPARATOR},
};

/// Prefix of the environment variables read by [`MergerConfig::load`].
pub const ENV_PREFIX: &str = "PATCHWORK_";

/// How `$keySortOrder` treats descendants of the paths it sorts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySortMode {
    /// Leaves under an explicitly sorted path are relocated again with the
    /// unsorted remainder, reordering grandchildren behind their parent.
    #[default]
    Compatible,
    /// Leaves under an explicitly sorted path keep the order sorting gave
    /// them.
    Strict,
}

/// Settings for a [`crate::Merger`].
///
/// # Examples
///
/// ```
/// use patchwork::{KeySortMode, MergerConfig};
///
/// let config = MergerConfig::default();
/// assert_eq!(config.separator, '.');
/// assert_eq!(config.alternate_separator, '›');
/// assert_eq!(config.key_sort, KeySortMode::Compatible);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Path separator bound to the primary verb spellings.
    pub separator: char,
    /// Path separator bound to the alternate verb spellings, which append it
    /// to the primary name.
    pub alternate_separator: char,
    /// Descendant handling for `$keySortOrder`.
    pub key_sort: KeySortMode,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            alternate_separator: ALTERNATE_SEPARATOR,
            key_sort: KeySortMode::default(),
        }
    }
}

impl MergerConfig {
    /// Gather settings from defaults and `PATCHWORK_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Config`] when a variable cannot be parsed, or
    /// [`MergeError::InvalidConfig`] when the result fails
    /// [`MergerConfig::validate`].
    pub fn load() -> MergeResult<Self> {
        Self::from_figment(&Self::figment())
    }

    /// The provider stack used by [`MergerConfig::load`], for callers that
    /// want to merge in providers of their own.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract and validate settings from any figment.
    ///
    /// # Errors
    ///
    /// As [`MergerConfig::load`].
    pub fn from_figment(figment: &Figment) -> MergeResult<Self> {
        let config: Self = figment.extract().into_merge()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the separators can be told apart from each other and from
    /// verb names.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidConfig`] describing the conflict.
    pub fn validate(&self) -> MergeResult<()> {
        if self.separator == self.alternate_separator {
            return Err(MergeError::InvalidConfig {
                reason: format!(
                    "separator and alternate_separator are both '{}'",
                    self.separator
                ),
            });
        }
        if let Some(clash) = [self.separator, self.alternate_separator]
            .into_iter()
            .find(|separator| *separator == SIGIL)
        {
            return Err(MergeError::InvalidConfig {
                reason: format!("'{clash}' is reserved for verb names"),
            });
        }
        Ok(())
    }
}
