//! Feature flags for optional build capabilities
//!
//! Flags gate optional pieces of a build, such as plugins that are declared
//! but switched off. They are plain values passed to whoever needs them;
//! nothing here reads process state unless asked to through
//! [`FeatureFlags::with_env_overrides`].
//!
//! # Example
//!
//! ```rust
//! use buildprofile_core::feature_flags::{FeatureFlags, Flag};
//!
//! let flags = FeatureFlags::new()
//!     .with_flag_def(Flag::new("google_services", false).with_description("Firebase"));
//!
//! assert!(!flags.is_enabled("google_services"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix for environment overrides, e.g. `BUILDPROFILE_FEATURE_GOOGLE_SERVICES`
pub const ENV_PREFIX: &str = "BUILDPROFILE_FEATURE_";

/// Feature flag definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Flag name
    pub name: String,
    /// Whether the flag is on
    pub enabled: bool,
    /// Description
    #[serde(default)]
    pub description: String,
}

impl Flag {
    /// Create a new flag
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            description: String::new(),
        }
    }

    /// Add description
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Environment variable that overrides this flag
    #[must_use]
    pub fn env_var(&self) -> String {
        format!("{ENV_PREFIX}{}", self.name.to_uppercase().replace('-', "_"))
    }
}

/// Set of feature flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    flags: BTreeMap<String, Flag>,
}

impl FeatureFlags {
    /// Create an empty flag set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build flags from a `name = bool` table
    #[must_use]
    pub fn from_table(table: &BTreeMap<String, bool>) -> Self {
        table
            .iter()
            .fold(Self::new(), |flags, (name, enabled)| flags.with_flag(name.clone(), *enabled))
    }

    /// Add a flag
    #[must_use]
    pub fn with_flag(self, name: impl Into<String>, enabled: bool) -> Self {
        let name = name.into();
        self.with_flag_def(Flag::new(name, enabled))
    }

    /// Add a flag definition, replacing any flag with the same name
    #[must_use]
    pub fn with_flag_def(mut self, flag: Flag) -> Self {
        self.flags.insert(flag.name.clone(), flag);
        self
    }

    /// Add a flag definition only if no flag with that name exists yet
    #[must_use]
    pub fn with_default(mut self, flag: Flag) -> Self {
        let existing = self
            .flags
            .entry(flag.name.clone())
            .or_insert_with(|| flag.clone());
        if existing.description.is_empty() {
            existing.description = flag.description;
        }
        self
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// `lookup` receives names like `BUILDPROFILE_FEATURE_GOOGLE_SERVICES`;
    /// `0`, `false`, `off` and `no` disable a flag, any other value enables it.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for flag in self.flags.values_mut() {
            if let Some(value) = lookup(&flag.env_var()) {
                flag.enabled = !matches!(
                    value.trim().to_lowercase().as_str(),
                    "0" | "false" | "off" | "no"
                );
            }
        }
        self
    }

    /// Check if a flag is enabled. Unknown flags are disabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(|f| f.enabled)
    }

    /// Get a flag definition
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// List all flags, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Flag states as a `name -> enabled` map
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.flags
            .values()
            .map(|f| (f.name.clone(), f.enabled))
            .collect()
    }
}
