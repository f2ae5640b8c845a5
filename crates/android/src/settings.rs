//! Raw build settings
//!
//! Settings are keyed by their Gradle name and hold untyped scalars until
//! the resolver extracts them.

use crate::error::{ResolveError, Result};
use std::collections::BTreeMap;

pub use buildprofile_core::config::SettingValue as RawValue;

/// Setting names as they appear in a Gradle script
pub mod keys {
    /// Application identifier
    pub const APPLICATION_ID: &str = "applicationId";
    /// Namespace of generated classes
    pub const NAMESPACE: &str = "namespace";
    /// Lowest supported API level
    pub const MIN_SDK: &str = "minSdk";
    /// Targeted API level
    pub const TARGET_SDK: &str = "targetSdk";
    /// Compiled-against API level
    pub const COMPILE_SDK: &str = "compileSdk";
    /// NDK version
    pub const NDK_VERSION: &str = "ndkVersion";
    /// Release counter
    pub const VERSION_CODE: &str = "versionCode";
    /// User-visible version
    pub const VERSION_NAME: &str = "versionName";
    /// Java source level
    pub const SOURCE_COMPATIBILITY: &str = "sourceCompatibility";
    /// Java bytecode level
    pub const TARGET_COMPATIBILITY: &str = "targetCompatibility";
    /// Kotlin JVM target
    pub const JVM_TARGET: &str = "jvmTarget";
    /// Core library desugaring switch
    pub const DESUGARING_ENABLED: &str = "desugaringEnabled";
    /// Multidex switch
    pub const MULTI_DEX_ENABLED: &str = "multiDexEnabled";
    /// Instrumentation runner class
    pub const TEST_INSTRUMENTATION_RUNNER: &str = "testInstrumentationRunner";
    /// Build type to resolve
    pub const BUILD_TYPE: &str = "buildType";
    /// Signing identity name
    pub const SIGNING_CONFIG: &str = "signingConfig";
}

/// Every recognised setting with a short description
pub const KNOWN_SETTINGS: &[(&str, &str)] = &[
    (keys::APPLICATION_ID, "Reverse-domain application identifier (required)"),
    (keys::NAMESPACE, "Package namespace for generated R classes; defaults to applicationId"),
    (keys::MIN_SDK, "Lowest supported API level; framework supplies a default"),
    (keys::TARGET_SDK, "API level the app is tested against (required)"),
    (keys::COMPILE_SDK, "API level compiled against (required)"),
    (keys::NDK_VERSION, "Native development kit version"),
    (keys::VERSION_CODE, "Positive release counter, must grow with every release (required)"),
    (keys::VERSION_NAME, "User-visible version string (required)"),
    (keys::SOURCE_COMPATIBILITY, "Java source level, e.g. VERSION_11; defaults to VERSION_1_8"),
    (keys::TARGET_COMPATIBILITY, "Java bytecode level; defaults to sourceCompatibility"),
    (keys::JVM_TARGET, "Kotlin JVM target; defaults to targetCompatibility"),
    (keys::DESUGARING_ENABLED, "Enable core library desugaring"),
    (keys::MULTI_DEX_ENABLED, "Enable multidex"),
    (keys::TEST_INSTRUMENTATION_RUNNER, "Instrumentation test runner class"),
    (keys::BUILD_TYPE, "Build type to resolve: debug, profile, release or custom"),
    (keys::SIGNING_CONFIG, "Signing identity name for the build type"),
];

/// Names of every recognised setting
#[must_use]
pub fn known_keys() -> Vec<&'static str> {
    KNOWN_SETTINGS.iter().map(|(key, _)| *key).collect()
}

/// A mapping of setting names to raw scalar values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    values: BTreeMap<String, RawValue>,
}

impl RawSettings {
    /// Create empty settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting, builder style
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a raw value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    /// Iterate over settings in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Setting names in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overlay these settings on `defaults`; values present here win
    #[must_use]
    pub fn merged_over(&self, defaults: &RawSettings) -> RawSettings {
        let mut values = defaults.values.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        RawSettings { values }
    }

    /// Non-empty string setting that must be present
    pub fn required_str(&self, key: &str) -> Result<&str> {
        self.optional_str(key)?
            .ok_or_else(|| ResolveError::missing(key))
    }

    /// Non-empty string setting
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(RawValue::String(s)) if s.trim().is_empty() => {
                Err(ResolveError::schema(key, "must not be empty"))
            }
            Some(RawValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    /// Positive integer setting that must be present
    pub fn required_u32(&self, key: &str) -> Result<u32> {
        self.optional_u32(key)?
            .ok_or_else(|| ResolveError::missing(key))
    }

    /// Positive integer setting
    pub fn optional_u32(&self, key: &str) -> Result<Option<u32>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(RawValue::Integer(i)) if *i <= 0 => Err(ResolveError::schema(
                key,
                format!("must be a positive integer, found {i}"),
            )),
            Some(RawValue::Integer(i)) => u32::try_from(*i)
                .map(Some)
                .map_err(|_| ResolveError::schema(key, format!("{i} is out of range"))),
            Some(other) => Err(wrong_type(key, "integer", other)),
        }
    }

    /// Boolean setting
    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(RawValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(wrong_type(key, "boolean", other)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawSettings
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = RawSettings::new();
        for (key, value) in iter {
            settings.insert(key, value);
        }
        settings
    }
}

impl From<BTreeMap<String, RawValue>> for RawSettings {
    fn from(values: BTreeMap<String, RawValue>) -> Self {
        Self { values }
    }
}

pub(crate) fn wrong_type(key: &str, expected: &str, found: &RawValue) -> ResolveError {
    ResolveError::schema(
        key,
        format!("expected {expected}, found {} {found}", found.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_explicit_wins() {
        let defaults = RawSettings::new().with(keys::MIN_SDK, 21).with(keys::TARGET_SDK, 33);
        let explicit = RawSettings::new().with(keys::TARGET_SDK, 34);

        let merged = explicit.merged_over(&defaults);
        assert_eq!(merged.get(keys::MIN_SDK), Some(&RawValue::Integer(21)));
        assert_eq!(merged.get(keys::TARGET_SDK), Some(&RawValue::Integer(34)));
    }

    #[test]
    fn test_required_missing() {
        let err = RawSettings::new().required_u32(keys::COMPILE_SDK).unwrap_err();
        assert!(matches!(err, ResolveError::Schema { ref field, .. } if field == "compileSdk"));
    }

    #[test]
    fn test_wrong_type() {
        let settings = RawSettings::new().with(keys::MIN_SDK, "21");
        let err = settings.required_u32(keys::MIN_SDK).unwrap_err();
        assert_eq!(err.to_string(), "minSdk: expected integer, found string \"21\"");
    }

    #[test]
    fn test_non_positive_integer() {
        let settings = RawSettings::new().with(keys::VERSION_CODE, 0);
        assert!(settings.required_u32(keys::VERSION_CODE).is_err());

        let settings = RawSettings::new().with(keys::VERSION_CODE, -3);
        assert!(settings.required_u32(keys::VERSION_CODE).is_err());
    }

    #[test]
    fn test_empty_string_rejected() {
        let settings = RawSettings::new().with(keys::VERSION_NAME, " ");
        assert!(settings.required_str(keys::VERSION_NAME).is_err());
    }

    #[test]
    fn test_bool_and_from_iter() {
        let settings: RawSettings = [(keys::DESUGARING_ENABLED, true)].into_iter().collect();
        assert_eq!(settings.optional_bool(keys::DESUGARING_ENABLED).unwrap(), Some(true));
        assert_eq!(settings.optional_bool(keys::MULTI_DEX_ENABLED).unwrap(), None);
    }

    #[test]
    fn test_known_keys_cover_constants() {
        let known = known_keys();
        assert!(known.contains(&keys::APPLICATION_ID));
        assert!(known.contains(&keys::SIGNING_CONFIG));
        assert_eq!(known.len(), KNOWN_SETTINGS.len());
    }
}
