//! Host framework defaults
//!
//! The mobile framework that owns the Android project supplies some build
//! values (at least the minimum SDK level). They are passed in explicitly
//! and never read from ambient state.

use crate::error::{ResolveError, Result};
use crate::settings::{keys, RawSettings, RawValue};
use buildprofile_core::config::FrameworkConfig;
use tracing::debug;

/// Framework property names and the settings they default
pub const FRAMEWORK_PROPERTIES: &[(&str, &str)] = &[
    ("minSdkVersion", keys::MIN_SDK),
    ("targetSdkVersion", keys::TARGET_SDK),
    ("compileSdkVersion", keys::COMPILE_SDK),
    ("ndkVersion", keys::NDK_VERSION),
    ("versionCode", keys::VERSION_CODE),
    ("versionName", keys::VERSION_NAME),
];

/// Values supplied by the host framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkDefaults {
    /// Framework name, the prefix of property references
    pub name: String,
    /// Gradle plugin id of the framework
    pub plugin_id: String,
    /// `minSdkVersion`, always supplied
    pub min_sdk_version: u32,
    /// `targetSdkVersion`
    pub target_sdk_version: Option<u32>,
    /// `compileSdkVersion`
    pub compile_sdk_version: Option<u32>,
    /// `ndkVersion`
    pub ndk_version: Option<String>,
    /// `versionCode`
    pub version_code: Option<u32>,
    /// `versionName`
    pub version_name: Option<String>,
}

impl Default for FrameworkDefaults {
    fn default() -> Self {
        Self::from_config(&FrameworkConfig::default())
    }
}

impl FrameworkDefaults {
    /// Build from the `[framework]` declaration section
    #[must_use]
    pub fn from_config(config: &FrameworkConfig) -> Self {
        Self {
            name: config.name.clone(),
            plugin_id: config.plugin_id.clone(),
            min_sdk_version: config.min_sdk_version,
            target_sdk_version: config.target_sdk_version,
            compile_sdk_version: config.compile_sdk_version,
            ndk_version: config.ndk_version.clone(),
            version_code: config.version_code,
            version_name: config.version_name.clone(),
        }
    }

    /// Value of a framework property, `None` if the framework doesn't supply it
    #[must_use]
    pub fn property(&self, name: &str) -> Option<RawValue> {
        match name {
            "minSdkVersion" => Some(self.min_sdk_version.into()),
            "targetSdkVersion" => self.target_sdk_version.map(RawValue::from),
            "compileSdkVersion" => self.compile_sdk_version.map(RawValue::from),
            "ndkVersion" => self.ndk_version.clone().map(RawValue::from),
            "versionCode" => self.version_code.map(RawValue::from),
            "versionName" => self.version_name.clone().map(RawValue::from),
            _ => None,
        }
    }

    /// Supplied properties as settings, for merging under explicit ones
    #[must_use]
    pub fn as_settings(&self) -> RawSettings {
        FRAMEWORK_PROPERTIES
            .iter()
            .filter_map(|(property, key)| self.property(property).map(|value| (*key, value)))
            .collect()
    }

    /// Replace `"<framework>.<property>"` strings with the property value.
    ///
    /// Strings whose suffix is not a known property are left alone, so an
    /// identifier that happens to start with the framework name is not
    /// mistaken for a reference.
    pub fn substitute_references(&self, settings: &RawSettings) -> Result<RawSettings> {
        let prefix = format!("{}.", self.name);
        let mut resolved = RawSettings::new();

        for (key, value) in settings.iter() {
            let reference = match value {
                RawValue::String(s) => s
                    .strip_prefix(&prefix)
                    .filter(|property| is_known_property(property)),
                _ => None,
            };

            let value = match reference {
                Some(property) => {
                    let substituted = self.property(property).ok_or_else(|| {
                        ResolveError::schema(
                            key,
                            format!("{} does not supply {property}", self.name),
                        )
                    })?;
                    debug!(key, property, value = %substituted, "framework reference substituted");
                    substituted
                }
                None => value.clone(),
            };
            resolved.insert(key, value);
        }

        Ok(resolved)
    }
}

fn is_known_property(name: &str) -> bool {
    FRAMEWORK_PROPERTIES.iter().any(|(property, _)| *property == name)
}
