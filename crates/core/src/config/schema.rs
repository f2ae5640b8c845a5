//! Declaration file schema
//!
//! The TOML shape of a `buildprofile.toml` declaration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root declaration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeclarationSchema {
    /// Raw build settings keyed by their Gradle name (`applicationId`, `minSdk`, ...)
    #[serde(default)]
    pub settings: BTreeMap<String, SettingValue>,

    /// Values supplied by the host framework
    #[serde(default)]
    pub framework: FrameworkConfig,

    /// Resolver switches
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Applied Gradle plugins
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Optional capability flags, e.g. `google_services = false`
    #[serde(default)]
    pub features: BTreeMap<String, bool>,

    /// Signing identities keyed by name
    #[serde(default)]
    pub signing: BTreeMap<String, SigningIdentityConfig>,

    /// Declared dependencies in order
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

/// A raw scalar setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
}

impl SettingValue {
    /// Name of the value's type, for error messages
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::String(_) => "string",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Integer(i) => write!(f, "{i}"),
            SettingValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

/// Values supplied by the host mobile framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Framework name, also the prefix of property references (`flutter.minSdkVersion`)
    #[serde(default = "default_framework_name")]
    pub name: String,

    /// Gradle plugin id of the framework
    #[serde(default = "default_framework_plugin")]
    pub plugin_id: String,

    /// `minSdkVersion`
    #[serde(default = "default_min_sdk_version")]
    pub min_sdk_version: u32,

    /// `targetSdkVersion`
    #[serde(default)]
    pub target_sdk_version: Option<u32>,

    /// `compileSdkVersion`
    #[serde(default)]
    pub compile_sdk_version: Option<u32>,

    /// `ndkVersion`
    #[serde(default)]
    pub ndk_version: Option<String>,

    /// `versionCode`
    #[serde(default)]
    pub version_code: Option<u32>,

    /// `versionName`
    #[serde(default)]
    pub version_name: Option<String>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            name: default_framework_name(),
            plugin_id: default_framework_plugin(),
            min_sdk_version: default_min_sdk_version(),
            target_sdk_version: None,
            compile_sdk_version: None,
            ndk_version: None,
            version_code: None,
            version_name: None,
        }
    }
}

fn default_framework_name() -> String {
    "flutter".to_string()
}

fn default_framework_plugin() -> String {
    "dev.flutter.flutter-gradle-plugin".to_string()
}

fn default_min_sdk_version() -> u32 {
    21
}

/// Resolver behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolverConfig {
    /// Build type to resolve when the settings don't name one
    #[serde(default)]
    pub build_type: Option<String>,

    /// Fail instead of warning when a release build falls back to debug signing
    #[serde(default)]
    pub deny_debug_signing: bool,

    /// Version code of the last published release
    #[serde(default)]
    pub previous_version_code: Option<u32>,
}

/// Plugin declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Plugin ids in application order
    #[serde(default = "default_plugins")]
    pub apply: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            apply: default_plugins(),
        }
    }
}

fn default_plugins() -> Vec<String> {
    vec![
        "com.android.application",
        "kotlin-android",
        "dev.flutter.flutter-gradle-plugin",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A named signing identity. Only referenced by name; key material is never read.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SigningIdentityConfig {
    /// Keystore path, rendered as-is
    #[serde(default)]
    pub store_file: Option<String>,

    /// Key alias inside the keystore
    #[serde(default)]
    pub key_alias: Option<String>,
}

/// A declared dependency, either as a Gradle coordinate or as name and version
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DependencyConfig {
    /// `group:artifact:version`
    #[serde(default)]
    pub coordinate: Option<String>,

    /// `artifact` or `group:artifact`
    #[serde(default)]
    pub name: Option<String>,

    /// Version, used together with `name`
    #[serde(default)]
    pub version: Option<String>,

    /// Gradle configuration, inferred from the artifact when absent
    #[serde(default)]
    pub configuration: Option<String>,
}
