//! Build declarations: everything the resolver reads
//!
//! A [`BuildDeclaration`] is either assembled in code or converted from a
//! loaded `buildprofile.toml`.

use crate::dependency::Dependency;
use crate::error::Result;
use crate::framework::FrameworkDefaults;
use crate::plugins::{with_plugin_flags, OPTIONAL_PLUGINS};
use crate::resolver::ResolverOptions;
use crate::settings::{known_keys, RawSettings};
use crate::signing::SigningIdentities;
use buildprofile_core::config::{DeclarationSchema, PluginsConfig};
use buildprofile_core::feature_flags::FeatureFlags;
use buildprofile_core::validation::{validate_known_keys, ValidationResult};

/// Static build declarations for one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDeclaration {
    /// Raw settings as declared
    pub settings: RawSettings,
    /// Declared dependencies in order
    pub dependencies: Vec<Dependency>,
    /// Plugin ids in application order
    pub plugins: Vec<String>,
    /// Feature flags, including optional plugin flags
    pub features: FeatureFlags,
    /// Declared signing identities
    pub signing: SigningIdentities,
}

impl Default for BuildDeclaration {
    fn default() -> Self {
        Self::new(RawSettings::new())
    }
}

impl BuildDeclaration {
    /// Declaration with the standard plugins and nothing else besides `settings`
    #[must_use]
    pub fn new(settings: RawSettings) -> Self {
        Self {
            settings,
            dependencies: Vec::new(),
            plugins: PluginsConfig::default().apply,
            features: with_plugin_flags(FeatureFlags::new()),
            signing: SigningIdentities::new(),
        }
    }

    /// Add a dependency
    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Replace the plugin list
    #[must_use]
    pub fn with_plugins<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins = plugins.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the feature flags; optional plugin flags default to off
    #[must_use]
    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = with_plugin_flags(features);
        self
    }

    /// Declare a signing identity by name
    #[must_use]
    pub fn with_signing_identity(mut self, name: impl Into<String>) -> Self {
        self.signing = self.signing.with_identity(name);
        self
    }

    /// Convert a loaded declaration file
    pub fn from_schema(schema: &DeclarationSchema) -> Result<Self> {
        let dependencies = schema
            .dependencies
            .iter()
            .map(Dependency::from_config)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            settings: RawSettings::from(schema.settings.clone()),
            dependencies,
            plugins: schema.plugins.apply.clone(),
            features: with_plugin_flags(FeatureFlags::from_table(&schema.features)),
            signing: SigningIdentities::from(schema.signing.clone()),
        })
    }
}

/// Everything needed to resolve a loaded declaration file
#[derive(Debug, Clone)]
pub struct ResolutionInputs {
    /// Settings, dependencies, plugins, flags and identities
    pub declaration: BuildDeclaration,
    /// Values from the `[framework]` section
    pub framework: FrameworkDefaults,
    /// Switches from the `[resolver]` section
    pub options: ResolverOptions,
}

impl ResolutionInputs {
    /// Split a declaration file into resolver inputs
    pub fn from_schema(schema: &DeclarationSchema) -> Result<Self> {
        Ok(Self {
            declaration: BuildDeclaration::from_schema(schema)?,
            framework: FrameworkDefaults::from_config(&schema.framework),
            options: ResolverOptions::from_config(&schema.resolver),
        })
    }
}

/// Non-fatal checks on a declaration file: unknown setting and feature names
#[must_use]
pub fn lint_declaration(schema: &DeclarationSchema) -> ValidationResult {
    let mut result = validate_known_keys(
        "settings",
        schema.settings.keys().map(String::as_str),
        &known_keys(),
    );

    let known_flags: Vec<&str> = OPTIONAL_PLUGINS.iter().map(|p| p.flag).collect();
    result.merge(validate_known_keys(
        "features",
        schema.features.keys().map(String::as_str),
        &known_flags,
    ));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildprofile_core::config::Declaration;

    const REMINDER_APP: &str = r#"
        [settings]
        namespace = "com.example.student_reminder_app"
        applicationId = "com.example.student_reminder_app"
        compileSdk = 36
        ndkVersion = "27.0.12077973"
        minSdk = "flutter.minSdkVersion"
        targetSdk = 34
        versionCode = 1
        versionName = "1.0.0"
        sourceCompatibility = "VERSION_11"
        targetCompatibility = "VERSION_11"
        jvmTarget = "11"
        desugaringEnabled = true
        multiDexEnabled = true
        testInstrumentationRunner = "androidx.test.runner.AndroidJUnitRunner"
        buildType = "release"

        [features]
        google_services = false

        [[dependencies]]
        coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
        configuration = "coreLibraryDesugaring"
    "#;

    #[test]
    fn test_from_schema() {
        let loaded = Declaration::from_toml_str(REMINDER_APP).unwrap();
        let inputs = ResolutionInputs::from_schema(&loaded.schema).unwrap();

        assert_eq!(inputs.declaration.dependencies.len(), 1);
        assert!(inputs.declaration.dependencies[0].is_desugaring());
        assert_eq!(inputs.declaration.plugins.len(), 3);
        assert!(!inputs.declaration.features.is_enabled("google_services"));
        assert_eq!(inputs.framework.min_sdk_version, 21);
        assert!(!inputs.options.deny_debug_signing);
    }

    #[test]
    fn test_bad_dependency_fails_conversion() {
        let loaded = Declaration::from_toml_str(
            "[[dependencies]]\ncoordinate = \"desugar_jdk_libs\"",
        )
        .unwrap();
        assert!(BuildDeclaration::from_schema(&loaded.schema).is_err());
    }

    #[test]
    fn test_lint_clean_declaration() {
        let loaded = Declaration::from_toml_str(REMINDER_APP).unwrap();
        let result = lint_declaration(&loaded.schema);
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_lint_unknown_keys() {
        let loaded = Declaration::from_toml_str(
            "[settings]\nminSdkVersion = 21\n[features]\ncrashlytics = true",
        )
        .unwrap();
        let result = lint_declaration(&loaded.schema);
        let fields: Vec<&str> = result.warnings().iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["settings.minSdkVersion", "features.crashlytics"]);
    }

    #[test]
    fn test_default_declaration_has_plugin_flags() {
        let declaration = BuildDeclaration::default();
        assert!(declaration.features.get("google_services").is_some());
    }
}
