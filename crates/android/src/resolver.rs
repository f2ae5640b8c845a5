//! Build profile resolution
//!
//! A single pass over a [`BuildDeclaration`]: merge with framework defaults,
//! extract typed fields, then check ordering, identifiers, dependencies,
//! plugins and signing in that order. The first failure is returned.

use crate::declaration::BuildDeclaration;
use crate::dependency::{ensure_unique, Dependency};
use crate::error::{ResolveError, Result};
use crate::framework::FrameworkDefaults;
use crate::plugins::resolve_plugins;
use crate::profile::{BuildProfile, ProfileWarning, ResolvedProfile};
use crate::sdk::{JavaVersion, SdkLevels};
use crate::settings::{keys, RawSettings};
use crate::signing::{select_signing, BuildType};
use buildprofile_core::config::ResolverConfig;
use buildprofile_core::validation::Validator;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

/// Highest version code Google Play accepts
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Java level assumed when `sourceCompatibility` is not set
pub const DEFAULT_JAVA_VERSION: JavaVersion = JavaVersion::VERSION_1_8;

/// Dot-separated segments, each starting with a letter
const PACKAGE_ID_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$";

const PACKAGE_ID_DESCRIPTION: &str = "dot-separated segments starting with a letter";

static PACKAGE_ID: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(PACKAGE_ID_PATTERN).ok());

/// Switches for a resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Build type to resolve, overriding the `buildType` setting
    pub build_type: Option<BuildType>,
    /// Fail instead of warning when a release build would use debug signing
    pub deny_debug_signing: bool,
    /// Version code of the last release; the new one must be greater
    pub previous_version_code: Option<u32>,
}

impl ResolverOptions {
    /// Build from the `[resolver]` declaration section
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            build_type: config.build_type.as_deref().map(BuildType::from),
            deny_debug_signing: config.deny_debug_signing,
            previous_version_code: config.previous_version_code,
        }
    }
}

/// Resolves declarations against one framework and option set
#[derive(Debug, Clone, Default)]
pub struct ProfileResolver {
    framework: FrameworkDefaults,
    options: ResolverOptions,
}

impl ProfileResolver {
    /// Create a resolver
    #[must_use]
    pub fn new(framework: FrameworkDefaults, options: ResolverOptions) -> Self {
        Self { framework, options }
    }

    /// Resolve a declaration into a build profile
    #[instrument(skip_all, fields(framework = %self.framework.name))]
    pub fn resolve(&self, declaration: &BuildDeclaration) -> Result<ResolvedProfile> {
        let mut warnings = Vec::new();
        let settings = self.merge(&declaration.settings)?;

        let application_id = settings.required_str(keys::APPLICATION_ID)?.to_string();
        let namespace = settings
            .optional_str(keys::NAMESPACE)?
            .map_or_else(|| application_id.clone(), str::to_string);
        let sdk = SdkLevels {
            min: settings.required_u32(keys::MIN_SDK)?,
            target: settings.required_u32(keys::TARGET_SDK)?,
            compile: settings.required_u32(keys::COMPILE_SDK)?,
        };
        let version_code = settings.required_u32(keys::VERSION_CODE)?;
        let version_name = settings.required_str(keys::VERSION_NAME)?.to_string();
        let source_compatibility =
            java_setting(&settings, keys::SOURCE_COMPATIBILITY)?.unwrap_or(DEFAULT_JAVA_VERSION);
        let target_compatibility =
            java_setting(&settings, keys::TARGET_COMPATIBILITY)?.unwrap_or(source_compatibility);
        let jvm_target =
            java_setting(&settings, keys::JVM_TARGET)?.unwrap_or(target_compatibility);
        let desugaring_enabled = settings
            .optional_bool(keys::DESUGARING_ENABLED)?
            .unwrap_or(false);
        let multi_dex_enabled = settings
            .optional_bool(keys::MULTI_DEX_ENABLED)?
            .unwrap_or(false);
        let test_instrumentation_runner = settings
            .optional_str(keys::TEST_INSTRUMENTATION_RUNNER)?
            .map(str::to_string);
        let ndk_version = settings.optional_str(keys::NDK_VERSION)?.map(str::to_string);
        let build_type = match &self.options.build_type {
            Some(build_type) => build_type.clone(),
            None => settings
                .optional_str(keys::BUILD_TYPE)?
                .map(BuildType::from)
                .unwrap_or_default(),
        };
        let explicit_signing = settings.optional_str(keys::SIGNING_CONFIG)?;

        let version_check = Validator::new()
            .range(keys::VERSION_CODE, version_code, 1, MAX_VERSION_CODE)
            .validate();
        if let Some(error) = version_check.errors().first() {
            return Err(ResolveError::schema(keys::VERSION_CODE, error.message.clone()));
        }

        sdk.validate()?;
        if source_compatibility > target_compatibility {
            return Err(ResolveError::ordering(
                keys::SOURCE_COMPATIBILITY,
                format!(
                    "{} ({source_compatibility}) must not exceed {} ({target_compatibility})",
                    keys::SOURCE_COMPATIBILITY,
                    keys::TARGET_COMPATIBILITY
                ),
            ));
        }
        if let Some(previous) = self.options.previous_version_code {
            if version_code <= previous {
                return Err(ResolveError::ordering(
                    keys::VERSION_CODE,
                    format!("{version_code} must be greater than the previous release's {previous}"),
                ));
            }
        }
        if jvm_target != target_compatibility {
            warnings.push(ProfileWarning::JvmTargetMismatch {
                jvm_target,
                target_compatibility,
            });
        }
        debug!(min = sdk.min, target = sdk.target, compile = sdk.compile, "ordering checked");

        validate_package_identifier(keys::APPLICATION_ID, &application_id)?;
        validate_package_identifier(keys::NAMESPACE, &namespace)?;

        let dependencies: Vec<Dependency> = declaration
            .dependencies
            .iter()
            .cloned()
            .map(Dependency::normalized)
            .collect();
        ensure_unique(&dependencies)?;

        let desugaring_dependencies: Vec<&Dependency> =
            dependencies.iter().filter(|d| d.is_desugaring()).collect();
        if desugaring_enabled && desugaring_dependencies.is_empty() {
            return Err(ResolveError::MissingDependency {
                field: keys::DESUGARING_ENABLED.to_string(),
                required: "core library desugaring (com.android.tools:desugar_jdk_libs)".to_string(),
            });
        }
        if !desugaring_enabled {
            warnings.extend(desugaring_dependencies.iter().map(|d| {
                ProfileWarning::UnusedDesugaringDependency {
                    name: d.name.clone(),
                }
            }));
        }

        let plugins = resolve_plugins(
            &declaration.plugins,
            &self.framework.plugin_id,
            &declaration.features,
        )?;

        let (signing_config, signing_warning) = select_signing(
            &build_type,
            explicit_signing,
            &declaration.signing,
            self.options.deny_debug_signing,
        )?;
        warnings.extend(signing_warning);

        let profile = BuildProfile {
            application_id,
            namespace,
            min_sdk: sdk.min,
            target_sdk: sdk.target,
            compile_sdk: sdk.compile,
            ndk_version,
            version_code,
            version_name,
            source_compatibility,
            target_compatibility,
            jvm_target,
            desugaring_enabled,
            multi_dex_enabled,
            test_instrumentation_runner,
            build_type,
            signing_config,
            dependencies,
            plugins,
            features: declaration.features.to_map(),
        };

        info!(
            application_id = %profile.application_id,
            build_type = %profile.build_type,
            warnings = warnings.len(),
            "build profile resolved"
        );

        Ok(ResolvedProfile { profile, warnings })
    }

    /// Explicit settings over framework defaults, with framework references substituted
    fn merge(&self, explicit: &RawSettings) -> Result<RawSettings> {
        let merged = explicit.merged_over(&self.framework.as_settings());
        for key in merged.keys().filter(|key| explicit.get(key).is_none()) {
            debug!(key, "framework default applied");
        }
        self.framework.substitute_references(&merged)
    }
}

/// Resolve with the given framework defaults and options
pub fn resolve(
    declaration: &BuildDeclaration,
    framework: &FrameworkDefaults,
    options: &ResolverOptions,
) -> Result<ResolvedProfile> {
    ProfileResolver::new(framework.clone(), options.clone()).resolve(declaration)
}

fn java_setting(settings: &RawSettings, key: &str) -> Result<Option<JavaVersion>> {
    settings
        .get(key)
        .map(|value| JavaVersion::from_raw(key, value))
        .transpose()
}

/// Check reverse-domain package identifier syntax
pub fn validate_package_identifier(field: &str, value: &str) -> Result<()> {
    let validator = Validator::new().required(field, value);
    let result = match PACKAGE_ID.as_ref() {
        Some(re) => validator.matches(field, value, re, PACKAGE_ID_DESCRIPTION),
        None => validator.pattern(field, value, PACKAGE_ID_PATTERN, PACKAGE_ID_DESCRIPTION),
    }
    .validate();

    match result.errors().first() {
        Some(error) => Err(ResolveError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
            reason: error.message.clone(),
        }),
        None => Ok(()),
    }
}
