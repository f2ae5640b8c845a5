//! The resolved build profile

use crate::dependency::Dependency;
use crate::sdk::{JavaVersion, SdkLevels};
use crate::signing::{BuildType, SigningConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A normalized, validated build profile.
///
/// Built only by the resolver and read-only afterwards. Serializes with the
/// camelCase field names the framework's Gradle plugin expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProfile {
    pub(crate) application_id: String,
    pub(crate) namespace: String,
    pub(crate) min_sdk: u32,
    pub(crate) target_sdk: u32,
    pub(crate) compile_sdk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ndk_version: Option<String>,
    pub(crate) version_code: u32,
    pub(crate) version_name: String,
    pub(crate) source_compatibility: JavaVersion,
    pub(crate) target_compatibility: JavaVersion,
    pub(crate) jvm_target: JavaVersion,
    pub(crate) desugaring_enabled: bool,
    pub(crate) multi_dex_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) test_instrumentation_runner: Option<String>,
    pub(crate) build_type: BuildType,
    pub(crate) signing_config: SigningConfig,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) plugins: Vec<String>,
    pub(crate) features: BTreeMap<String, bool>,
}

impl BuildProfile {
    /// Reverse-domain application identifier
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Namespace for generated R classes
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The three API levels together
    pub fn sdk(&self) -> SdkLevels {
        SdkLevels {
            min: self.min_sdk,
            target: self.target_sdk,
            compile: self.compile_sdk,
        }
    }

    /// Lowest supported API level
    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    /// API level the app targets
    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    /// API level compiled against
    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }

    /// NDK version, if set
    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    /// Release counter
    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    /// User-visible version
    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    /// Java source level
    pub fn source_compatibility(&self) -> JavaVersion {
        self.source_compatibility
    }

    /// Java bytecode level
    pub fn target_compatibility(&self) -> JavaVersion {
        self.target_compatibility
    }

    /// Kotlin JVM target
    pub fn jvm_target(&self) -> JavaVersion {
        self.jvm_target
    }

    /// Whether core library desugaring is on
    pub fn desugaring_enabled(&self) -> bool {
        self.desugaring_enabled
    }

    /// Whether multidex is on
    pub fn multi_dex_enabled(&self) -> bool {
        self.multi_dex_enabled
    }

    /// Instrumentation runner class, if set
    pub fn test_instrumentation_runner(&self) -> Option<&str> {
        self.test_instrumentation_runner.as_deref()
    }

    /// Build type the profile was resolved for
    pub fn build_type(&self) -> &BuildType {
        &self.build_type
    }

    /// Selected signing identity
    pub fn signing_config(&self) -> &SigningConfig {
        &self.signing_config
    }

    /// Dependencies in declaration order
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Applied plugin ids in application order
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Feature flag states the profile was resolved with
    pub fn features(&self) -> &BTreeMap<String, bool> {
        &self.features
    }
}

/// Non-fatal findings attached to a successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ProfileWarning {
    /// A release build is signed with the debug identity
    SigningFallback {
        /// Build type being signed
        build_type: String,
        /// Identity used instead of a release one
        identity: String,
    },
    /// Kotlin's JVM target differs from the Java target compatibility
    JvmTargetMismatch {
        /// Resolved `jvmTarget`
        jvm_target: JavaVersion,
        /// Resolved `targetCompatibility`
        target_compatibility: JavaVersion,
    },
    /// A desugaring library is declared but desugaring is off
    UnusedDesugaringDependency {
        /// Dependency name
        name: String,
    },
}

impl ProfileWarning {
    /// Field the warning is about
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            ProfileWarning::SigningFallback { .. } => "signingConfig",
            ProfileWarning::JvmTargetMismatch { .. } => "jvmTarget",
            ProfileWarning::UnusedDesugaringDependency { .. } => "dependencies",
        }
    }
}

impl fmt::Display for ProfileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileWarning::SigningFallback { build_type, identity } => write!(
                f,
                "{build_type} build has no release signing identity; signing with the {identity} identity"
            ),
            ProfileWarning::JvmTargetMismatch {
                jvm_target,
                target_compatibility,
            } => write!(
                f,
                "jvmTarget {} differs from targetCompatibility {}",
                jvm_target.jvm_target(),
                target_compatibility.jvm_target()
            ),
            ProfileWarning::UnusedDesugaringDependency { name } => write!(
                f,
                "{name} is declared but desugaringEnabled is false"
            ),
        }
    }
}

/// A build profile together with the warnings raised while resolving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProfile {
    /// The validated profile
    pub profile: BuildProfile,
    /// Non-fatal findings, in the order raised
    pub warnings: Vec<ProfileWarning>,
}

impl ResolvedProfile {
    /// Whether resolution raised any warning
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The signing fallback warning, if one was raised
    #[must_use]
    pub fn signing_fallback(&self) -> Option<&ProfileWarning> {
        self.warnings
            .iter()
            .find(|w| matches!(w, ProfileWarning::SigningFallback { .. }))
    }
}
