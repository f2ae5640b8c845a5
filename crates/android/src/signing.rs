//! Build types and signing identity selection
//!
//! Identities are only referenced by name. Key stores are the packager's business.

use crate::error::{ResolveError, Result};
use crate::profile::ProfileWarning;
use crate::settings::keys;
use buildprofile_core::config::SigningIdentityConfig;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Name of the debug signing identity every Android build has
pub const DEBUG_IDENTITY: &str = "debug";

/// Identity a release build uses when `signingConfig` is not set
pub const RELEASE_IDENTITY: &str = "release";

/// Gradle build type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum BuildType {
    /// Development build, the default
    #[default]
    Debug,
    /// Framework profiling build
    Profile,
    /// Production build
    Release,
    /// Build type declared by the project
    Custom(String),
}

impl BuildType {
    /// Name as used by Gradle
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Profile => "profile",
            BuildType::Release => "release",
            BuildType::Custom(name) => name,
        }
    }

    /// Whether builds of this type are production artifacts
    #[must_use]
    pub fn is_release(&self) -> bool {
        matches!(self, BuildType::Release)
    }

    /// Whether Gradle creates this build type itself
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, BuildType::Custom(_))
    }

    /// Name with the first letter upper-cased, as in task names
    #[must_use]
    pub fn capitalized(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for BuildType {
    fn from(name: &str) -> Self {
        match name {
            "debug" => BuildType::Debug,
            "profile" => BuildType::Profile,
            "release" => BuildType::Release,
            other => BuildType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for BuildType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Signing identity selected for a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningConfig {
    /// The debug identity every Android build has
    Debug,
    /// A declared release identity
    Release(String),
}

impl SigningConfig {
    /// Identity name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SigningConfig::Debug => DEBUG_IDENTITY,
            SigningConfig::Release(name) => name,
        }
    }

    /// Whether this is the debug identity
    #[must_use]
    pub fn is_debug(&self) -> bool {
        matches!(self, SigningConfig::Debug)
    }
}

impl fmt::Display for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SigningConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Declared signing identities, by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningIdentities {
    identities: BTreeMap<String, SigningIdentityConfig>,
}

impl SigningIdentities {
    /// No release identities
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an identity without details
    #[must_use]
    pub fn with_identity(mut self, name: impl Into<String>) -> Self {
        self.identities
            .insert(name.into(), SigningIdentityConfig::default());
        self
    }

    /// Whether an identity with this name is available. `debug` always is.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        name == DEBUG_IDENTITY || self.identities.contains_key(name)
    }

    /// Details of a declared identity
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SigningIdentityConfig> {
        self.identities.get(name)
    }

    /// Declared identity names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.identities.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, SigningIdentityConfig>> for SigningIdentities {
    fn from(identities: BTreeMap<String, SigningIdentityConfig>) -> Self {
        Self { identities }
    }
}

/// Pick the signing identity for a build type.
///
/// An explicit name must be declared. Without one, non-release builds sign
/// with `debug` and release builds with the `release` identity, falling back
/// to `debug` with a warning when none is declared, or failing if
/// `deny_debug_signing` is set. A release build explicitly naming `debug`
/// gets the same warning.
pub fn select_signing(
    build_type: &BuildType,
    explicit: Option<&str>,
    identities: &SigningIdentities,
    deny_debug_signing: bool,
) -> Result<(SigningConfig, Option<ProfileWarning>)> {
    let selected = match explicit {
        Some(name) if !identities.contains(name) => {
            return Err(ResolveError::schema(
                keys::SIGNING_CONFIG,
                format!("unknown signing identity \"{name}\""),
            ));
        }
        Some(DEBUG_IDENTITY) => SigningConfig::Debug,
        Some(name) => SigningConfig::Release(name.to_string()),
        None if !build_type.is_release() => SigningConfig::Debug,
        None if identities.contains(RELEASE_IDENTITY) => {
            SigningConfig::Release(RELEASE_IDENTITY.to_string())
        }
        None => SigningConfig::Debug,
    };

    if !(build_type.is_release() && selected.is_debug()) {
        debug!(build_type = %build_type, identity = %selected, "signing identity selected");
        return Ok((selected, None));
    }

    if deny_debug_signing {
        return Err(ResolveError::SigningFallback {
            build_type: build_type.to_string(),
        });
    }

    warn!(
        build_type = %build_type,
        "release build is signed with the debug identity"
    );
    Ok((
        selected,
        Some(ProfileWarning::SigningFallback {
            build_type: build_type.to_string(),
            identity: DEBUG_IDENTITY.to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_build_uses_debug_identity() {
        let (config, warning) =
            select_signing(&BuildType::Debug, None, &SigningIdentities::new(), true).unwrap();
        assert_eq!(config, SigningConfig::Debug);
        assert!(warning.is_none());
    }

    #[test]
    fn test_release_uses_release_identity() {
        let identities = SigningIdentities::new().with_identity("release");
        let (config, warning) =
            select_signing(&BuildType::Release, None, &identities, false).unwrap();
        assert_eq!(config, SigningConfig::Release("release".into()));
        assert!(warning.is_none());
    }

    #[test]
    fn test_release_falls_back_with_warning() {
        let (config, warning) =
            select_signing(&BuildType::Release, None, &SigningIdentities::new(), false).unwrap();
        assert_eq!(config, SigningConfig::Debug);
        assert_eq!(
            warning,
            Some(ProfileWarning::SigningFallback {
                build_type: "release".into(),
                identity: "debug".into(),
            })
        );
    }

    #[test]
    fn test_explicit_debug_on_release_still_warns() {
        let identities = SigningIdentities::new().with_identity("release");
        let (_, warning) =
            select_signing(&BuildType::Release, Some("debug"), &identities, false).unwrap();
        assert!(warning.is_some());
    }

    #[test]
    fn test_fallback_denied() {
        let err = select_signing(&BuildType::Release, None, &SigningIdentities::new(), true)
            .unwrap_err();
        assert_eq!(err.field(), "signingConfig");
        assert_eq!(err.kind(), "SigningFallback");
    }

    #[test]
    fn test_unknown_explicit_identity() {
        let err = select_signing(&BuildType::Release, Some("upload"), &SigningIdentities::new(), false)
            .unwrap_err();
        assert_eq!(err.kind(), "SchemaError");
    }

    #[test]
    fn test_explicit_named_identity() {
        let identities = SigningIdentities::new().with_identity("upload");
        let (config, _) =
            select_signing(&BuildType::Release, Some("upload"), &identities, true).unwrap();
        assert_eq!(config.name(), "upload");
    }

    #[test]
    fn test_build_type_names() {
        assert_eq!(BuildType::from("release"), BuildType::Release);
        assert_eq!(BuildType::from("staging").capitalized(), "Staging");
        assert!(!BuildType::from("staging").is_builtin());
        assert!(!BuildType::Profile.is_release());
    }
}
