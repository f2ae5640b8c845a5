//! Dependency declarations

use crate::error::{ResolveError, Result};
use buildprofile_core::config::DependencyConfig;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Group publishing the core library desugaring artifacts
pub const DESUGARING_GROUP: &str = "com.android.tools";

/// Artifacts that provide core library desugaring
pub const DESUGARING_ARTIFACTS: &[&str] = &[
    "desugar_jdk_libs",
    "desugar_jdk_libs_nio",
    "desugar_jdk_libs_minimal",
];

/// Gradle dependency configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Configuration {
    /// `implementation`
    Implementation,
    /// `api`
    Api,
    /// `compileOnly`
    CompileOnly,
    /// `runtimeOnly`
    RuntimeOnly,
    /// `testImplementation`
    TestImplementation,
    /// `androidTestImplementation`
    AndroidTestImplementation,
    /// `coreLibraryDesugaring`
    CoreLibraryDesugaring,
    /// Any other configuration name
    Other(String),
}

impl Configuration {
    /// Name as written in a `dependencies { }` block
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Configuration::Implementation => "implementation",
            Configuration::Api => "api",
            Configuration::CompileOnly => "compileOnly",
            Configuration::RuntimeOnly => "runtimeOnly",
            Configuration::TestImplementation => "testImplementation",
            Configuration::AndroidTestImplementation => "androidTestImplementation",
            Configuration::CoreLibraryDesugaring => "coreLibraryDesugaring",
            Configuration::Other(name) => name,
        }
    }
}

impl From<&str> for Configuration {
    fn from(name: &str) -> Self {
        match name {
            "implementation" => Configuration::Implementation,
            "api" => Configuration::Api,
            "compileOnly" => Configuration::CompileOnly,
            "runtimeOnly" => Configuration::RuntimeOnly,
            "testImplementation" => Configuration::TestImplementation,
            "androidTestImplementation" => Configuration::AndroidTestImplementation,
            "coreLibraryDesugaring" => Configuration::CoreLibraryDesugaring,
            other => Configuration::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Configuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A declared dependency: a name (`artifact` or `group:artifact`) and a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// `artifact` or `group:artifact`
    pub name: String,
    /// Version string, passed through as declared
    pub version: String,
    /// Gradle configuration the dependency is added to
    pub configuration: Configuration,
}

impl Dependency {
    /// Create a dependency. The configuration is inferred from the artifact:
    /// desugaring artifacts go to `coreLibraryDesugaring`, everything else to
    /// `implementation`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let configuration = if is_desugaring_artifact(artifact_of(&name)) {
            Configuration::CoreLibraryDesugaring
        } else {
            Configuration::Implementation
        };
        Self {
            name,
            version: version.into(),
            configuration,
        }
    }

    /// Override the configuration
    #[must_use]
    pub fn with_configuration(mut self, configuration: impl Into<Configuration>) -> Self {
        self.configuration = configuration.into();
        self
    }

    /// Parse a `group:artifact:version` coordinate
    pub fn parse_coordinate(coordinate: &str) -> Result<Self> {
        let parts: Vec<&str> = coordinate.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(format!("{group}:{artifact}"), *version))
            }
            _ => Err(ResolveError::schema(
                "dependencies",
                format!("\"{coordinate}\" is not a group:artifact:version coordinate"),
            )),
        }
    }

    /// Build from a declaration entry
    pub fn from_config(config: &DependencyConfig) -> Result<Self> {
        let dependency = match (&config.coordinate, &config.name, &config.version) {
            (Some(coordinate), None, None) => Self::parse_coordinate(coordinate)?,
            (None, Some(name), Some(version)) if !name.trim().is_empty() && !version.trim().is_empty() => {
                Self::new(name.trim(), version.trim())
            }
            _ => {
                return Err(ResolveError::schema(
                    "dependencies",
                    "each entry needs either `coordinate` or both `name` and `version`",
                ))
            }
        };

        Ok(match &config.configuration {
            Some(configuration) => dependency.with_configuration(configuration.as_str()),
            None => dependency,
        })
    }

    /// Group, if the name carries one
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.name.split_once(':').map(|(group, _)| group)
    }

    /// Artifact part of the name
    #[must_use]
    pub fn artifact(&self) -> &str {
        artifact_of(&self.name)
    }

    /// Whether this dependency provides core library desugaring
    #[must_use]
    pub fn is_desugaring(&self) -> bool {
        self.configuration == Configuration::CoreLibraryDesugaring
            || is_desugaring_artifact(self.artifact())
    }

    /// Name with well-known bare artifacts qualified by their group
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.group().is_none() && is_desugaring_artifact(&self.name) {
            self.name = format!("{DESUGARING_GROUP}:{}", self.name);
        }
        self
    }

    /// Gradle notation, `group:artifact:version`
    #[must_use]
    pub fn notation(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

fn artifact_of(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, artifact)| artifact)
}

fn is_desugaring_artifact(artifact: &str) -> bool {
    DESUGARING_ARTIFACTS.contains(&artifact)
}

/// Fail on the first name that appears twice
pub fn ensure_unique(dependencies: &[Dependency]) -> Result<()> {
    let mut seen = HashSet::new();
    for dependency in dependencies {
        if !seen.insert(dependency.name.as_str()) {
            return Err(ResolveError::DuplicateDependency {
                name: dependency.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let dep = Dependency::parse_coordinate("com.android.tools:desugar_jdk_libs:2.0.4").unwrap();
        assert_eq!(dep.name, "com.android.tools:desugar_jdk_libs");
        assert_eq!(dep.version, "2.0.4");
        assert_eq!(dep.group(), Some("com.android.tools"));
        assert_eq!(dep.artifact(), "desugar_jdk_libs");
        assert_eq!(dep.configuration, Configuration::CoreLibraryDesugaring);
    }

    #[test]
    fn test_parse_bad_coordinate() {
        assert!(Dependency::parse_coordinate("desugar_jdk_libs").is_err());
        assert!(Dependency::parse_coordinate("a::1").is_err());
    }

    #[test]
    fn test_bare_desugaring_name() {
        let dep = Dependency::new("desugar_jdk_libs", "2.0.4");
        assert!(dep.is_desugaring());
        assert_eq!(dep.normalized().notation(), "com.android.tools:desugar_jdk_libs:2.0.4");
    }

    #[test]
    fn test_desugaring_by_configuration() {
        let dep = Dependency::new("org.example:custom_desugar", "1.0")
            .with_configuration("coreLibraryDesugaring");
        assert!(dep.is_desugaring());

        let dep = Dependency::new("androidx.core:core-ktx", "1.13.1");
        assert!(!dep.is_desugaring());
        assert_eq!(dep.configuration, Configuration::Implementation);
    }

    #[test]
    fn test_from_config() {
        let config = DependencyConfig {
            name: Some("androidx.multidex:multidex".into()),
            version: Some("2.0.1".into()),
            configuration: Some("implementation".into()),
            ..Default::default()
        };
        let dep = Dependency::from_config(&config).unwrap();
        assert_eq!(dep.notation(), "androidx.multidex:multidex:2.0.1");

        let both = DependencyConfig {
            coordinate: Some("a:b:1".into()),
            name: Some("a:b".into()),
            ..Default::default()
        };
        assert!(Dependency::from_config(&both).is_err());
    }

    #[test]
    fn test_ensure_unique() {
        let deps = vec![
            Dependency::new("a:b", "1"),
            Dependency::new("a:c", "1"),
            Dependency::new("a:b", "2"),
        ];
        let err = ensure_unique(&deps).unwrap_err();
        assert_eq!(err, ResolveError::DuplicateDependency { name: "a:b".into() });
    }

    #[test]
    fn test_configuration_names() {
        assert_eq!(Configuration::from("kapt").as_str(), "kapt");
        assert_eq!(Configuration::from("coreLibraryDesugaring"), Configuration::CoreLibraryDesugaring);
    }
}
