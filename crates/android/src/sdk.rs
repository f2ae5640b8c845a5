//! SDK levels and Java language levels

use crate::error::{ResolveError, Result};
use crate::settings::{keys, wrong_type, RawValue};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The three API levels of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkLevels {
    /// `minSdk`
    pub min: u32,
    /// `targetSdk`
    pub target: u32,
    /// `compileSdk`
    pub compile: u32,
}

impl SdkLevels {
    /// Check `min <= target <= compile`
    pub fn validate(&self) -> Result<()> {
        if self.min > self.target {
            return Err(ResolveError::ordering(
                keys::MIN_SDK,
                format!(
                    "{} ({}) must not exceed {} ({})",
                    keys::MIN_SDK,
                    self.min,
                    keys::TARGET_SDK,
                    self.target
                ),
            ));
        }
        if self.target > self.compile {
            return Err(ResolveError::ordering(
                keys::TARGET_SDK,
                format!(
                    "{} ({}) must not exceed {} ({})",
                    keys::TARGET_SDK,
                    self.target,
                    keys::COMPILE_SDK,
                    self.compile
                ),
            ));
        }
        Ok(())
    }
}

/// Java language level, ordered by feature release.
///
/// Legacy levels are stored by their minor number, so `1.8` is `8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaVersion(u8);

impl JavaVersion {
    /// Java 8
    pub const VERSION_1_8: JavaVersion = JavaVersion(8);
    /// Java 11
    pub const VERSION_11: JavaVersion = JavaVersion(11);
    /// Java 17
    pub const VERSION_17: JavaVersion = JavaVersion(17);

    /// Lowest level Gradle still models
    const OLDEST: u8 = 1;
    /// Highest level accepted
    const NEWEST: u8 = 99;

    /// Create from a feature release number
    #[must_use]
    pub fn new(feature: u8) -> Option<Self> {
        (Self::OLDEST..=Self::NEWEST)
            .contains(&feature)
            .then_some(JavaVersion(feature))
    }

    /// Feature release number
    #[must_use]
    pub fn feature(self) -> u8 {
        self.0
    }

    /// Gradle `JavaVersion` enum constant, e.g. `VERSION_1_8`
    #[must_use]
    pub fn gradle_name(self) -> String {
        if self.0 <= 8 {
            format!("VERSION_1_{}", self.0)
        } else {
            format!("VERSION_{}", self.0)
        }
    }

    /// String form used by `jvmTarget`, e.g. `1.8` or `11`
    #[must_use]
    pub fn jvm_target(self) -> String {
        if self.0 <= 8 {
            format!("1.{}", self.0)
        } else {
            self.0.to_string()
        }
    }

    /// Extract a level from a raw setting value
    pub fn from_raw(key: &str, value: &RawValue) -> Result<Self> {
        let parsed = match value {
            RawValue::Integer(i) => u8::try_from(*i).ok().and_then(JavaVersion::new),
            RawValue::String(s) => s.parse().ok(),
            RawValue::Bool(_) => return Err(wrong_type(key, "Java version", value)),
        };
        parsed.ok_or_else(|| {
            ResolveError::schema(key, format!("{value} is not a Java version"))
        })
    }
}

impl FromStr for JavaVersion {
    type Err = String;

    /// Accepts `VERSION_11`, `JavaVersion.VERSION_1_8`, `1.8`, `11`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let bare = bare.strip_prefix("VERSION_").unwrap_or(bare);
        let normalized = bare.replace('_', ".");
        let number = normalized.strip_prefix("1.").unwrap_or(&normalized);

        number
            .parse::<u8>()
            .ok()
            .and_then(JavaVersion::new)
            .ok_or_else(|| format!("invalid Java version: {s}"))
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.gradle_name())
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.gradle_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_ordering() {
        let ok = SdkLevels { min: 21, target: 34, compile: 36 };
        assert!(ok.validate().is_ok());

        let equal = SdkLevels { min: 34, target: 34, compile: 34 };
        assert!(equal.validate().is_ok());

        let bad = SdkLevels { min: 34, target: 21, compile: 36 };
        let err = bad.validate().unwrap_err();
        assert_eq!(err.kind(), "OrderingViolation");
        assert_eq!(err.field(), "minSdk");

        let bad = SdkLevels { min: 21, target: 36, compile: 34 };
        assert_eq!(bad.validate().unwrap_err().field(), "targetSdk");
    }

    #[test]
    fn test_parse_java_versions() {
        assert_eq!("VERSION_11".parse(), Ok(JavaVersion::VERSION_11));
        assert_eq!("JavaVersion.VERSION_1_8".parse(), Ok(JavaVersion::VERSION_1_8));
        assert_eq!("1.8".parse(), Ok(JavaVersion::VERSION_1_8));
        assert_eq!("17".parse(), Ok(JavaVersion::VERSION_17));
        assert!("VERSION_X".parse::<JavaVersion>().is_err());
        assert!("0".parse::<JavaVersion>().is_err());
    }

    #[test]
    fn test_java_version_ordering() {
        assert!(JavaVersion::VERSION_1_8 < JavaVersion::VERSION_11);
        assert!(JavaVersion::VERSION_11 < JavaVersion::VERSION_17);
    }

    #[test]
    fn test_names() {
        assert_eq!(JavaVersion::VERSION_1_8.gradle_name(), "VERSION_1_8");
        assert_eq!(JavaVersion::VERSION_1_8.jvm_target(), "1.8");
        assert_eq!(JavaVersion::VERSION_11.to_string(), "VERSION_11");
        assert_eq!(JavaVersion::VERSION_11.jvm_target(), "11");
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(
            JavaVersion::from_raw("sourceCompatibility", &RawValue::Integer(11)),
            Ok(JavaVersion::VERSION_11)
        );
        assert!(JavaVersion::from_raw("sourceCompatibility", &RawValue::Bool(true)).is_err());
        assert!(JavaVersion::from_raw("sourceCompatibility", &RawValue::Integer(-1)).is_err());
    }
}
