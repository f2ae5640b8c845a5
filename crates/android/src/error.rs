//! Resolution errors

use buildprofile_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result of a resolution step
pub type Result<T> = std::result::Result<T, ResolveError>;

/// The first invariant a set of build settings failed.
///
/// Every variant names the offending field; no partial profile accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Required field missing, wrong type, or out of range
    #[error("{field}: {message}")]
    Schema {
        /// Offending setting
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// SDK levels, compatibility levels, version codes or plugins out of order
    #[error("{field}: {message}")]
    OrderingViolation {
        /// Setting that is out of order
        field: String,
        /// The relation that failed
        message: String,
    },

    /// Desugaring enabled without a desugaring dependency
    #[error("{field} is enabled but no {required} dependency is declared")]
    MissingDependency {
        /// Setting that needs the dependency
        field: String,
        /// Kind of dependency required
        required: String,
    },

    /// Not a valid package identifier
    #[error("{field}: \"{value}\" is not a valid package identifier ({reason})")]
    InvalidIdentifier {
        /// `applicationId` or `namespace`
        field: String,
        /// The rejected identifier
        value: String,
        /// Which rule it breaks
        reason: String,
    },

    /// A dependency name declared more than once
    #[error("dependencies: \"{name}\" is declared more than once")]
    DuplicateDependency {
        /// Name declared twice
        name: String,
    },

    /// Release build would be signed with the debug identity and that is denied
    #[error("signingConfig: {build_type} build has no release signing identity and debug signing is denied")]
    SigningFallback {
        /// Release build type being resolved
        build_type: String,
    },
}

impl ResolveError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn ordering(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OrderingViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::schema(field, "required setting is missing")
    }

    /// Field that failed
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Schema { field, .. }
            | Self::OrderingViolation { field, .. }
            | Self::MissingDependency { field, .. }
            | Self::InvalidIdentifier { field, .. } => field,
            Self::DuplicateDependency { .. } => "dependencies",
            Self::SigningFallback { .. } => "signingConfig",
        }
    }

    /// Taxonomy name of the error
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SchemaError",
            Self::OrderingViolation { .. } => "OrderingViolation",
            Self::MissingDependency { .. } => "MissingDependencyError",
            Self::InvalidIdentifier { .. } => "InvalidIdentifier",
            Self::DuplicateDependency { .. } => "DuplicateDependency",
            Self::SigningFallback { .. } => "SigningFallback",
        }
    }

    /// Error code for reporting
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Schema { .. } => ErrorCode::SchemaError,
            Self::OrderingViolation { .. } => ErrorCode::OrderingViolation,
            Self::MissingDependency { .. } => ErrorCode::MissingDependency,
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidIdentifier,
            Self::DuplicateDependency { .. } => ErrorCode::DuplicateDependency,
            Self::SigningFallback { .. } => ErrorCode::SigningFallback,
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "Set the field in [settings] with the expected type",
            Self::OrderingViolation { .. } => {
                "Keep minSdk <= targetSdk <= compileSdk and sourceCompatibility <= targetCompatibility"
            }
            Self::MissingDependency { .. } => {
                "Add coreLibraryDesugaring \"com.android.tools:desugar_jdk_libs:<version>\" to [[dependencies]]"
            }
            Self::InvalidIdentifier { .. } => {
                "Use at least two dot-separated segments, each starting with a letter"
            }
            Self::DuplicateDependency { .. } => "Remove the duplicate [[dependencies]] entry",
            Self::SigningFallback { .. } => {
                "Declare a [signing.release] identity or set signingConfig explicitly"
            }
        }
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        Error::new(err.code(), err.to_string())
            .with_context(format!("{} on field `{}`", err.kind(), err.field()))
            .with_suggestion(err.suggestion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(ResolveError::missing("minSdk").field(), "minSdk");
        assert_eq!(
            ResolveError::DuplicateDependency { name: "x".into() }.field(),
            "dependencies"
        );
    }

    #[test]
    fn test_display() {
        let err = ResolveError::MissingDependency {
            field: "desugaringEnabled".into(),
            required: "core library desugaring".into(),
        };
        assert_eq!(
            err.to_string(),
            "desugaringEnabled is enabled but no core library desugaring dependency is declared"
        );
    }

    #[test]
    fn test_into_core_error() {
        let err: Error = ResolveError::ordering("minSdk", "34 exceeds targetSdk 21").into();
        assert_eq!(err.code, ErrorCode::OrderingViolation);
        assert_eq!(
            err.context.as_deref(),
            Some("OrderingViolation on field `minSdk`")
        );
        assert!(err.suggestion.is_some());
    }
}
