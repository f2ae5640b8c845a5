//! Error handling with codes, context and recovery suggestions
//!
//! This module provides structured error types with:
//! - Error codes for programmatic handling
//! - Detailed error context
//! - Recovery suggestions
//! - Serializable error reports

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Bug or unexpected state
    Internal = 1001,

    // IO errors (2xxx)
    /// Other I/O failure
    IoError = 2000,
    /// File does not exist
    FileNotFound = 2001,
    /// File not accessible
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    /// Requested declaration file missing
    ConfigNotFound = 3001,
    /// Declaration file is not valid TOML or has the wrong shape
    ConfigParseError = 3002,

    // Resolution errors (6xxx)
    /// Generic validation failure
    ValidationError = 6000,
    /// Setting missing, mistyped or out of range
    SchemaError = 6001,
    /// Levels, version code or plugins out of order
    OrderingViolation = 6002,
    /// Desugaring enabled without a desugaring library
    MissingDependency = 6003,
    /// Malformed package identifier
    InvalidIdentifier = 6004,
    /// Dependency declared twice
    DuplicateDependency = 6005,
    /// Release build would use debug signing
    SigningFallback = 6006,
}

impl ErrorCode {
    /// Get the numeric code
    #[must_use]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            6 => "Validation",
            _ => "Unknown",
        }
    }

    /// Process exit code for a CLI failing with this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            6 => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Process exit code matching this error's category
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    /// Convert to a serializable report
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    // Convenience constructors

    /// Explicitly requested declaration file is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Declaration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a buildprofile.toml file or use --config to specify a path")
    }
}

/// Serializable error report for logging and machine-readable output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Code as `E####`
    pub code_str: String,
    /// Code category
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Underlying error, rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Any other failure
    pub const FAILURE: i32 = 1;
    /// Declaration failed validation
    pub const VALIDATION_ERROR: i32 = 2;
    /// Declaration file missing or unreadable
    pub const CONFIG_ERROR: i32 = 3;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("JSON error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::OrderingViolation.to_string(), "E6002");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::MissingDependency.category(), "Validation");
    }

    #[test]
    fn test_every_code_has_category() {
        let codes = [
            ErrorCode::Internal,
            ErrorCode::IoError,
            ErrorCode::FileNotFound,
            ErrorCode::PermissionDenied,
            ErrorCode::ConfigNotFound,
            ErrorCode::ConfigParseError,
            ErrorCode::ValidationError,
            ErrorCode::SchemaError,
            ErrorCode::OrderingViolation,
            ErrorCode::MissingDependency,
            ErrorCode::InvalidIdentifier,
            ErrorCode::DuplicateDependency,
            ErrorCode::SigningFallback,
        ];
        for code in codes {
            assert_ne!(code.category(), "Unknown", "{code}");
        }
    }

    #[test]
    fn test_exit_code_by_category() {
        assert_eq!(ErrorCode::SchemaError.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_not_found("/path/to/buildprofile.toml")
            .with_context("While loading declarations");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::new(ErrorCode::ValidationError, "bad"));
        let err = result.context("field `minSdk`").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("field `minSdk`"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::new(ErrorCode::SchemaError, "minSdk is required")
            .with_context("field `minSdk`");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E6001"));
        assert!(json.contains("Validation"));
    }
}
