//! Core utilities for build profile tooling
//!
//! This crate provides functionality shared by the platform resolvers and the CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML declaration files with defaults
//! - **Validation**: fluent validators and unknown-key checks
//! - **Feature flags**: explicit flag sets for optional build capabilities
//!
//! # Example
//!
//! ```rust,no_run
//! use buildprofile_core::config::Declaration;
//!
//! let declaration = Declaration::load(None).expect("declaration should load");
//! println!("framework: {}", declaration.schema.framework.name);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod feature_flags;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Declaration, DeclarationSchema, SettingValue};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::feature_flags::{FeatureFlags, Flag};
    pub use crate::validation::{ValidationResult, Validator};
}
