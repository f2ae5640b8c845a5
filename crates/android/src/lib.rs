//! Android build profile resolution
//!
//! This crate turns declarative Android build settings into a validated
//! build profile:
//! - Raw settings and host framework defaults
//! - SDK and Java level ordering
//! - Dependency and desugaring checks
//! - Plugin order and feature-gated plugins
//! - Signing identity selection
//! - Gradle Kotlin DSL rendering
//!
//! # Example
//!
//! ```rust
//! use buildprofile_android::prelude::*;
//!
//! let settings = RawSettings::new()
//!     .with("applicationId", "com.example.app")
//!     .with("minSdk", 21)
//!     .with("targetSdk", 34)
//!     .with("compileSdk", 36)
//!     .with("versionCode", 1)
//!     .with("versionName", "1.0.0")
//!     .with("desugaringEnabled", true);
//! let declaration = BuildDeclaration::new(settings)
//!     .with_dependency(Dependency::new("desugar_jdk_libs", "2.0.4"));
//!
//! let resolved = ProfileResolver::default().resolve(&declaration).unwrap();
//! assert_eq!(resolved.profile.target_sdk(), 34);
//! ```

#![warn(missing_docs)]

pub mod declaration;
pub mod dependency;
pub mod error;
pub mod framework;
pub mod gradle;
pub mod plugins;
pub mod profile;
pub mod resolver;
pub mod sdk;
pub mod settings;
pub mod signing;

pub use error::{ResolveError, Result};
pub use profile::{BuildProfile, ProfileWarning, ResolvedProfile};
pub use resolver::{resolve, ProfileResolver, ResolverOptions};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::declaration::{BuildDeclaration, ResolutionInputs};
    pub use crate::dependency::Dependency;
    pub use crate::error::ResolveError;
    pub use crate::framework::FrameworkDefaults;
    pub use crate::profile::{BuildProfile, ProfileWarning, ResolvedProfile};
    pub use crate::resolver::{resolve, ProfileResolver, ResolverOptions};
    pub use crate::settings::{RawSettings, RawValue};
    pub use crate::signing::{BuildType, SigningConfig};
}
