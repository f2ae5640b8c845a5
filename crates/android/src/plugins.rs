//! Gradle plugin application order and optional plugins

use crate::error::{ResolveError, Result};
use buildprofile_core::feature_flags::{FeatureFlags, Flag};
use std::collections::HashSet;
use tracing::debug;

/// Android application plugin
pub const ANDROID_APPLICATION: &str = "com.android.application";

/// Kotlin Android plugin ids, short and fully qualified
pub const KOTLIN_ANDROID: &[&str] = &["kotlin-android", "org.jetbrains.kotlin.android"];

/// Google Services plugin, used by Firebase
pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";

/// A plugin applied only when its feature flag is on
#[derive(Debug, Clone, Copy)]
pub struct OptionalPlugin {
    /// Feature flag that switches the plugin on
    pub flag: &'static str,
    /// Gradle plugin id
    pub plugin_id: &'static str,
    /// Shown by `explain`
    pub description: &'static str,
}

/// Plugins that are declared but gated behind a feature flag
pub const OPTIONAL_PLUGINS: &[OptionalPlugin] = &[OptionalPlugin {
    flag: "google_services",
    plugin_id: GOOGLE_SERVICES,
    description: "Apply the Google Services plugin for Firebase",
}];

/// Declared flags plus a disabled default for every optional plugin
#[must_use]
pub fn with_plugin_flags(flags: FeatureFlags) -> FeatureFlags {
    OPTIONAL_PLUGINS.iter().fold(flags, |flags, optional| {
        flags.with_default(Flag::new(optional.flag, false).with_description(optional.description))
    })
}

/// The optional plugin with this id, if it is one
#[must_use]
pub fn optional_plugin(plugin_id: &str) -> Option<&'static OptionalPlugin> {
    OPTIONAL_PLUGINS.iter().find(|optional| optional.plugin_id == plugin_id)
}

/// Final plugin list.
///
/// Declared plugins keep their order and must be unique; the framework
/// plugin has to come after the Android application and Kotlin plugins.
/// An optional plugin is applied exactly when its flag is on: declared ones
/// are dropped while the flag is off, missing ones are appended once it is on.
pub fn resolve_plugins(
    declared: &[String],
    framework_plugin: &str,
    flags: &FeatureFlags,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    for plugin in declared {
        if !seen.insert(plugin.as_str()) {
            return Err(ResolveError::schema(
                "plugins",
                format!("\"{plugin}\" is applied more than once"),
            ));
        }
    }

    if let Some(framework_index) = declared.iter().position(|p| p == framework_plugin) {
        let must_precede = declared
            .iter()
            .enumerate()
            .skip(framework_index + 1)
            .find(|(_, p)| p.as_str() == ANDROID_APPLICATION || KOTLIN_ANDROID.contains(&p.as_str()));

        if let Some((_, plugin)) = must_precede {
            return Err(ResolveError::ordering(
                "plugins",
                format!("{framework_plugin} must be applied after {plugin}"),
            ));
        }
    }

    let mut plugins: Vec<String> = declared
        .iter()
        .filter(|plugin| match optional_plugin(plugin) {
            Some(optional) if !flags.is_enabled(optional.flag) => {
                debug!(
                    flag = optional.flag,
                    plugin = %plugin,
                    "declared plugin dropped, flag is off"
                );
                false
            }
            _ => true,
        })
        .cloned()
        .collect();
    for optional in OPTIONAL_PLUGINS {
        if flags.is_enabled(optional.flag) && !plugins.iter().any(|p| p == optional.plugin_id) {
            debug!(flag = optional.flag, plugin = optional.plugin_id, "optional plugin enabled");
            plugins.push(optional.plugin_id.to_string());
        }
    }

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLUTTER: &str = "dev.flutter.flutter-gradle-plugin";

    fn declared(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_standard_order_accepted() {
        let plugins = declared(&[ANDROID_APPLICATION, "kotlin-android", FLUTTER]);
        let resolved = resolve_plugins(&plugins, FLUTTER, &FeatureFlags::new()).unwrap();
        assert_eq!(resolved, plugins);
    }

    #[test]
    fn test_framework_before_kotlin_rejected() {
        let plugins = declared(&[ANDROID_APPLICATION, FLUTTER, "org.jetbrains.kotlin.android"]);
        let err = resolve_plugins(&plugins, FLUTTER, &FeatureFlags::new()).unwrap_err();
        assert_eq!(err.kind(), "OrderingViolation");
        assert_eq!(err.field(), "plugins");
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let plugins = declared(&[ANDROID_APPLICATION, ANDROID_APPLICATION]);
        assert!(resolve_plugins(&plugins, FLUTTER, &FeatureFlags::new()).is_err());
    }

    #[test]
    fn test_google_services_gated_by_flag() {
        let plugins = declared(&[ANDROID_APPLICATION, "kotlin-android", FLUTTER]);

        let off = with_plugin_flags(FeatureFlags::new());
        assert!(!off.is_enabled("google_services"));
        let resolved = resolve_plugins(&plugins, FLUTTER, &off).unwrap();
        assert!(!resolved.iter().any(|p| p == GOOGLE_SERVICES));

        let on = with_plugin_flags(FeatureFlags::new().with_flag("google_services", true));
        let resolved = resolve_plugins(&plugins, FLUTTER, &on).unwrap();
        assert_eq!(resolved.last().map(String::as_str), Some(GOOGLE_SERVICES));
    }

    #[test]
    fn test_declared_optional_plugin_follows_flag() {
        let plugins = declared(&[ANDROID_APPLICATION, "kotlin-android", FLUTTER, GOOGLE_SERVICES]);

        let off = with_plugin_flags(FeatureFlags::new().with_flag("google_services", false));
        let resolved = resolve_plugins(&plugins, FLUTTER, &off).unwrap();
        assert_eq!(resolved, declared(&[ANDROID_APPLICATION, "kotlin-android", FLUTTER]));

        let on = with_plugin_flags(FeatureFlags::new().with_flag("google_services", true));
        let resolved = resolve_plugins(&plugins, FLUTTER, &on).unwrap();
        assert_eq!(resolved, plugins);
    }

    #[test]
    fn test_optional_plugin_lookup() {
        assert_eq!(optional_plugin(GOOGLE_SERVICES).map(|p| p.flag), Some("google_services"));
        assert!(optional_plugin(ANDROID_APPLICATION).is_none());
    }
}
