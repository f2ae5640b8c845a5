//! Gradle Kotlin DSL rendering
//!
//! Turns a resolved profile into the `plugins`, `android` and `dependencies`
//! blocks of an app-level `build.gradle.kts`.

use crate::profile::BuildProfile;
use crate::signing::{BuildType, SigningConfig, SigningIdentities};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Gradle task that assembles an APK for the build type
#[must_use]
pub fn assemble_task(build_type: &BuildType) -> String {
    format!("assemble{}", build_type.capitalized())
}

/// Gradle task that builds an app bundle (AAB) for the build type
#[must_use]
pub fn bundle_task(build_type: &BuildType) -> String {
    format!("bundle{}", build_type.capitalized())
}

/// Escape a value for a Kotlin `"..."` literal, so `$` is never a template
#[must_use]
pub fn kotlin_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// The `plugins { }` block
#[must_use]
pub fn render_plugins_block(profile: &BuildProfile) -> String {
    let mut out = String::from("plugins {\n");
    for plugin in profile.plugins() {
        let _ = writeln!(out, "{INDENT}id({})", kotlin_string(plugin));
    }
    out.push_str("}\n");
    out
}

/// The `android { }` block
#[must_use]
pub fn render_android_block(profile: &BuildProfile, identities: &SigningIdentities) -> String {
    let mut out = String::from("android {\n");
    let _ = writeln!(out, "{INDENT}namespace = {}", kotlin_string(profile.namespace()));
    let _ = writeln!(out, "{INDENT}compileSdk = {}", profile.compile_sdk());
    if let Some(ndk) = profile.ndk_version() {
        let _ = writeln!(out, "{INDENT}ndkVersion = {}", kotlin_string(ndk));
    }

    out.push('\n');
    let _ = writeln!(out, "{INDENT}compileOptions {{");
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}sourceCompatibility = JavaVersion.{}",
        profile.source_compatibility()
    );
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}targetCompatibility = JavaVersion.{}",
        profile.target_compatibility()
    );
    if profile.desugaring_enabled() {
        let _ = writeln!(out, "{INDENT}{INDENT}isCoreLibraryDesugaringEnabled = true");
    }
    let _ = writeln!(out, "{INDENT}}}");

    out.push('\n');
    let _ = writeln!(out, "{INDENT}kotlinOptions {{");
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}jvmTarget = {}",
        kotlin_string(&profile.jvm_target().jvm_target())
    );
    let _ = writeln!(out, "{INDENT}}}");

    out.push('\n');
    let _ = writeln!(out, "{INDENT}defaultConfig {{");
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}applicationId = {}",
        kotlin_string(profile.application_id())
    );
    let _ = writeln!(out, "{INDENT}{INDENT}minSdk = {}", profile.min_sdk());
    let _ = writeln!(out, "{INDENT}{INDENT}targetSdk = {}", profile.target_sdk());
    let _ = writeln!(out, "{INDENT}{INDENT}versionCode = {}", profile.version_code());
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}versionName = {}",
        kotlin_string(profile.version_name())
    );
    if profile.multi_dex_enabled() {
        let _ = writeln!(out, "{INDENT}{INDENT}multiDexEnabled = true");
    }
    if let Some(runner) = profile.test_instrumentation_runner() {
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}testInstrumentationRunner = {}",
            kotlin_string(runner)
        );
    }
    let _ = writeln!(out, "{INDENT}}}");

    if let SigningConfig::Release(name) = profile.signing_config() {
        out.push('\n');
        out.push_str(&render_signing_configs(name, identities));
    }

    out.push('\n');
    out.push_str(&render_build_type(profile));
    out.push_str("}\n");
    out
}

fn render_signing_configs(name: &str, identities: &SigningIdentities) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{INDENT}signingConfigs {{");
    let _ = writeln!(out, "{INDENT}{INDENT}create({}) {{", kotlin_string(name));
    if let Some(identity) = identities.get(name) {
        if let Some(store_file) = &identity.store_file {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}{INDENT}storeFile = file({})",
                kotlin_string(store_file)
            );
        }
        if let Some(key_alias) = &identity.key_alias {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}{INDENT}keyAlias = {}",
                kotlin_string(key_alias)
            );
        }
    }
    let _ = writeln!(out, "{INDENT}{INDENT}}}");
    let _ = writeln!(out, "{INDENT}}}");
    out
}

fn render_build_type(profile: &BuildProfile) -> String {
    let build_type = profile.build_type();
    let accessor = if build_type.is_builtin() {
        "getByName"
    } else {
        "create"
    };

    let mut out = String::new();
    let _ = writeln!(out, "{INDENT}buildTypes {{");
    let _ = writeln!(out, "{INDENT}{INDENT}{accessor}({}) {{", kotlin_string(build_type.name()));
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}{INDENT}signingConfig = signingConfigs.getByName({})",
        kotlin_string(profile.signing_config().name())
    );
    let _ = writeln!(out, "{INDENT}{INDENT}}}");
    let _ = writeln!(out, "{INDENT}}}");
    out
}

/// The `dependencies { }` block
#[must_use]
pub fn render_dependencies_block(profile: &BuildProfile) -> String {
    let mut out = String::from("dependencies {\n");
    for dependency in profile.dependencies() {
        let _ = writeln!(
            out,
            "{INDENT}{}({})",
            dependency.configuration,
            kotlin_string(&dependency.notation())
        );
    }
    out.push_str("}\n");
    out
}

/// A complete app-level `build.gradle.kts`
#[must_use]
pub fn render_kts(profile: &BuildProfile, identities: &SigningIdentities) -> String {
    [
        render_plugins_block(profile),
        render_android_block(profile, identities),
        render_dependencies_block(profile),
    ]
    .join("\n")
}
