use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const DECLARATION: &str = r#"
[settings]
namespace = "com.example.student_reminder_app"
applicationId = "com.example.student_reminder_app"
compileSdk = 36
ndkVersion = "27.0.12077973"
minSdk = "flutter.minSdkVersion"
targetSdk = 34
versionCode = 1
versionName = "1.0.0"
sourceCompatibility = "VERSION_11"
targetCompatibility = "VERSION_11"
desugaringEnabled = true
multiDexEnabled = true
buildType = "release"

[features]
google_services = false

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
configuration = "coreLibraryDesugaring"
"#;

fn write_declaration(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buildprofile.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

fn buildprofile(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("buildprofile").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("BUILDPROFILE_FEATURE_GOOGLE_SERVICES")
        .arg("--no-color");
    cmd
}

#[test]
fn resolve_json_reports_signing_fallback() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .args(["resolve", "--format", "json", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"applicationId\": \"com.example.student_reminder_app\"",
        ))
        .stdout(predicate::str::contains("\"minSdk\": 21"))
        .stdout(predicate::str::contains("\"kind\": \"SigningFallback\""));
}

#[test]
fn resolve_finds_declaration_in_working_directory() {
    let (dir, _path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("assembleRelease, bundleRelease"));
}

#[test]
fn resolve_fails_without_desugaring_dependency() {
    let content = DECLARATION.split("[[dependencies]]").next().unwrap();
    let (dir, path) = write_declaration(content);

    buildprofile(&dir)
        .arg("resolve")
        .arg("--config")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("desugaringEnabled"));
}

#[test]
fn deny_debug_signing_fails_release() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .args(["resolve", "--deny-debug-signing", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("signingConfig"));
}

#[test]
fn check_strict_fails_on_warnings() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .args(["check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning"));

    buildprofile(&dir)
        .args(["check", "--strict", "--config"])
        .arg(&path)
        .assert()
        .code(2);
}

#[test]
fn check_debug_build_is_clean() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .args(["check", "--strict", "--build-type", "debug", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 warnings"));
}

#[test]
fn render_writes_gradle_script() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .args(["render", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "signingConfig = signingConfigs.getByName(\"debug\")",
        ))
        .stdout(predicate::str::contains(
            "coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")",
        ));
}

#[test]
fn google_services_enabled_from_environment() {
    let (dir, path) = write_declaration(DECLARATION);

    buildprofile(&dir)
        .env("BUILDPROFILE_FEATURE_GOOGLE_SERVICES", "1")
        .args(["render", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("id(\"com.google.gms.google-services\")"));
}

#[test]
fn missing_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();

    buildprofile(&dir)
        .args(["resolve", "--config", "missing.toml"])
        .assert()
        .code(3);
}

#[test]
fn explain_lists_settings() {
    let dir = tempfile::tempdir().unwrap();

    buildprofile(&dir)
        .arg("explain")
        .assert()
        .success()
        .stdout(predicate::str::contains("applicationId"))
        .stdout(predicate::str::contains("flutter.minSdkVersion"))
        .stdout(predicate::str::contains("21 (defaults minSdk)"))
        .stdout(predicate::str::contains("BUILDPROFILE_FEATURE_GOOGLE_SERVICES"));
}

#[test]
fn explain_reports_declared_framework_values() {
    let (dir, path) =
        write_declaration("[framework]\nmin_sdk_version = 23\nversion_name = \"2.0.0\"\n");

    buildprofile(&dir)
        .args(["explain", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("23 (defaults minSdk)"))
        .stdout(predicate::str::contains("\"2.0.0\" (defaults versionName)"))
        .stdout(predicate::str::contains("21 (defaults minSdk)").not());
}

#[test]
fn explain_with_missing_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();

    buildprofile(&dir)
        .args(["explain", "--config", "missing.toml"])
        .assert()
        .code(3);
}
