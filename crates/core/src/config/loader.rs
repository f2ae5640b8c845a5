//! Declaration file loading

use super::schema::DeclarationSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Standard declaration file locations, searched in order
pub const CANDIDATE_FILES: &[&str] = &[
    "buildprofile.toml",
    ".buildprofile.toml",
    "android/buildprofile.toml",
];

/// Loaded declaration and where it came from
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    /// Parsed declaration
    pub schema: DeclarationSchema,
    /// File it was read from, `None` for defaults
    pub path: Option<PathBuf>,
}

impl Declaration {
    /// Load a declaration from a file path, or search the standard locations.
    ///
    /// An explicit path must exist. Without one and with no file found in the
    /// standard locations, an empty declaration is returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let declaration_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_declaration_file(Path::new(".")),
        };

        let schema = match declaration_path {
            Some(ref p) => load_declaration_file(p)?,
            None => DeclarationSchema::default(),
        };

        Ok(Self {
            schema,
            path: declaration_path,
        })
    }

    /// Parse a declaration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }
}

/// Find a declaration file in standard locations below `root`
#[must_use]
pub fn find_declaration_file(root: &Path) -> Option<PathBuf> {
    CANDIDATE_FILES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML declaration file
fn load_declaration_file(path: &Path) -> Result<DeclarationSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read declaration file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse declaration file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingValue;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_declaration_default() {
        let declaration = Declaration::default();
        assert!(declaration.path.is_none());
        assert_eq!(declaration.schema.framework.min_sdk_version, 21);
        assert_eq!(declaration.schema.plugins.apply.len(), 3);
    }

    #[test]
    fn test_parse_settings_table() {
        let declaration = Declaration::from_toml_str(
            r#"
            [settings]
            applicationId = "com.example.app"
            minSdk = "flutter.minSdkVersion"
            targetSdk = 34
            desugaringEnabled = true

            [[dependencies]]
            coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
            configuration = "coreLibraryDesugaring"
            "#,
        )
        .unwrap();

        let settings = &declaration.schema.settings;
        assert_eq!(
            settings.get("applicationId"),
            Some(&SettingValue::String("com.example.app".into()))
        );
        assert_eq!(settings.get("targetSdk"), Some(&SettingValue::Integer(34)));
        assert_eq!(settings.get("desugaringEnabled"), Some(&SettingValue::Bool(true)));
        assert_eq!(declaration.schema.dependencies.len(), 1);
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = Declaration::from_toml_str("[settings\nminSdk = 21").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Declaration::load(Some(Path::new("/nonexistent/buildprofile.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[framework]\nmin_sdk_version = 23").unwrap();

        let declaration = Declaration::load(Some(file.path())).unwrap();
        assert_eq!(declaration.schema.framework.min_sdk_version, 23);
        assert_eq!(declaration.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_find_declaration_file_in_android_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("android")).unwrap();
        std::fs::write(dir.path().join("android/buildprofile.toml"), "").unwrap();

        let found = find_declaration_file(dir.path()).unwrap();
        assert!(found.ends_with("android/buildprofile.toml"));
    }
}
