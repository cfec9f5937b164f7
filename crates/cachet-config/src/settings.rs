//! Compiler settings.
//!
//! Everything a compile pass reads from its environment lives in
//! [`CompileSettings`]: the debug flag, the directory roots, and the values
//! for `%NAME%` placeholders. The struct is passed explicitly into
//! [`crate::ConfigCompiler`], so two compiles with equal settings and equal
//! inputs produce equal output and tests stay hermetic.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::{CompileError, Result};

/// `%NAME%` constant placeholders in declared paths.
static CONSTANT_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%([^%\s]+)%").unwrap());

/// Settings for one compile pass.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileSettings {
    /// When true, comments are preserved so diagnostics stay line-accurate.
    #[serde(default)]
    pub debug: bool,

    /// Name of the application configuration directory, e.g. `config`.
    /// Logical names for nested includes are formed as
    /// `<config_dir_name>/<sub-path>`.
    pub config_dir_name: String,

    /// Anchor for relative declared-file paths.
    pub root_dir: PathBuf,

    /// Cache directory; the version marker is written here.
    pub cache_dir: PathBuf,

    /// Library root of the running distribution; the version marker is read
    /// from here.
    pub lib_dir: PathBuf,

    /// Values for `%NAME%` placeholders, keyed by lowercase name.
    #[serde(default)]
    pub constants: IndexMap<String, String>,
}

impl CompileSettings {
    /// Load settings from a YAML document.
    ///
    /// `debug` and `constants` may be omitted; the directory fields and
    /// `config_dir_name` are required.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|_| CompileError::MissingSource {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&raw).map_err(|err| CompileError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Look up a constant by name. Lookup is case-insensitive; the map keys
    /// are expected to be lowercase.
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Replace `%NAME%` placeholders with their constant values.
    ///
    /// Unknown placeholders are left verbatim, so a value such as
    /// `%UNDEFINED%/file.php` survives the pass unchanged and fails later at
    /// the existence check with a readable path in the message.
    pub fn resolve_constants(&self, value: &str) -> String {
        CONSTANT_PLACEHOLDER
            .replace_all(value, |caps: &Captures<'_>| {
                match self.constant(&caps[1]) {
                    Some(constant) => constant.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Anchor a relative path to the configured root. Absolute paths pass
    /// through untouched.
    pub fn resolve_path(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_constants(constants: &[(&str, &str)]) -> CompileSettings {
        CompileSettings {
            debug: false,
            config_dir_name: "config".to_string(),
            root_dir: PathBuf::from("/srv/app"),
            cache_dir: PathBuf::from("/srv/app/cache/config"),
            lib_dir: PathBuf::from("/usr/share/cachet"),
            constants: constants
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_resolve_constants_known_placeholder() {
        let settings = settings_with_constants(&[("data_dir", "/var/data")]);
        assert_eq!(
            settings.resolve_constants("%DATA_DIR%/users.php"),
            "/var/data/users.php"
        );
    }

    #[test]
    fn test_resolve_constants_unknown_placeholder_kept() {
        let settings = settings_with_constants(&[]);
        assert_eq!(
            settings.resolve_constants("%UNDEFINED%/users.php"),
            "%UNDEFINED%/users.php"
        );
    }

    #[test]
    fn test_resolve_constants_lookup_is_case_insensitive() {
        let settings = settings_with_constants(&[("env", "prod")]);
        assert_eq!(settings.resolve_constants("conf-%Env%.php"), "conf-prod.php");
    }

    #[test]
    fn test_resolve_path_relative_is_anchored() {
        let settings = settings_with_constants(&[]);
        assert_eq!(
            settings.resolve_path("lib/core.php"),
            PathBuf::from("/srv/app/lib/core.php")
        );
    }

    #[test]
    fn test_resolve_path_absolute_passes_through() {
        let settings = settings_with_constants(&[]);
        assert_eq!(
            settings.resolve_path("/opt/shared/core.php"),
            PathBuf::from("/opt/shared/core.php")
        );
    }

    #[test]
    fn test_from_yaml_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        fs::write(
            &path,
            "config_dir_name: config\nroot_dir: /srv/app\ncache_dir: /srv/app/cache/config\nlib_dir: /usr/share/cachet\n",
        )
        .unwrap();

        let settings = CompileSettings::from_yaml_file(&path).unwrap();
        assert!(!settings.debug);
        assert!(settings.constants.is_empty());
        assert_eq!(settings.config_dir_name, "config");
        assert_eq!(settings.root_dir, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_from_yaml_file_with_constants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        fs::write(
            &path,
            "debug: true\nconfig_dir_name: config\nroot_dir: /srv/app\ncache_dir: /c\nlib_dir: /l\nconstants:\n  data_dir: /var/data\n",
        )
        .unwrap();

        let settings = CompileSettings::from_yaml_file(&path).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.constant("DATA_DIR"), Some("/var/data"));
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompileSettings::from_yaml_file(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, CompileError::MissingSource { .. }));
    }

    #[test]
    fn test_from_yaml_file_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        fs::write(&path, "config_dir_name: [").unwrap();

        let err = CompileSettings::from_yaml_file(&path).unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }));
    }
}
