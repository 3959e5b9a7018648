//! Configuration file discovery and loading.

use crate::config::schema::BuildConfig;
use crate::error::{NodeBundleError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "nodebundle.yml";

/// Find the project config at `<source_dir>/nodebundle.yml`.
pub fn discover(source_dir: &Path) -> Option<PathBuf> {
    let path = source_dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BuildConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            NodeBundleError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            NodeBundleError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`BuildConfig`].
///
/// An empty document yields the default configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BuildConfig> {
    if content.trim().is_empty() {
        return Ok(BuildConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| NodeBundleError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the build configuration for a project.
///
/// An explicit path must exist. Without one, `nodebundle.yml` in the source
/// directory is used when present, otherwise the defaults apply.
pub fn load_config(explicit: Option<&Path>, source_dir: &Path) -> Result<BuildConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(source_dir),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            let config = load_config_file(&path)?;
            config.validate()?;
            Ok(config)
        }
        None => {
            tracing::debug!("No config file in {}; using defaults", source_dir.display());
            Ok(BuildConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn discovers_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "architecture: arm64\n").unwrap();

        assert!(discover(temp.path()).is_some());
        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.architecture.as_deref(), Some("arm64"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("custom.yml")), temp.path()).unwrap_err();
        assert!(matches!(err, NodeBundleError::ConfigNotFound { .. }));
    }

    #[test]
    fn explicit_path_wins_over_discovery() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "architecture: arm64\n").unwrap();
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "architecture: x86_64\n").unwrap();

        let config = load_config(Some(&custom), temp.path()).unwrap();
        assert_eq!(config.architecture.as_deref(), Some("x86_64"));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "architecture: [unclosed").unwrap();

        let err = load_config(None, temp.path()).unwrap_err();
        match err {
            NodeBundleError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loaded_config_is_validated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "architecture: sparc\n").unwrap();

        let err = load_config(None, temp.path()).unwrap_err();
        assert!(matches!(err, NodeBundleError::UnsupportedArchitecture { .. }));
    }

    #[test]
    fn empty_file_is_default() {
        let config = parse_config("  \n", Path::new("nodebundle.yml")).unwrap();
        assert_eq!(config, BuildConfig::default());
    }
}
