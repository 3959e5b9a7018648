//! Build configuration schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::architecture::Architecture;
use crate::error::{NodeBundleError, Result};

/// Contents of `nodebundle.yml`.
///
/// ```yaml
/// architecture: arm64
/// executable_search_paths:
///   - /opt/node/bin
/// experimental_flags:
///   - experimentalEsbuild
/// options:
///   artifact_executable_name: handler
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Target architecture (`x86_64` or `arm64`).
    pub architecture: Option<String>,

    /// Extra directories searched for executables.
    pub executable_search_paths: Vec<PathBuf>,

    /// Experimental features to enable.
    pub experimental_flags: Vec<String>,

    /// Free-form build options.
    pub options: BTreeMap<String, String>,
}

impl BuildConfig {
    /// Apply command-line overrides.
    ///
    /// A set architecture replaces the file's value. Search paths and flags
    /// are appended after the file's entries; options override per key.
    pub fn merge(&mut self, overrides: BuildConfig) {
        if overrides.architecture.is_some() {
            self.architecture = overrides.architecture;
        }
        self.executable_search_paths
            .extend(overrides.executable_search_paths);
        for flag in overrides.experimental_flags {
            if !self.experimental_flags.contains(&flag) {
                self.experimental_flags.push(flag);
            }
        }
        self.options.extend(overrides.options);
    }

    /// Check values that can be checked without touching the project.
    pub fn validate(&self) -> Result<()> {
        if let Some(arch) = &self.architecture {
            arch.parse::<Architecture>()?;
        }

        if self.experimental_flags.iter().any(|f| f.trim().is_empty()) {
            return Err(NodeBundleError::ConfigValidationError {
                message: "experimental_flags must not contain empty names".to_string(),
            });
        }

        if let Some(key) = self.options.keys().find(|k| k.trim().is_empty()) {
            return Err(NodeBundleError::ConfigValidationError {
                message: format!("option key '{}' is empty", key),
            });
        }

        Ok(())
    }
}
