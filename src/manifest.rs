//! Project manifest (`package.json`) and its bundler section.
//!
//! Bundling is configured under a namespaced object in the manifest:
//!
//! ```json
//! {
//!   "name": "hello",
//!   "aws_sam": {
//!     "bundler": "esbuild",
//!     "entry_points": ["app.ts"],
//!     "minify": false,
//!     "target": "es2020"
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{NodeBundleError, Result};
use crate::osutils::OsUtils;

/// Manifest key holding the bundler section.
pub const BUNDLER_NAMESPACE: &str = "aws_sam";

const BUNDLER_KEY: &str = "bundler";
const ENTRY_POINTS_KEY: &str = "entry_points";
const MINIFY_KEY: &str = "minify";
const SOURCEMAP_KEY: &str = "sourcemap";
const TARGET_KEY: &str = "target";

/// Default esbuild language target.
pub const DEFAULT_TARGET: &str = "es2020";

/// Bundlers a manifest can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundler {
    Esbuild,
}

impl Bundler {
    /// Parse the value of the manifest's `bundler` key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "esbuild" => Some(Self::Esbuild),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Esbuild => "esbuild",
        }
    }
}

/// Parsed manifest, read once per workflow.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl Manifest {
    /// Load and parse the manifest at `path`.
    pub fn load(osutils: &dyn OsUtils, path: &Path) -> Result<Self> {
        if !osutils.file_exists(path) {
            return Err(NodeBundleError::ManifestParse {
                path: path.to_path_buf(),
                message: "manifest not found".to_string(),
            });
        }

        match osutils.parse_json(path)? {
            Value::Object(document) => Ok(Self {
                path: path.to_path_buf(),
                document,
            }),
            _ => Err(NodeBundleError::ManifestParse {
                path: path.to_path_buf(),
                message: "expected a JSON object at the top level".to_string(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bundler requested by the manifest, if any.
    ///
    /// Unknown bundler names are treated as no request.
    pub fn bundler(&self) -> Option<Bundler> {
        self.document
            .get(BUNDLER_NAMESPACE)
            .and_then(|section| section.get(BUNDLER_KEY))
            .and_then(Value::as_str)
            .and_then(Bundler::from_name)
    }

    /// The bundler section (empty if absent).
    pub fn bundler_config(&self) -> BundlerConfig {
        let section = self
            .document
            .get(BUNDLER_NAMESPACE)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        BundlerConfig::new(section)
    }
}

/// Bundler options taken from the manifest.
///
/// Values are validated lazily when the bundling action runs, so a bad
/// section does not prevent constructing (or planning) the workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundlerConfig {
    section: Map<String, Value>,
}

impl BundlerConfig {
    pub fn new(section: Map<String, Value>) -> Self {
        Self { section }
    }

    /// Entry points relative to the project root. Must be a non-empty list
    /// of strings.
    pub fn entry_points(&self) -> Result<Vec<String>> {
        let value = self
            .section
            .get(ENTRY_POINTS_KEY)
            .ok_or_else(|| NodeBundleError::BundleFailed {
                message: format!("{} not set ({:?})", ENTRY_POINTS_KEY, self.section),
            })?;

        let list = value.as_array().ok_or_else(|| NodeBundleError::BundleFailed {
            message: format!("{} must be a list ({})", ENTRY_POINTS_KEY, value),
        })?;

        if list.is_empty() {
            return Err(NodeBundleError::BundleFailed {
                message: format!("{} must not be empty", ENTRY_POINTS_KEY),
            });
        }

        list.iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| NodeBundleError::BundleFailed {
                        message: format!("{} must contain strings ({})", ENTRY_POINTS_KEY, entry),
                    })
            })
            .collect()
    }

    /// Whether to minify output (default true).
    pub fn minify(&self) -> Result<bool> {
        self.bool_option(MINIFY_KEY, true)
    }

    /// Whether to emit source maps (default true).
    pub fn sourcemap(&self) -> Result<bool> {
        self.bool_option(SOURCEMAP_KEY, true)
    }

    /// esbuild language target (default `es2020`).
    pub fn target(&self) -> Result<String> {
        match self.section.get(TARGET_KEY) {
            None => Ok(DEFAULT_TARGET.to_string()),
            Some(Value::String(target)) => Ok(target.clone()),
            Some(other) => Err(NodeBundleError::BundleFailed {
                message: format!("{} must be a string ({})", TARGET_KEY, other),
            }),
        }
    }

    fn bool_option(&self, key: &str, default: bool) -> Result<bool> {
        match self.section.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(NodeBundleError::BundleFailed {
                message: format!("{} must be true or false ({})", key, other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osutils::MockOsUtils;
    use serde_json::json;

    fn config(value: Value) -> BundlerConfig {
        match value {
            Value::Object(map) => BundlerConfig::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn load_requires_existing_manifest() {
        let os = MockOsUtils::new();
        let err = Manifest::load(&os, Path::new("manifest")).unwrap_err();
        assert!(matches!(err, NodeBundleError::ManifestParse { .. }));
        assert!(os.parse_json_calls().is_empty());
    }

    #[test]
    fn load_rejects_non_object_documents() {
        let os = MockOsUtils::new().with_json("manifest", json!(["not", "an", "object"]));
        let err = Manifest::load(&os, Path::new("manifest")).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn bundler_read_from_namespace() {
        let os = MockOsUtils::new()
            .with_json("manifest", json!({"aws_sam": {"bundler": "esbuild"}}));
        let manifest = Manifest::load(&os, Path::new("manifest")).unwrap();
        assert_eq!(manifest.bundler(), Some(Bundler::Esbuild));
    }

    #[test]
    fn unknown_or_missing_bundler_is_none() {
        let os = MockOsUtils::new()
            .with_json("a", json!({"aws_sam": {"bundler": "webpack"}}))
            .with_json("b", json!({"name": "app"}))
            .with_json("c", json!({"aws_sam": "esbuild"}));

        for path in ["a", "b", "c"] {
            let manifest = Manifest::load(&os, Path::new(path)).unwrap();
            assert_eq!(manifest.bundler(), None, "manifest {path}");
        }
    }

    #[test]
    fn bundler_config_defaults() {
        let cfg = config(json!({"bundler": "esbuild", "entry_points": ["app.js"]}));
        assert_eq!(cfg.entry_points().unwrap(), vec!["app.js".to_string()]);
        assert!(cfg.minify().unwrap());
        assert!(cfg.sourcemap().unwrap());
        assert_eq!(cfg.target().unwrap(), "es2020");
    }

    #[test]
    fn bundler_config_overrides() {
        let cfg = config(json!({
            "entry_points": ["a.ts", "b.ts"],
            "minify": false,
            "sourcemap": false,
            "target": "node18"
        }));
        assert_eq!(cfg.entry_points().unwrap().len(), 2);
        assert!(!cfg.minify().unwrap());
        assert!(!cfg.sourcemap().unwrap());
        assert_eq!(cfg.target().unwrap(), "node18");
    }

    #[test]
    fn entry_points_validation() {
        assert!(config(json!({})).entry_points().is_err());
        assert!(config(json!({"entry_points": "app.js"})).entry_points().is_err());
        assert!(config(json!({"entry_points": []})).entry_points().is_err());
        assert!(config(json!({"entry_points": [1]})).entry_points().is_err());
    }

    #[test]
    fn wrong_option_types_are_rejected() {
        let cfg = config(json!({"minify": "yes", "target": 2020}));
        assert!(cfg.minify().is_err());
        assert!(cfg.target().is_err());
    }
}
