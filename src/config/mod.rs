//! Build configuration loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use nodebundle::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("nodebundle.yml"), "architecture: arm64").unwrap();
//!
//! let config = load_config(None, temp.path()).unwrap();
//! assert_eq!(config.architecture.as_deref(), Some("arm64"));
//! ```
//!
//! Values from the command line are merged on top with
//! [`BuildConfig::merge`].

pub mod loader;
pub mod schema;

pub use loader::{discover, load_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use schema::BuildConfig;
