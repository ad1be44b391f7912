//! Configuration file support.
//!
//! Settings are read from `stagelink.toml` in the repository root. Every
//! field is optional; a missing file means all defaults, which match the
//! JupyterLab repository layout:
//!
//! ```toml
//! [paths]
//! manifest = "jupyterlab/staging/package.json"
//! packages_dir = "packages"
//!
//! [link]
//! exclude = ["external"]
//! fallback_version = "~4.6.0-alpha.2"
//! path_prefix = "../../packages/"
//! ```
//!
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::manifest::MANIFEST_FILE_NAME;

/// Name of the configuration file looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "stagelink.toml";

/// Stagelink configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to find the manifests
    pub paths: PathsConfig,

    /// How the staging manifest is rewritten
    pub link: LinkSettings,
}

/// Input locations, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The staging manifest to rewrite
    pub manifest: PathBuf,

    /// Directory holding one subdirectory per local package
    pub packages_dir: PathBuf,

    /// Manifest file name inside each package directory
    pub manifest_file_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            manifest: PathBuf::from("jupyterlab/staging/package.json"),
            packages_dir: PathBuf::from("packages"),
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
        }
    }
}

/// What to do when two package directories declare the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the run
    #[default]
    Error,
    /// Keep the directory that sorts last
    Overwrite,
}

/// Settings for a single link run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Package directory names that are never linked
    pub exclude: Vec<String>,

    /// Version written over dependency entries that pointed at local paths
    pub fallback_version: String,

    /// Prefix joined with a package directory name to form its linked path
    pub path_prefix: String,

    /// Version-specifier prefix that marks a local path dependency
    pub local_marker: String,

    /// Top-level object holding the linking field
    pub namespace: String,

    /// Field under `namespace` that receives the name -> path mapping
    pub field: String,

    /// Handling of duplicate package names
    pub on_duplicate: DuplicatePolicy,
}

impl Default for LinkSettings {
    fn default() -> Self {
        LinkSettings {
            exclude: vec!["external".to_string()],
            fallback_version: "~4.6.0-alpha.2".to_string(),
            path_prefix: "../../packages/".to_string(),
            local_marker: "file:".to_string(),
            namespace: "jupyterlab".to_string(),
            field: "linkedPackages".to_string(),
            on_duplicate: DuplicatePolicy::Error,
        }
    }
}

impl LinkSettings {
    /// Check if a package directory is excluded from linking.
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.iter().any(|e| e == dir_name)
    }

    /// Check if a version specifier points at a local path.
    pub fn is_local_spec(&self, spec: &str) -> bool {
        spec.starts_with(&self.local_marker)
    }

    /// Linked path for a package directory.
    pub fn relative_path(&self, dir_name: &str) -> String {
        if self.path_prefix.is_empty() || self.path_prefix.ends_with('/') {
            format!("{}{}", self.path_prefix, dir_name)
        } else {
            format!("{}/{}", self.path_prefix, dir_name)
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, using defaults when the file does not exist.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Default config path for a repository root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}
