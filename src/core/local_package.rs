//! Local packages - packages whose source lives in the repository.

use std::path::{Path, PathBuf};

use crate::core::errors::LinkError;
use crate::core::manifest::Manifest;
use crate::util::config::LinkSettings;
use crate::util::fs;

/// A package found under the local packages directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPackage {
    /// Declared package name
    pub name: String,

    /// Path written into the linking field
    pub relative_path: String,

    /// Directory the package was found in
    pub dir: PathBuf,
}

impl LocalPackage {
    /// Load the package in `packages_dir/dir_name`.
    pub fn load(
        packages_dir: &Path,
        dir_name: &str,
        manifest_file_name: &str,
        settings: &LinkSettings,
    ) -> Result<Self, LinkError> {
        let dir = packages_dir.join(dir_name);
        let manifest = Manifest::load(&dir.join(manifest_file_name))?;

        Ok(LocalPackage {
            name: manifest.name()?.to_string(),
            relative_path: settings.relative_path(dir_name),
            dir,
        })
    }

    /// Directory name the package was found in.
    pub fn dir_name(&self) -> &str {
        self.dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Find the subdirectories of `packages_dir` that hold a package.
///
/// A subdirectory qualifies when it contains `manifest_file_name` and its
/// name is not excluded. Names come back sorted.
pub fn discover(
    packages_dir: &Path,
    manifest_file_name: &str,
    settings: &LinkSettings,
) -> Result<Vec<String>, LinkError> {
    let mut found = Vec::new();

    for name in fs::list_dir_names(packages_dir)? {
        if settings.is_excluded(&name) {
            tracing::debug!("skipping excluded directory `{}`", name);
            continue;
        }
        if packages_dir.join(&name).join(manifest_file_name).is_file() {
            found.push(name);
        }
    }

    Ok(found)
}

/// Discover and load every local package.
pub fn load_all(
    packages_dir: &Path,
    manifest_file_name: &str,
    settings: &LinkSettings,
) -> Result<Vec<LocalPackage>, LinkError> {
    discover(packages_dir, manifest_file_name, settings)?
        .iter()
        .map(|dir_name| -> Result<LocalPackage, LinkError> {
            let pkg = LocalPackage::load(packages_dir, dir_name, manifest_file_name, settings)?;
            tracing::debug!("found `{}` in {}", pkg.name, pkg.dir.display());
            Ok(pkg)
        })
        .collect()
}
