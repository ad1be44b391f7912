//! Repository fixtures backed by a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::MANIFEST_FILE_NAME;
use crate::util::config::PathsConfig;

/// A staging manifest with one local path dependency and an empty
/// linking field.
pub const STAGING_MANIFEST: &str = r#"{
  "name": "@jupyterlab/application-top",
  "version": "4.6.0-alpha.2",
  "private": true,
  "dependencies": {
    "@jupyterlab/services": "file:../../packages/services",
    "react": "^18.2.0"
  },
  "resolutions": {
    "@jupyterlab/services": "file:../../packages/services",
    "yjs": "^13.5.40"
  },
  "jupyterlab": {
    "name": "JupyterLab",
    "linkedPackages": {}
  }
}
"#;

enum Entry {
    Manifest(String),
    Empty,
}

/// Builder for a repository laid out on disk.
pub struct RepoFixture {
    packages: Vec<(String, Entry)>,
    staging: Option<String>,
}

impl RepoFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        RepoFixture {
            packages: Vec::new(),
            staging: None,
        }
    }

    /// Add a package directory whose manifest declares `name`.
    pub fn package(self, dir: &str, name: &str) -> Self {
        let manifest = format!(
            "{{\n  \"name\": \"{}\",\n  \"version\": \"4.6.0-alpha.2\"\n}}\n",
            name
        );
        self.raw_package(dir, &manifest)
    }

    /// Add a package directory with verbatim manifest content.
    pub fn raw_package(mut self, dir: &str, content: &str) -> Self {
        self.packages
            .push((dir.to_string(), Entry::Manifest(content.to_string())));
        self
    }

    /// Add a directory without a manifest.
    pub fn empty_dir(mut self, dir: &str) -> Self {
        self.packages.push((dir.to_string(), Entry::Empty));
        self
    }

    /// Set the staging manifest content.
    pub fn staging(mut self, content: &str) -> Self {
        self.staging = Some(content.to_string());
        self
    }

    /// Write everything to a fresh temporary directory.
    pub fn build(self) -> Repo {
        let tmp = TempDir::new().unwrap();
        let repo = Repo { tmp };

        fs::create_dir_all(repo.packages_dir()).unwrap();
        for (dir, entry) in self.packages {
            let pkg_dir = repo.packages_dir().join(dir);
            fs::create_dir_all(&pkg_dir).unwrap();
            if let Entry::Manifest(content) = entry {
                fs::write(pkg_dir.join(MANIFEST_FILE_NAME), content).unwrap();
            }
        }

        if let Some(content) = self.staging {
            let path = repo.manifest_path();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        repo
    }
}

impl Default for RepoFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A repository written to disk. Removed on drop.
pub struct Repo {
    tmp: TempDir,
}

impl Repo {
    /// Repository root.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// The local packages directory.
    pub fn packages_dir(&self) -> PathBuf {
        self.root().join(PathsConfig::default().packages_dir)
    }

    /// The staging manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(PathsConfig::default().manifest)
    }

    /// Current staging manifest content.
    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.manifest_path()).unwrap()
    }

    /// Current staging manifest parsed as JSON.
    pub fn manifest_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_manifest()).unwrap()
    }
}
