//! Implementation of `stagelink`: linking local packages into the staging
//! manifest.
//!
//! The run is a single pass:
//! 1. Load the staging manifest and every local package manifest
//! 2. Build the name -> relative path mapping
//! 3. Revert `file:` entries in `dependencies` and `resolutions`
//! 4. Replace the linking field with the mapping
//! 5. Write the manifest back (`LinkPlan::write`)
//!
//! Nothing is written until every step before it has succeeded.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::errors::LinkError;
use crate::core::local_package::{self, LocalPackage};
use crate::core::manifest::{Manifest, MANIFEST_FILE_NAME};
use crate::ops::normalize::revert_local_specs;
use crate::util::config::{DuplicatePolicy, LinkSettings};
use crate::util::fs;

/// Manifest fields whose local path entries are reverted.
pub const DEPENDENCIES_FIELD: &str = "dependencies";
pub const RESOLUTIONS_FIELD: &str = "resolutions";

/// Options for a link run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Staging manifest to rewrite
    pub manifest_path: PathBuf,

    /// Directory holding the local packages
    pub packages_dir: PathBuf,

    /// Manifest file name inside each package directory
    pub manifest_file_name: String,

    /// Rewrite settings
    pub settings: LinkSettings,

    /// Compute everything but leave the manifest untouched
    pub dry_run: bool,
}

impl LinkOptions {
    /// Options with default settings for the given locations.
    pub fn new(manifest_path: impl Into<PathBuf>, packages_dir: impl Into<PathBuf>) -> Self {
        LinkOptions {
            manifest_path: manifest_path.into(),
            packages_dir: packages_dir.into(),
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
            settings: LinkSettings::default(),
            dry_run: false,
        }
    }
}

/// Outcome of a link run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// The staging manifest
    pub manifest: PathBuf,

    /// Number of local packages discovered
    pub packages: usize,

    /// Dependencies reverted from local paths
    pub reverted_dependencies: Vec<String>,

    /// Resolutions reverted from local paths
    pub reverted_resolutions: Vec<String>,

    /// Number of entries installed in the linking field
    pub linked: usize,

    /// Whether the rewritten manifest differs from the file on disk
    pub changed: bool,

    /// Whether the manifest was written
    pub written: bool,
}

/// A computed link run whose output has not been written yet.
#[derive(Debug)]
pub struct LinkPlan {
    output: String,
    report: LinkReport,
}

impl LinkPlan {
    /// Report for the run so far. `written` is false.
    pub fn report(&self) -> &LinkReport {
        &self.report
    }

    /// The rewritten manifest text.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Overwrite the staging manifest with the rewritten text.
    pub fn write(mut self) -> Result<LinkReport, LinkError> {
        fs::write_string(&self.report.manifest, &self.output)?;
        self.report.written = true;
        Ok(self.report)
    }
}

/// Link local packages into the staging manifest.
pub fn link_staging(opts: &LinkOptions) -> Result<LinkReport, LinkError> {
    let plan = plan_link(opts)?;

    if opts.dry_run {
        tracing::debug!("dry run, not writing {}", opts.manifest_path.display());
        Ok(plan.report)
    } else {
        plan.write()
    }
}

/// Do every read and computation of a link run without writing anything.
pub fn plan_link(opts: &LinkOptions) -> Result<LinkPlan, LinkError> {
    let original = fs::read_to_string(&opts.manifest_path)?;
    let mut manifest = Manifest::parse(&opts.manifest_path, &original)?;

    let packages =
        local_package::load_all(&opts.packages_dir, &opts.manifest_file_name, &opts.settings)?;
    let linked = build_linked_packages(&packages, &opts.settings)?;

    let reverted_dependencies = revert_field(&mut manifest, DEPENDENCIES_FIELD, &opts.settings)?;
    let reverted_resolutions = revert_field(&mut manifest, RESOLUTIONS_FIELD, &opts.settings)?;

    let linked_count = linked.len();
    install_linked_packages(&mut manifest, linked, &opts.settings)?;

    let output = manifest.to_json_string();
    let changed = output != original;

    Ok(LinkPlan {
        report: LinkReport {
            manifest: opts.manifest_path.clone(),
            packages: packages.len(),
            reverted_dependencies,
            reverted_resolutions,
            linked: linked_count,
            changed,
            written: false,
        },
        output,
    })
}

/// Build the name -> relative path mapping, in discovery order.
pub fn build_linked_packages(
    packages: &[LocalPackage],
    settings: &LinkSettings,
) -> Result<Map<String, Value>, LinkError> {
    let mut linked = Map::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for pkg in packages {
        if let Some(previous) = owners.insert(&pkg.name, pkg.dir_name()) {
            match settings.on_duplicate {
                DuplicatePolicy::Error => {
                    return Err(LinkError::schema(
                        &pkg.dir,
                        format!(
                            "package name `{}` is declared by both `{}` and `{}`",
                            pkg.name,
                            previous,
                            pkg.dir_name()
                        ),
                    ));
                }
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        "package name `{}` declared by `{}` and `{}`; using `{}`",
                        pkg.name,
                        previous,
                        pkg.dir_name(),
                        pkg.dir_name()
                    );
                }
            }
        }

        linked.insert(pkg.name.clone(), Value::String(pkg.relative_path.clone()));
    }

    Ok(linked)
}

/// Set the linking field to exactly `linked`, replacing any prior value.
///
/// The namespace object must already exist.
pub fn install_linked_packages(
    manifest: &mut Manifest,
    linked: Map<String, Value>,
    settings: &LinkSettings,
) -> Result<(), LinkError> {
    let namespace = manifest.namespace_mut(&settings.namespace)?;
    namespace.insert(settings.field.clone(), Value::Object(linked));
    Ok(())
}

fn revert_field(
    manifest: &mut Manifest,
    field: &str,
    settings: &LinkSettings,
) -> Result<Vec<String>, LinkError> {
    Ok(match manifest.object_field_mut(field)? {
        Some(entries) => revert_local_specs(entries, settings),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RepoFixture, STAGING_MANIFEST};
    use serde_json::json;

    fn options(repo: &crate::test_support::Repo) -> LinkOptions {
        LinkOptions::new(repo.manifest_path(), repo.packages_dir())
    }

    #[test]
    fn test_single_package_scenario() {
        let repo = RepoFixture::new()
            .raw_package("pkgA", r#"{"name":"pkgA"}"#)
            .staging(
                r#"{"dependencies":{"pkgA":"file:../../packages/pkgA"},"resolutions":{},"jupyterlab":{"linkedPackages":{}}}"#,
            )
            .build();

        let report = link_staging(&options(&repo)).unwrap();

        assert_eq!(
            repo.manifest_json(),
            json!({
                "dependencies": { "pkgA": "~4.6.0-alpha.2" },
                "resolutions": {},
                "jupyterlab": { "linkedPackages": { "pkgA": "../../packages/pkgA" } }
            })
        );
        assert_eq!(
            repo.read_manifest(),
            "{\n  \"dependencies\": {\n    \"pkgA\": \"~4.6.0-alpha.2\"\n  },\n  \"resolutions\": {},\n  \"jupyterlab\": {\n    \"linkedPackages\": {\n      \"pkgA\": \"../../packages/pkgA\"\n    }\n  }\n}\n"
        );
        assert_eq!(report.packages, 1);
        assert_eq!(report.reverted_dependencies, vec!["pkgA"]);
        assert!(report.reverted_resolutions.is_empty());
        assert_eq!(report.linked, 1);
        assert!(report.changed);
        assert!(report.written);
    }

    #[test]
    fn test_links_every_package_and_reverts_both_fields() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .package("coreutils", "@jupyterlab/coreutils")
            .package("external", "@jupyterlab/external-assets")
            .empty_dir("node_modules")
            .staging(STAGING_MANIFEST)
            .build();

        let report = link_staging(&options(&repo)).unwrap();
        let out = repo.manifest_json();

        assert_eq!(
            out["jupyterlab"]["linkedPackages"],
            json!({
                "@jupyterlab/coreutils": "../../packages/coreutils",
                "@jupyterlab/services": "../../packages/services"
            })
        );
        assert_eq!(out["jupyterlab"]["name"], "JupyterLab");
        assert_eq!(out["dependencies"]["@jupyterlab/services"], "~4.6.0-alpha.2");
        assert_eq!(out["dependencies"]["react"], "^18.2.0");
        assert_eq!(out["resolutions"]["@jupyterlab/services"], "~4.6.0-alpha.2");
        assert_eq!(out["resolutions"]["yjs"], "^13.5.40");

        assert_eq!(report.packages, 2);
        assert_eq!(report.reverted_resolutions, vec!["@jupyterlab/services"]);
        assert_eq!(report.linked, 2);
    }

    #[test]
    fn test_replaces_previous_mapping_wholesale() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(r#"{"jupyterlab":{"linkedPackages":{"stale":"../../packages/stale"}}}"#)
            .build();

        link_staging(&options(&repo)).unwrap();

        assert_eq!(
            repo.manifest_json()["jupyterlab"]["linkedPackages"],
            json!({ "@jupyterlab/services": "../../packages/services" })
        );
    }

    #[test]
    fn test_creates_field_inside_existing_namespace() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(r#"{"name":"staging","jupyterlab":{}}"#)
            .build();

        let report = link_staging(&options(&repo)).unwrap();

        assert_eq!(report.reverted_dependencies, Vec::<String>::new());
        assert_eq!(
            repo.manifest_json()["jupyterlab"]["linkedPackages"]["@jupyterlab/services"],
            "../../packages/services"
        );
    }

    #[test]
    fn test_missing_namespace_fails_without_writing() {
        let content = r#"{"dependencies":{"pkgA":"file:../../packages/pkgA"}}"#;
        let repo = RepoFixture::new()
            .raw_package("pkgA", r#"{"name":"pkgA"}"#)
            .staging(content)
            .build();

        let err = link_staging(&options(&repo)).unwrap_err();

        assert!(matches!(err, LinkError::Schema { .. }));
        assert_eq!(repo.read_manifest(), content);
    }

    #[test]
    fn test_duplicate_name_errors_by_default() {
        let content = r#"{"jupyterlab":{}}"#;
        let repo = RepoFixture::new()
            .package("a", "dup")
            .package("b", "dup")
            .staging(content)
            .build();

        let err = link_staging(&options(&repo)).unwrap_err();

        assert!(matches!(err, LinkError::Schema { .. }));
        assert!(err.to_string().contains("`a` and `b`"));
        assert_eq!(repo.read_manifest(), content);
    }

    #[test]
    fn test_duplicate_name_overwrite_keeps_last() {
        let repo = RepoFixture::new()
            .package("a", "dup")
            .package("b", "dup")
            .staging(r#"{"jupyterlab":{}}"#)
            .build();
        let mut opts = options(&repo);
        opts.settings.on_duplicate = DuplicatePolicy::Overwrite;

        let report = link_staging(&opts).unwrap();

        assert_eq!(report.packages, 2);
        assert_eq!(report.linked, 1);
        assert_eq!(
            repo.manifest_json()["jupyterlab"]["linkedPackages"],
            json!({ "dup": "../../packages/b" })
        );
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(STAGING_MANIFEST)
            .build();
        let mut opts = options(&repo);
        opts.dry_run = true;

        let report = link_staging(&opts).unwrap();

        assert!(report.changed);
        assert!(!report.written);
        assert_eq!(repo.read_manifest(), STAGING_MANIFEST);
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(STAGING_MANIFEST)
            .build();

        link_staging(&options(&repo)).unwrap();
        let first = repo.read_manifest();
        let report = link_staging(&options(&repo)).unwrap();

        assert!(!report.changed);
        assert!(report.reverted_dependencies.is_empty());
        assert_eq!(repo.read_manifest(), first);
    }

    #[test]
    fn test_custom_settings() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .package("vendor", "vendored")
            .staging(r#"{"deps":{},"dependencies":{"x":"link:../x"},"tool":{}}"#)
            .build();
        let mut opts = options(&repo);
        opts.settings = LinkSettings {
            exclude: vec!["vendor".to_string()],
            fallback_version: "^5.0.0".to_string(),
            path_prefix: "../pkgs".to_string(),
            local_marker: "link:".to_string(),
            namespace: "tool".to_string(),
            field: "links".to_string(),
            on_duplicate: DuplicatePolicy::Error,
        };

        link_staging(&opts).unwrap();

        assert_eq!(
            repo.manifest_json(),
            json!({
                "deps": {},
                "dependencies": { "x": "^5.0.0" },
                "tool": { "links": { "@jupyterlab/services": "../pkgs/services" } }
            })
        );
    }

    #[test]
    fn test_write_into_removed_directory_is_io_error() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(STAGING_MANIFEST)
            .build();

        let plan = plan_link(&options(&repo)).unwrap();
        assert!(plan.output().contains("\"@jupyterlab/services\": \"../../packages/services\""));
        std::fs::remove_dir_all(repo.manifest_path().parent().unwrap()).unwrap();

        let err = plan.write().unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
        assert_eq!(err.path(), repo.manifest_path());
        assert!(!repo.manifest_path().exists());
    }

    #[test]
    fn test_plan_does_not_write() {
        let repo = RepoFixture::new()
            .package("services", "@jupyterlab/services")
            .staging(STAGING_MANIFEST)
            .build();

        let plan = plan_link(&options(&repo)).unwrap();

        assert!(!plan.report().written);
        assert!(plan.report().changed);
        assert_eq!(repo.read_manifest(), STAGING_MANIFEST);
    }

    #[test]
    fn test_missing_manifest_is_io_error() {
        let repo = RepoFixture::new().package("services", "@jupyterlab/services").build();

        let err = link_staging(&options(&repo)).unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
    }

    #[test]
    fn test_missing_packages_dir_is_io_error() {
        let repo = RepoFixture::new().staging(r#"{"jupyterlab":{}}"#).build();
        let mut opts = options(&repo);
        opts.packages_dir = repo.root().join("nope");

        let err = link_staging(&opts).unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
    }

    #[test]
    fn test_build_linked_packages_completeness() {
        let settings = LinkSettings::default();
        let packages: Vec<LocalPackage> = ["a", "b", "c"]
            .iter()
            .map(|d| LocalPackage {
                name: format!("@scope/{}", d),
                relative_path: settings.relative_path(d),
                dir: PathBuf::from("packages").join(d),
            })
            .collect();

        let linked = build_linked_packages(&packages, &settings).unwrap();

        assert_eq!(linked.len(), 3);
        for d in ["a", "b", "c"] {
            assert_eq!(
                linked[&format!("@scope/{}", d)],
                Value::String(format!("../../packages/{}", d))
            );
        }
    }
}
