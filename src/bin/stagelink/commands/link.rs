//! `stagelink` command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Cli;
use stagelink::util::config::{config_path, Config};
use stagelink::util::{Shell, Status};
use stagelink::{link_staging, LinkOptions, LinkReport};

pub fn execute(args: &Cli, shell: &Shell) -> Result<()> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(args, &root)?;
    let opts = build_options(args, &root, config);

    tracing::debug!(
        "linking {} into {}",
        opts.packages_dir.display(),
        opts.manifest_path.display()
    );

    let report = link_staging(&opts)?;

    if shell.is_json() {
        let event = serde_json::to_value(&report).context("failed to serialize run report")?;
        shell.json_event(&event);
    } else {
        print_report(shell, &opts, &report);
    }

    Ok(())
}

fn load_config(args: &Cli, root: &Path) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(&config_path(root)),
    }
}

/// Resolve the run options. Paths given on the command line are taken as
/// is; paths from the config file are relative to the root.
fn build_options(args: &Cli, root: &Path, config: Config) -> LinkOptions {
    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| root.join(&config.paths.manifest));
    let packages_dir = args
        .packages_dir
        .clone()
        .unwrap_or_else(|| root.join(&config.paths.packages_dir));

    LinkOptions {
        manifest_path,
        packages_dir,
        manifest_file_name: config.paths.manifest_file_name,
        settings: config.link,
        dry_run: args.dry_run,
    }
}

fn print_report(shell: &Shell, opts: &LinkOptions, report: &LinkReport) {
    let marker = &opts.settings.local_marker;

    shell.status(
        Status::Found,
        format!("{} local {}", report.packages, plural(report.packages, "package")),
    );
    shell.status(
        Status::Reverted,
        format!(
            "{} {} from `{}` paths",
            report.reverted_dependencies.len(),
            plural(report.reverted_dependencies.len(), "dependency"),
            marker
        ),
    );
    shell.status(
        Status::Reverted,
        format!(
            "{} {} from `{}` paths",
            report.reverted_resolutions.len(),
            plural(report.reverted_resolutions.len(), "resolution"),
            marker
        ),
    );
    shell.status(
        Status::Linked,
        format!(
            "{} {} into `{}.{}`",
            report.linked,
            plural(report.linked, "package"),
            opts.settings.namespace,
            opts.settings.field
        ),
    );

    if report.written {
        shell.status(Status::Updated, report.manifest.display());
    } else if report.changed {
        shell.status(
            Status::Skipped,
            format!("{} would change (dry run)", report.manifest.display()),
        );
    } else {
        shell.status(
            Status::Fresh,
            format!("{} is up to date (dry run)", report.manifest.display()),
        );
    }
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.strip_suffix('y')) {
        (1, _) => noun.to_string(),
        (_, Some(stem)) => format!("{}ies", stem),
        (_, None) => format!("{}s", noun),
    }
}
