//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use stagelink::util::ColorChoice;

/// Stagelink - link local packages into the staging package.json
///
/// Reverts `file:` dependency entries in the staging manifest and records
/// every local package under `jupyterlab.linkedPackages`.
#[derive(Parser, Debug)]
#[command(name = "stagelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for the run report
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Repository root (defaults to the current directory)
    #[arg(long, env = "STAGELINK_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file (defaults to <root>/stagelink.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Staging manifest to rewrite
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory holding the local packages
    #[arg(long)]
    pub packages_dir: Option<PathBuf>,

    /// Report what would change without writing the manifest
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageFormat {
    Human,
    Json,
}
