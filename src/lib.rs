//! Stagelink - links local workspace packages into a staging `package.json`
//!
//! A development build points local packages at `file:` paths. Before a
//! staging manifest is built, those entries are reverted to a registry
//! version and the packages are linked through the manifest's
//! `jupyterlab.linkedPackages` field instead.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for Stagelink unit tests.
///
/// Only compiled for tests. Provides on-disk repository fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{errors::LinkError, local_package::LocalPackage, manifest::Manifest};
pub use ops::{link_staging, LinkOptions, LinkReport};
pub use util::config::{Config, DuplicatePolicy, LinkSettings};
