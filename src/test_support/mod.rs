//! Test utilities for stagelink unit tests.
//!
//! Provides on-disk repository fixtures laid out like the default
//! configuration expects: a `packages/` directory with one subdirectory per
//! local package and a staging manifest at `jupyterlab/staging/package.json`.
//!
//! ```rust,ignore
//! use stagelink::test_support::RepoFixture;
//!
//! let repo = RepoFixture::new()
//!     .package("services", "@jupyterlab/services")
//!     .staging(r#"{"jupyterlab": {}}"#)
//!     .build();
//! ```

pub mod fixtures;

pub use fixtures::*;
