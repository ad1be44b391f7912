//! Error types for the staging link pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while linking local packages into a staging manifest.
///
/// Every variant aborts the run. The target manifest is only written after
/// all reads and computations have succeeded, so none of these leave a
/// partially written file behind.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected manifest shape in `{}`: {message}", path.display())]
    Schema { path: PathBuf, message: String },
}

impl LinkError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LinkError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        LinkError::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LinkError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file or directory the error is about.
    pub fn path(&self) -> &Path {
        match self {
            LinkError::Io { path, .. }
            | LinkError::Parse { path, .. }
            | LinkError::Schema { path, .. } => path,
        }
    }

    /// Short name of the error class, as reported in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LinkError::Io { .. } => "io",
            LinkError::Parse { .. } => "parse",
            LinkError::Schema { .. } => "schema",
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LinkError::Io { path, source } => {
                let mut diag = Diagnostic::error(format!("could not access `{}`", path.display()))
                    .with_context(source.to_string());
                if source.kind() == io::ErrorKind::NotFound {
                    diag = diag.with_suggestion(suggestions::CHECK_PATHS);
                }
                diag
            }

            LinkError::Parse { path, source } => {
                Diagnostic::error(format!("`{}` is not valid JSON", path.display()))
                    .with_context(format!("line {}, column {}", source.line(), source.column()))
                    .with_context(source.to_string())
            }

            LinkError::Schema { path, message } => Diagnostic::error(message.clone())
                .with_location(path.clone())
                .with_suggestion(suggestions::SCHEMA),
        }
    }
}
