//! Filesystem utilities.
//!
//! Thin wrappers over `std::fs` that attach the offending path to every
//! error.

use std::fs;
use std::path::Path;

use crate::core::errors::LinkError;

/// Read a file to string.
pub fn read_to_string(path: &Path) -> Result<String, LinkError> {
    fs::read_to_string(path).map_err(|e| LinkError::io(path, e))
}

/// Write a string to a file, replacing its contents.
///
/// Parent directories are not created; a missing parent is an error.
pub fn write_string(path: &Path, contents: &str) -> Result<(), LinkError> {
    fs::write(path, contents).map_err(|e| LinkError::io(path, e))
}

/// List the names of the immediate entries of a directory, sorted.
///
/// Names that are not valid UTF-8 are skipped with a warning.
pub fn list_dir_names(dir: &Path) -> Result<Vec<String>, LinkError> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| LinkError::io(dir, e))? {
        let entry = entry.map_err(|e| LinkError::io(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!("skipping non UTF-8 entry {:?} in {}", raw, dir.display());
            }
        }
    }

    names.sort();
    Ok(names)
}
