//! `package.json` manifests.
//!
//! A manifest is held as an ordered JSON object so that writing it back
//! keeps the key order it was read with. Only the fields the linker touches
//! are interpreted; everything else is carried through verbatim.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::core::errors::LinkError;
use crate::util::fs;

/// Default manifest file name inside a package directory.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// A loaded `package.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Where the manifest was read from (and is written back to)
    path: PathBuf,

    /// Top-level object
    root: Map<String, Value>,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let content = fs::read_to_string(path)?;
        Manifest::parse(path, &content)
    }

    /// Parse manifest text that was read from `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self, LinkError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| LinkError::parse(path, e))?;

        match value {
            Value::Object(root) => Ok(Manifest {
                path: path.to_path_buf(),
                root,
            }),
            other => Err(LinkError::schema(
                path,
                format!(
                    "top level must be a JSON object, found {}",
                    json_type_name(&other)
                ),
            )),
        }
    }

    /// Path the manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The top-level object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// The declared package name.
    ///
    /// Must be present and a non-empty string.
    pub fn name(&self) -> Result<&str, LinkError> {
        match self.root.get("name") {
            Some(Value::String(name)) if !name.is_empty() => Ok(name.as_str()),
            Some(Value::String(_)) => Err(LinkError::schema(&self.path, "`name` is empty")),
            Some(other) => Err(LinkError::schema(
                &self.path,
                format!("`name` must be a string, found {}", json_type_name(other)),
            )),
            None => Err(LinkError::schema(&self.path, "missing `name` field")),
        }
    }

    /// Mutable access to an optional object-valued field such as
    /// `dependencies` or `resolutions`.
    ///
    /// Returns `None` when the field is absent or `null`.
    pub fn object_field_mut(
        &mut self,
        field: &str,
    ) -> Result<Option<&mut Map<String, Value>>, LinkError> {
        match self.root.get_mut(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(LinkError::schema(
                &self.path,
                format!(
                    "`{}` must be an object, found {}",
                    field,
                    json_type_name(other)
                ),
            )),
        }
    }

    /// Mutable access to a namespace object that must already exist.
    pub fn namespace_mut(&mut self, namespace: &str) -> Result<&mut Map<String, Value>, LinkError> {
        match self.root.get_mut(namespace) {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(LinkError::schema(
                &self.path,
                format!(
                    "`{}` must be an object, found {}",
                    namespace,
                    json_type_name(other)
                ),
            )),
            None => Err(LinkError::schema(
                &self.path,
                format!("missing `{}` object", namespace),
            )),
        }
    }

    /// Serialize as two-space indented JSON with a trailing newline.
    pub fn to_json_string(&self) -> String {
        // `{:#}` on a `Value` is serde_json's two-space pretty printer.
        format!("{:#}\n", Value::Object(self.root.clone()))
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
