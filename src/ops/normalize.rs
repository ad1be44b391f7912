//! Reverting local path version specifiers.
//!
//! A development-mode build rewrites dependency entries for local packages
//! to `file:` paths. The staging manifest must not carry those, so any such
//! entry is put back to the fallback version and the local link is expressed
//! through the linking field instead.

use serde_json::{Map, Value};

use crate::util::config::LinkSettings;

/// Replace every string entry that points at a local path with the
/// fallback version.
///
/// Keys are never added or removed and non-string values are left alone.
/// Returns the names of the rewritten entries, in map order.
pub fn revert_local_specs(entries: &mut Map<String, Value>, settings: &LinkSettings) -> Vec<String> {
    let mut reverted = Vec::new();

    for (name, value) in entries.iter_mut() {
        let is_local = matches!(value, Value::String(spec) if settings.is_local_spec(spec));
        if is_local {
            tracing::debug!("reverting `{}` from {}", name, value);
            *value = Value::String(settings.fallback_version.clone());
            reverted.push(name.clone());
        }
    }

    reverted
}
