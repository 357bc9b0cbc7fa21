//! JSON export

use crate::GleanError;
use serde::Serialize;
use std::path::Path;

/// Serializes `value` as pretty-printed JSON
///
/// When `path` is given the JSON is also written there, replacing any
/// existing file.
pub fn to_json<T>(value: &T, path: Option<&Path>) -> Result<String, GleanError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;

    if let Some(path) = path {
        std::fs::write(path, &json)?;
        tracing::info!("Wrote JSON output to {}", path.display());
    }

    Ok(json)
}
