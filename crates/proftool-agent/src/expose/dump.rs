//! Text and JSON dumps of the published statistics.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde::Serialize;

use proftool_core::error::{ProfError, Result};

use super::dispatcher::AttributeDispatcher;

/// Render `description: value` lines, one per attribute, ordered by name.
pub fn render_text(title: &str, dispatcher: &AttributeDispatcher) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}:");
    for attr in dispatcher.attributes() {
        if let Ok(v) = dispatcher.get(&attr.name) {
            let _ = writeln!(out, "{}: {}", attr.description, v);
        }
    }
    out
}

/// Name -> value map of every listed attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub object: String,
    pub values: BTreeMap<String, i64>,
}

impl Snapshot {
    pub fn capture(object: &str, dispatcher: &AttributeDispatcher) -> Self {
        Self {
            object: object.to_string(),
            values: dispatcher.snapshot(),
        }
    }
}

/// Write `snapshot` as JSON, replacing `path` atomically so readers never see
/// a partial file.
pub fn write_json_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| ProfError::Io(format!("encode snapshot failed: {e}")))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| ProfError::Io(format!("write {} failed: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| ProfError::Io(format!("rename to {} failed: {e}", path.display())))?;
    Ok(())
}
