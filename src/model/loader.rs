use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use std::path::Path;
use crate::error::GridError;
use crate::model::Snapshot;

/// Reads a snapshot file. `.json` files are parsed as JSON, anything else as YAML.
pub fn load_snapshot(file_path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snapshot file from {}", file_path.display()))?;

    let is_json = file_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str::<Snapshot>(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<Snapshot>(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        GridError::SnapshotLoad {
            path: file_path.display().to_string(),
            reason,
        }
        .into()
    })
}
