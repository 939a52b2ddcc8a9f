use anyhow::Context;
use chrono::{DateTime, Utc};
use harbormaster_cloud::NodeSnapshot;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct NodeOutput<'a> {
    droplet: &'a NodeSnapshot,
    written_at: DateTime<Utc>,
}

/// Write the droplet as pretty JSON, replacing any existing file
pub fn write_node(path: &Path, node: &NodeSnapshot) -> anyhow::Result<()> {
    let output = NodeOutput {
        droplet: node,
        written_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&output)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
