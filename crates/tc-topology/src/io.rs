//! Topology document load/save.

use std::path::Path;

use crate::error::{TopologyError, TopologyResult};
use crate::model::Topology;
use crate::validate::validate_topology;

/// Parse and validate a topology document.
pub fn from_json_str(content: &str) -> TopologyResult<Topology> {
    let topology: Topology = serde_json::from_str(content)?;
    validate_topology(&topology)?;
    Ok(topology)
}

/// Serialize a topology document (pretty-printed).
pub fn to_json_string(topology: &Topology) -> TopologyResult<String> {
    Ok(serde_json::to_string_pretty(topology)?)
}

pub fn load_json(path: &Path) -> TopologyResult<Topology> {
    let content = std::fs::read_to_string(path).map_err(|e| TopologyError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let topology = from_json_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        networks = topology.networks().len(),
        "loaded topology"
    );
    Ok(topology)
}

pub fn save_json(path: &Path, topology: &Topology) -> TopologyResult<()> {
    validate_topology(topology)?;
    let content = to_json_string(topology)?;
    std::fs::write(path, content).map_err(|e| TopologyError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
