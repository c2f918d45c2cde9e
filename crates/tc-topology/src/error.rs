//! Topology-specific error types.

use std::path::PathBuf;

/// Topology construction, validation and I/O errors.
#[derive(thiserror::Error, Debug)]
pub enum TopologyError {
    /// Two networks share the same network-id.
    #[error("Duplicate network: {network}")]
    DuplicateNetwork { network: String },

    /// Two nodes share the same node-id inside one network.
    #[error("Duplicate node {node} in network {network}")]
    DuplicateNode { network: String, node: String },

    /// Two term points share the same tp-id inside one node.
    #[error("Duplicate term point {tp} on node {node} in network {network}")]
    DuplicateTermPoint {
        network: String,
        node: String,
        tp: String,
    },

    /// Two links share the same link-id inside one network.
    #[error("Duplicate link {link} in network {network}")]
    DuplicateLink { network: String, link: String },

    /// A link edge names a node or term point that is not in the network.
    #[error("Link {link} in network {network} refers to non-existent {node}[{tp}]")]
    DanglingLinkEdge {
        network: String,
        link: String,
        node: String,
        tp: String,
    },

    #[error("Failed to read topology file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write topology file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
