//! Format converter error types.

use tc_namespace::NamespaceError;

#[derive(thiserror::Error, Debug)]
pub enum EmitError {
    /// The source network is absent or is not a layer-3 network.
    #[error("Network not found: {name} ({reason})")]
    NetworkNotFound { name: String, reason: String },

    /// Node type outside {segment, node, endpoint}.
    #[error("Unknown node type: {node}, type={node_type}")]
    UnknownNodeType { node: String, node_type: String },

    #[error(transparent)]
    Alias(#[from] NamespaceError),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EmitResult<T> = Result<T, EmitError>;
