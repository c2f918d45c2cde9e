//! Namespace conversion error types.

use tc_topology::TopologyError;

/// Errors raised while building alias tables or rewriting a topology.
///
/// All of them are terminal for one build/rewrite call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// A required network layer is absent or has an unexpected type.
    #[error("Network not found: {name} ({reason})")]
    NetworkNotFound { name: String, reason: String },

    /// Lookup miss in one of the alias tables.
    #[error("Alias not found in {table}: {key}")]
    AliasNotFound { table: &'static str, key: String },

    /// A registration would break injectivity of an alias table.
    #[error("Alias collision in {table}: {original} -> {converted} conflicts with {existing}")]
    AliasCollision {
        table: &'static str,
        original: String,
        converted: String,
        existing: String,
    },

    #[error("Invalid layer pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Topology error: {0}")]
    Topology(String),
}

pub type NamespaceResult<T> = Result<T, NamespaceError>;

impl From<TopologyError> for NamespaceError {
    fn from(err: TopologyError) -> Self {
        NamespaceError::Topology(err.to_string())
    }
}
