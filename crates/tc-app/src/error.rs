//! Error types for the tc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives frontends one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Namespace error: {0}")]
    Namespace(#[from] tc_namespace::NamespaceError),

    #[error("Emit error: {0}")]
    Emit(#[from] tc_emit::EmitError),

    #[error("Failed to read {kind} file: {path}")]
    FileRead {
        kind: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {kind} file: {path}")]
    FileWrite {
        kind: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {kind} file {path}: {message}")]
    Parse {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tc-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<tc_topology::TopologyError> for AppError {
    fn from(err: tc_topology::TopologyError) -> Self {
        AppError::Topology(err.to_string())
    }
}
