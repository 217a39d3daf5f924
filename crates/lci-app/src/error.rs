//! Error types for the lci-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Unsupported project file: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Inventory compilation failed: {0}")]
    Compile(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Flattening failed for '{target}': {message}")]
    Flatten { target: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lci-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lci_project::ProjectError> for AppError {
    fn from(err: lci_project::ProjectError) -> Self {
        match err {
            lci_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<lci_graph::GraphError> for AppError {
    fn from(err: lci_graph::GraphError) -> Self {
        AppError::Graph(err.to_string())
    }
}
