//! Error types for Krisis operations

/// Result type for Krisis operations
pub type Result<T> = std::result::Result<T, KrisisError>;

/// Error types for the Krisis pipeline
///
/// Tool failures are deliberately NOT part of this taxonomy: they are a
/// closed sum type ([`crate::tools::ToolFailure`]) absorbed by the
/// orchestrator. Everything here is fatal to an evaluation run.
#[derive(Debug, thiserror::Error)]
pub enum KrisisError {
    /// Invalid configuration or malformed fixture data
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for KrisisError {
    fn from(s: String) -> Self {
        KrisisError::Other(s)
    }
}

impl From<&str> for KrisisError {
    fn from(s: &str) -> Self {
        KrisisError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for KrisisError {
    fn from(err: anyhow::Error) -> Self {
        KrisisError::Other(err.to_string())
    }
}
