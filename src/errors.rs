use thiserror::Error;

/// Failures of the host-side collaborators: stores, console config and
/// module lookup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown module `{0}`")]
    UnknownModule(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
