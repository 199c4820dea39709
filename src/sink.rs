//! Boundary to the external "configure module" operation.

use async_trait::async_trait;
use thiserror::Error;

use crate::form_data::FormData;

/// Human-readable failure reported by the persistence sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Whole-record, idempotent write of a module configuration.
///
/// The full working values are always submitted, unchanged fields included.
#[async_trait]
pub trait ConfigureModule: Send + Sync {
    async fn configure(&self, module: &str, input: &FormData) -> Result<(), SinkError>;
}
