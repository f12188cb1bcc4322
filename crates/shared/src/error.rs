use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain rejection reported by the game authority, shown to the player verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ServerError {
    pub error: String,
}

impl ServerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}
