use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to retrieve content: {0}")]
    Retrieval(String),

    #[error("Malformed content record: {0}")]
    Decode(String),

    #[error("Failed to save content: {0}")]
    Write(String),

    #[error("Failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    /// Form validation failure. The message is meant for the end user.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl CatalogError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Whether the failure happened before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
