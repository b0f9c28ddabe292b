use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),
}

impl CoreError {
    /// Message suitable for an alert, without the error-kind prefix.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Auth(e) => e.to_string(),
            CoreError::Catalog(e) => e.to_string(),
            CoreError::Playback(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
