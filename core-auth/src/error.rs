use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Form input rejected before the provider was contacted.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The authentication provider rejected the request. The message is the
    /// provider's own and is shown to the user as-is.
    #[error("{0}")]
    Provider(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
