use crate::error::{AuthError, Result};
use core_runtime::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed-in account as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Provider-assigned user id.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthUser {
    /// Name for greetings: display name, else the email's local part.
    pub fn greeting_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
            })
    }
}

/// Sign-in screen input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email and password are both required.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(AuthError::validation(
                "email",
                "Please enter your email and password",
            ));
        }
        if self.password.is_empty() {
            return Err(AuthError::validation(
                "password",
                "Please enter your email and password",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &redact_if_sensitive("password", &self.password))
            .finish()
    }
}

/// Registration screen input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// All fields are required and the confirmation must match.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", self.name.trim()),
            ("email", self.email.trim()),
            ("password", self.password.as_str()),
            ("confirm_password", self.confirm_password.as_str()),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(AuthError::validation(*field, "Please fill in all fields"));
        }

        if self.password != self.confirm_password {
            return Err(AuthError::validation(
                "confirm_password",
                "Passwords do not match",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &redact_if_sensitive("password", &self.password))
            .field(
                "confirm_password",
                &redact_if_sensitive("password", &self.confirm_password),
            )
            .finish()
    }
}

/// Validate a new display name, returning it trimmed.
pub fn validate_display_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::validation(
            "display_name",
            "Display name cannot be empty",
        ));
    }
    Ok(name)
}
