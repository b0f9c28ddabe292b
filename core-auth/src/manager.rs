//! # Authentication Manager
//!
//! Session tracking on top of a host [`AuthProvider`].
//!
//! ## Overview
//!
//! The `AuthManager` validates sign-in, registration and profile input before
//! anything reaches the provider, keeps the current user, and publishes
//! [`AuthEvent`]s on the application's event bus.
//!
//! Provider failures are returned unchanged so screens can show the
//! provider's message, and are also published as `AuthEvent::AuthError`.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::{AuthManager, InMemoryAuthProvider, LoginForm};
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(InMemoryAuthProvider::new());
//! let manager = AuthManager::new(provider, EventBus::new(100));
//!
//! let user = manager
//!     .sign_in(&LoginForm::new("ana@example.com", "secret1"))
//!     .await?;
//! println!("Welcome {}", user.uid);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::provider::AuthProvider;
use crate::types::{validate_display_name, AuthUser, LoginForm, RegistrationForm};
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use core_runtime::logging::redact_if_sensitive;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

pub struct AuthManager {
    provider: Arc<dyn AuthProvider>,
    event_bus: EventBus,
    current_user: RwLock<Option<AuthUser>>,
}

impl AuthManager {
    pub fn new(provider: Arc<dyn AuthProvider>, event_bus: EventBus) -> Self {
        Self {
            provider,
            event_bus,
            current_user: RwLock::new(None),
        }
    }

    /// Adopt a session the provider kept from a previous run.
    pub async fn restore_session(&self) -> Option<AuthUser> {
        let user = self.provider.current_user()?;
        debug!(uid = %user.uid, "Restored session");
        *self.current_user.write().await = Some(user.clone());
        self.emit(AuthEvent::SignedIn {
            uid: user.uid.clone(),
        });
        Some(user)
    }

    #[instrument(skip(self, form), fields(email = %redact_if_sensitive("email", &form.email)))]
    pub async fn sign_in(&self, form: &LoginForm) -> Result<AuthUser> {
        form.validate()?;

        let user = self
            .provider
            .sign_in(form.email.trim(), &form.password)
            .await
            .map_err(|e| self.provider_failure(e))?;

        info!(uid = %user.uid, "Signed in");
        *self.current_user.write().await = Some(user.clone());
        self.emit(AuthEvent::SignedIn {
            uid: user.uid.clone(),
        });

        Ok(user)
    }

    #[instrument(skip(self, form), fields(email = %redact_if_sensitive("email", &form.email)))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<AuthUser> {
        form.validate()?;

        let user = self
            .provider
            .register(form.name.trim(), form.email.trim(), &form.password)
            .await
            .map_err(|e| self.provider_failure(e))?;

        info!(uid = %user.uid, "Registered account");
        *self.current_user.write().await = Some(user.clone());
        self.emit(AuthEvent::Registered {
            uid: user.uid.clone(),
        });

        Ok(user)
    }

    /// Rename the signed-in user. The name is trimmed and must not be empty.
    #[instrument(skip(self))]
    pub async fn update_display_name(&self, name: &str) -> Result<AuthUser> {
        let name = validate_display_name(name)?;

        if self.current_user.read().await.is_none() {
            return Err(AuthError::NotAuthenticated);
        }

        let user = self
            .provider
            .update_display_name(name)
            .await
            .map_err(|e| self.provider_failure(e))?;

        *self.current_user.write().await = Some(user.clone());
        self.emit(AuthEvent::ProfileUpdated {
            uid: user.uid.clone(),
            display_name: name.to_string(),
        });

        Ok(user)
    }

    /// End the session. The local session is kept if the provider fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        self.provider
            .sign_out()
            .await
            .map_err(|e| self.provider_failure(e))?;

        let previous = self.current_user.write().await.take();
        info!(uid = ?previous.as_ref().map(|u| &u.uid), "Signed out");
        self.emit(AuthEvent::SignedOut {
            uid: previous.map(|u| u.uid),
        });

        Ok(())
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        self.current_user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_user.read().await.is_some()
    }

    fn provider_failure(&self, error: AuthError) -> AuthError {
        warn!(error = %error, "Authentication provider rejected request");
        self.emit(AuthEvent::AuthError {
            message: error.to_string(),
        });
        error
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.event_bus.emit(CoreEvent::Auth(event));
    }
}
