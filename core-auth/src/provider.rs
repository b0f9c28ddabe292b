//! Authentication provider contract.
//!
//! The hosted identity service is an external collaborator. Hosts wrap their
//! SDK in an [`AuthProvider`]; the core only validates input, tracks the
//! session and publishes events.

use crate::error::{AuthError, Result};
use crate::types::AuthUser;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Create an account, sign it in and set its display name.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthUser>;

    /// Rename the signed-in user.
    async fn update_display_name(&self, name: &str) -> Result<AuthUser>;

    async fn sign_out(&self) -> Result<()>;

    /// User restored by the provider, if a session survives from a previous run.
    fn current_user(&self) -> Option<AuthUser>;
}

struct Account {
    password: String,
    user: AuthUser,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
}

/// Process-local provider for tests and offline demos. Accounts are keyed by
/// lowercase email.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    state: RwLock<State>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without signing it in.
    pub fn with_account(self, name: &str, email: &str, password: &str) -> Self {
        self.insert_account(name, email, password);
        self
    }

    fn insert_account(&self, name: &str, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            uid: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
            display_name: Some(name.to_string()),
        };
        self.state.write().accounts.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let key = email.to_lowercase();
        let mut state = self.state.write();

        let user = match state.accounts.get(&key) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AuthError::Provider("Invalid email or password".to_string())),
        };

        state.signed_in = Some(key);
        Ok(user)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthUser> {
        let key = email.to_lowercase();
        if self.state.read().accounts.contains_key(&key) {
            return Err(AuthError::Provider("Email already in use".to_string()));
        }
        if password.len() < 6 {
            return Err(AuthError::Provider(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let user = self.insert_account(name, email, password);
        self.state.write().signed_in = Some(key);
        Ok(user)
    }

    async fn update_display_name(&self, name: &str) -> Result<AuthUser> {
        let mut state = self.state.write();
        let key = state.signed_in.clone().ok_or(AuthError::NotAuthenticated)?;
        let account = state
            .accounts
            .get_mut(&key)
            .ok_or(AuthError::NotAuthenticated)?;

        account.user.display_name = Some(name.to_string());
        Ok(account.user.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.state.write().signed_in = None;
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        let state = self.state.read();
        state
            .signed_in
            .as_ref()
            .and_then(|key| state.accounts.get(key))
            .map(|account| account.user.clone())
    }
}
