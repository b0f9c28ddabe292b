//! # Authentication Module
//!
//! Email/password sessions backed by a host-provided identity service.
//!
//! ## Overview
//!
//! This module handles:
//! - The `AuthProvider` contract the host implements over its identity SDK
//! - Sign-in, registration and display-name validation, done before the
//!   provider is contacted
//! - Current-user tracking and `AuthEvent` emission through `AuthManager`

pub mod error;
pub mod manager;
pub mod provider;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use provider::{AuthProvider, InMemoryAuthProvider};
pub use types::{validate_display_name, AuthUser, LoginForm, RegistrationForm};
