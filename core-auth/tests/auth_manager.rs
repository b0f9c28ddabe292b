//! Auth manager: validation before provider calls, session tracking, events.

use async_trait::async_trait;
use core_auth::{
    AuthError, AuthManager, AuthProvider, AuthUser, InMemoryAuthProvider, LoginForm,
    RegistrationForm, Result,
};
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Provider {}

    #[async_trait]
    impl AuthProvider for Provider {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;
        async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthUser>;
        async fn update_display_name(&self, name: &str) -> Result<AuthUser>;
        async fn sign_out(&self) -> Result<()>;
        fn current_user(&self) -> Option<AuthUser>;
    }
}

fn user(name: &str) -> AuthUser {
    AuthUser {
        uid: "uid-1".to_string(),
        email: Some("ana@example.com".to_string()),
        display_name: Some(name.to_string()),
    }
}

#[tokio::test]
async fn test_invalid_forms_never_reach_provider() {
    let mut provider = MockProvider::new();
    provider.expect_sign_in().never();
    provider.expect_register().never();
    provider.expect_update_display_name().never();

    let manager = AuthManager::new(Arc::new(provider), EventBus::new(8));

    let err = manager.sign_in(&LoginForm::new("ana@example.com", "")).await.unwrap_err();
    assert!(err.is_validation());

    let form = RegistrationForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret2".into(),
    };
    let err = manager.register(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");

    assert!(manager.update_display_name("  ").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_sign_in_trims_email_and_tracks_user() {
    let mut provider = MockProvider::new();
    provider
        .expect_sign_in()
        .withf(|email, password| email == "ana@example.com" && password == "secret1")
        .times(1)
        .returning(|_, _| Ok(user("Ana")));

    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let manager = AuthManager::new(Arc::new(provider), bus);

    let signed_in = manager
        .sign_in(&LoginForm::new("  ana@example.com ", "secret1"))
        .await
        .unwrap();

    assert_eq!(manager.current_user().await, Some(signed_in));
    assert!(manager.is_authenticated().await);
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::SignedIn {
            uid: "uid-1".into()
        })
    );
}

#[tokio::test]
async fn test_provider_error_message_is_kept() {
    let mut provider = MockProvider::new();
    provider
        .expect_sign_in()
        .returning(|_, _| Err(AuthError::Provider("auth/wrong-password".to_string())));

    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let manager = AuthManager::new(Arc::new(provider), bus);

    let err = manager
        .sign_in(&LoginForm::new("ana@example.com", "nope"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "auth/wrong-password");
    assert!(!manager.is_authenticated().await);
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::AuthError {
            message: "auth/wrong-password".into()
        })
    );
}

#[tokio::test]
async fn test_rename_requires_session() {
    let mut provider = MockProvider::new();
    provider.expect_update_display_name().never();

    let manager = AuthManager::new(Arc::new(provider), EventBus::new(8));

    assert!(matches!(
        manager.update_display_name("Ana").await,
        Err(AuthError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_register_rename_and_sign_out() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let manager = AuthManager::new(Arc::new(InMemoryAuthProvider::new()), bus);

    let form = RegistrationForm {
        name: " Ana ".into(),
        email: "ana@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    };
    let registered = manager.register(&form).await.unwrap();
    assert_eq!(registered.display_name.as_deref(), Some("Ana"));

    let renamed = manager.update_display_name("  Ana María ").await.unwrap();
    assert_eq!(renamed.display_name.as_deref(), Some("Ana María"));
    assert_eq!(manager.current_user().await, Some(renamed.clone()));

    manager.sign_out().await.unwrap();
    assert!(manager.current_user().await.is_none());

    let uid = registered.uid;
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::Registered { uid: uid.clone() })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::ProfileUpdated {
            uid: uid.clone(),
            display_name: "Ana María".into()
        })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Auth(AuthEvent::SignedOut { uid: Some(uid) })
    );
}

#[tokio::test]
async fn test_restore_session() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_user()
        .times(1)
        .returning(|| Some(user("Ana")));

    let manager = AuthManager::new(Arc::new(provider), EventBus::new(8));

    assert_eq!(manager.restore_session().await, Some(user("Ana")));
    assert!(manager.is_authenticated().await);
}
