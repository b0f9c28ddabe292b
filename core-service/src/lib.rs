//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges from a [`CoreConfig`] and an
//! [`AuthProvider`] into the shared core: one event bus, one content
//! repository, one favorites store, one playback coordinator and one auth
//! manager. Screens are created from the service and share those instances,
//! so a favorite toggled on the player screen shows up in the library and a
//! sound started on one screen stops when another starts.
//!
//! Desktop apps typically enable the `desktop-shims` feature so that
//! `CoreConfig` falls back to the reqwest HTTP client and the tokio file
//! system when the host does not provide its own.

pub mod error;
pub mod screens;

pub use error::{CoreError, Result};
pub use screens::{
    AdminUploadScreen, HomeScreen, LibraryScreen, PlayerScreen, PlayerSurface, ProfileScreen,
    SearchScreen,
};

use bridge_traits::PlaybackAdapter;
use core_auth::{AuthManager, AuthProvider, AuthUser};
use core_catalog::{ContentRepository, ContentUploader, FavoritesStore, HttpContentRepository};
use core_playback::PlaybackCoordinator;
use core_runtime::events::{EventBus, Receiver};
use core_runtime::{CoreConfig, CoreEvent};
use std::sync::Arc;
use tracing::info;

/// Aggregated handle to everything the core needs from the host.
pub struct CoreDependencies {
    pub config: CoreConfig,
    pub auth_provider: Arc<dyn AuthProvider>,
    /// Replaces the HTTP repository built from `config`.
    pub repository: Option<Arc<dyn ContentRepository>>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from a validated configuration and the
    /// host's authentication provider.
    pub fn new(config: CoreConfig, auth_provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            config,
            auth_provider,
            repository: None,
        }
    }

    /// Use `repository` instead of talking to `config.api_base_url`.
    pub fn with_repository(mut self, repository: Arc<dyn ContentRepository>) -> Self {
        self.repository = Some(repository);
        self
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    events: EventBus,
    repository: Arc<dyn ContentRepository>,
    favorites: Arc<FavoritesStore>,
    coordinator: Arc<PlaybackCoordinator>,
    auth: Arc<AuthManager>,
    uploader: Arc<ContentUploader>,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies) -> Self {
        let CoreDependencies {
            config,
            auth_provider,
            repository,
        } = deps;

        let events = EventBus::new(config.event_buffer_size);

        let repository = repository.unwrap_or_else(|| {
            Arc::new(HttpContentRepository::from_config(&config).with_event_bus(events.clone()))
        });
        let favorites = Arc::new(FavoritesStore::new().with_event_bus(events.clone()));
        let coordinator = Arc::new(
            PlaybackCoordinator::new(Arc::clone(&config.playback_adapter))
                .with_event_bus(events.clone()),
        );
        let auth = Arc::new(AuthManager::new(auth_provider, events.clone()));
        let uploader = Arc::new(
            ContentUploader::new(Arc::clone(&repository), Arc::clone(&config.clock))
                .with_event_bus(events.clone()),
        );

        info!(api = %config.api_base_url, "Core service initialized");

        Self {
            config: Arc::new(config),
            events,
            repository,
            favorites,
            coordinator,
            auth,
            uploader,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    pub fn repository(&self) -> Arc<dyn ContentRepository> {
        Arc::clone(&self.repository)
    }

    pub fn favorites(&self) -> Arc<FavoritesStore> {
        Arc::clone(&self.favorites)
    }

    pub fn coordinator(&self) -> Arc<PlaybackCoordinator> {
        Arc::clone(&self.coordinator)
    }

    pub fn auth(&self) -> Arc<AuthManager> {
        Arc::clone(&self.auth)
    }

    pub fn uploader(&self) -> Arc<ContentUploader> {
        Arc::clone(&self.uploader)
    }

    /// Adopt a session the auth provider kept from a previous run.
    pub async fn restore_session(&self) -> Option<AuthUser> {
        self.auth.restore_session().await
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(self.repository())
    }

    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(self.repository())
    }

    pub fn library_screen(&self) -> LibraryScreen {
        LibraryScreen::new(self.repository(), self.favorites())
    }

    pub fn profile_screen(&self) -> ProfileScreen {
        ProfileScreen::new(self.auth(), self.coordinator())
    }

    pub fn admin_upload_screen(&self) -> AdminUploadScreen {
        AdminUploadScreen::new(self.uploader())
    }

    /// Navigation boundary for the player route: resolve `id` and build the
    /// matching surface. Audio surfaces come back with their media loaded
    /// and paused.
    pub async fn open_player(&self, id: &str) -> PlayerScreen {
        PlayerScreen::open(
            id,
            self.repository.as_ref(),
            self.favorites(),
            self.coordinator(),
        )
        .await
    }

    /// Release any loaded media. Call when the host app is torn down.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
        info!("Core service shut down");
    }
}

/// Build a service from `BIENESTAR_API_URL` and friends.
///
/// The media engine and the authentication provider always come from the
/// host.
pub fn bootstrap_from_env(
    playback_adapter: Arc<dyn PlaybackAdapter>,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<CoreService> {
    let config = CoreConfig::from_env()?
        .playback_adapter(playback_adapter)
        .build()?;
    Ok(CoreService::new(CoreDependencies::new(config, auth_provider)))
}
