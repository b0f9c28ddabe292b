use crate::error::Result;
use core_auth::{AuthManager, AuthUser};
use core_playback::PlaybackCoordinator;
use std::sync::Arc;
use tracing::instrument;

/// Account details, display-name editing and sign-out.
pub struct ProfileScreen {
    auth: Arc<AuthManager>,
    coordinator: Arc<PlaybackCoordinator>,
    editing: bool,
    draft_name: String,
}

impl ProfileScreen {
    pub fn new(auth: Arc<AuthManager>, coordinator: Arc<PlaybackCoordinator>) -> Self {
        Self {
            auth,
            coordinator,
            editing: false,
            draft_name: String::new(),
        }
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        self.auth.current_user().await
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    /// Open the name editor pre-filled with the current display name.
    pub async fn begin_edit(&mut self) {
        self.draft_name = self
            .auth
            .current_user()
            .await
            .and_then(|user| user.display_name)
            .unwrap_or_default();
        self.editing = true;
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    /// Save the draft. The editor stays open when the rename is rejected.
    pub async fn save_name(&mut self) -> Result<AuthUser> {
        let user = self.auth.update_display_name(&self.draft_name).await?;
        self.editing = false;
        self.draft_name = user.display_name.clone().unwrap_or_default();
        Ok(user)
    }

    /// Sign out and stop whatever is playing.
    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) -> Result<()> {
        self.auth.sign_out().await?;
        self.coordinator.stop_current().await;
        self.editing = false;
        self.draft_name.clear();
        Ok(())
    }
}
