use core_auth::AuthUser;
use core_catalog::{ContentItem, ContentRepository};
use std::sync::Arc;
use tracing::debug;

/// Greeting fallback when the user has neither a display name nor an email.
pub const DEFAULT_GREETING_NAME: &str = "Student";

/// Newest-first lesson feed.
pub struct HomeScreen {
    repository: Arc<dyn ContentRepository>,
    items: Vec<ContentItem>,
    loading: bool,
}

impl HomeScreen {
    /// The screen starts in the loading state until the first [`load`](Self::load).
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            repository,
            items: Vec::new(),
            loading: true,
        }
    }

    /// Fetch the catalog. Also used for pull-to-refresh.
    pub async fn load(&mut self) -> &[ContentItem] {
        self.loading = true;
        self.items = self.repository.list_all().await;
        self.loading = false;
        debug!(count = self.items.len(), "Home feed loaded");
        &self.items
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Header line, e.g. `Hello, Ana`.
    pub fn greeting(user: Option<&AuthUser>) -> String {
        let name = user
            .and_then(AuthUser::greeting_name)
            .unwrap_or(DEFAULT_GREETING_NAME);
        format!("Hello, {}", name)
    }
}
