use core_catalog::{ContentItem, ContentRepository, FavoritesStore};
use std::sync::Arc;

/// The user's favorite lessons, in catalog order.
pub struct LibraryScreen {
    repository: Arc<dyn ContentRepository>,
    favorites: Arc<FavoritesStore>,
    items: Vec<ContentItem>,
}

impl LibraryScreen {
    pub fn new(repository: Arc<dyn ContentRepository>, favorites: Arc<FavoritesStore>) -> Self {
        Self {
            repository,
            favorites,
            items: Vec::new(),
        }
    }

    /// Rebuild the list. Skips the fetch entirely when there are no favorites.
    pub async fn load(&mut self) -> &[ContentItem] {
        self.items = if self.favorites.is_empty() {
            Vec::new()
        } else {
            let catalog = self.repository.list_all().await;
            self.favorites.select(&catalog)
        };
        &self.items
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
