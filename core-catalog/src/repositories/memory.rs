//! In-memory content repository.
//!
//! Keeps the catalog in a vector sorted newest first plus an id index, so
//! `get_by_id` is a hash lookup instead of a scan. Uploads are recorded
//! rather than stored; the returned URL is `memory://{key}`.

use crate::error::{CatalogError, Result};
use crate::models::{sort_newest_first, ContentItem, NewContent};
use crate::repositories::ContentRepository;
use async_trait::async_trait;
use bridge_traits::{Clock, FileSystemAccess, SystemClock};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Catalog {
    items: Vec<ContentItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    fn rebuild(&mut self) {
        sort_newest_first(&mut self.items);
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id.clone(), position))
            .collect();
    }
}

pub struct InMemoryContentRepository {
    catalog: RwLock<Catalog>,
    uploads: RwLock<HashMap<String, usize>>,
    clock: Arc<dyn Clock>,
    fs: Option<Arc<dyn FileSystemAccess>>,
    unavailable: AtomicBool,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Seed the repository. Items are re-sorted newest first.
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        let mut catalog = Catalog {
            items,
            index: HashMap::new(),
        };
        catalog.rebuild();

        Self {
            catalog: RwLock::new(catalog),
            uploads: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
            fs: None,
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Read uploaded files through `fs` so missing files fail like they
    /// would against the real backend.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Simulate the backend being unreachable for every operation.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Keys uploaded so far, with their size in bytes (zero without a file system).
    pub fn uploads(&self) -> HashMap<String, usize> {
        self.uploads.read().clone()
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn fetch_all(&self) -> Result<Vec<ContentItem>> {
        if self.is_unavailable() {
            return Err(CatalogError::Retrieval("content backend unavailable".to_string()));
        }
        Ok(self.catalog.read().items.clone())
    }

    async fn get_by_id(&self, id: &str) -> Option<ContentItem> {
        if self.is_unavailable() {
            return None;
        }
        let catalog = self.catalog.read();
        catalog
            .index
            .get(id)
            .and_then(|&position| catalog.items.get(position))
            .cloned()
    }

    async fn upload_media(&self, local_path: &Path, destination_key: &str) -> Result<String> {
        if self.is_unavailable() {
            return Err(CatalogError::Upload {
                key: destination_key.to_string(),
                message: "storage unavailable".to_string(),
            });
        }

        let size = match &self.fs {
            Some(fs) => fs
                .read_file(local_path)
                .await
                .map_err(|e| CatalogError::Upload {
                    key: destination_key.to_string(),
                    message: e.to_string(),
                })?
                .len(),
            None => 0,
        };

        self.uploads.write().insert(destination_key.to_string(), size);
        debug!(key = destination_key, size, "Recorded in-memory upload");

        Ok(format!("memory://{}", destination_key))
    }

    async fn add_content(&self, content: NewContent) -> Result<ContentItem> {
        if self.is_unavailable() {
            return Err(CatalogError::Write("content backend unavailable".to_string()));
        }

        content.validate().map_err(CatalogError::Write)?;

        let item = content.into_item(Uuid::new_v4().to_string(), Some(self.clock.now()));

        let mut catalog = self.catalog.write();
        catalog.items.push(item.clone());
        catalog.rebuild();

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use bridge_traits::FixedClock;

    fn new_text(title: &str) -> NewContent {
        NewContent {
            title: title.to_string(),
            author: "Ana".to_string(),
            category: "Productividad".to_string(),
            content_type: ContentType::Text,
            image_url: "memory://images/x".to_string(),
            duration: None,
            content_url: None,
            body: Some("cuerpo".to_string()),
            script: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_uses_index() {
        let repo = InMemoryContentRepository::with_items(vec![
            new_text("A").into_item("a".into(), None),
            new_text("B").into_item("b".into(), None),
        ]);

        assert_eq!(repo.get_by_id("b").await.unwrap().title, "B");
        assert!(repo.get_by_id("c").await.is_none());
    }

    #[tokio::test]
    async fn test_add_content_assigns_identity_and_sorts_first() {
        let clock = Arc::new(FixedClock::from_millis(1_700_000_000_000));
        let repo = InMemoryContentRepository::with_items(vec![new_text("Old").into_item(
            "old".into(),
            chrono::DateTime::from_timestamp(1_600_000_000, 0),
        )])
        .with_clock(clock);

        let added = repo.add_content(new_text("Nuevo")).await.unwrap();

        assert!(Uuid::parse_str(&added.id).is_ok());
        assert_eq!(added.created_at.unwrap().timestamp(), 1_700_000_000);

        let all = repo.list_all().await;
        assert_eq!(all[0].id, added.id);
        assert_eq!(repo.get_by_id(&added.id).await, Some(added));
        assert_eq!(repo.get_by_id("old").await.unwrap().title, "Old");
    }

    #[tokio::test]
    async fn test_unavailable_backend() {
        let repo =
            InMemoryContentRepository::with_items(vec![new_text("A").into_item("a".into(), None)]);
        repo.set_unavailable(true);

        assert!(repo.fetch_all().await.is_err());
        assert!(repo.list_all().await.is_empty());
        assert!(repo.get_by_id("a").await.is_none());
        assert!(matches!(
            repo.add_content(new_text("B")).await,
            Err(CatalogError::Write(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let mut other = new_text("Salud");
        other.category = "Salud Mental".to_string();
        let repo = InMemoryContentRepository::with_items(vec![
            new_text("A").into_item("a".into(), None),
            other.into_item("s".into(), None),
        ]);

        let items = repo.list_by_category("Salud Mental").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "s");
    }
}
