use core_catalog::{filter_content, ContentItem, ContentQuery, ContentRepository, CATEGORIES};
use std::sync::Arc;

/// Title search with category chips.
///
/// The catalog is fetched once; typing and chip taps only re-filter it.
pub struct SearchScreen {
    repository: Arc<dyn ContentRepository>,
    catalog: Option<Vec<ContentItem>>,
    query: ContentQuery,
}

impl SearchScreen {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            repository,
            catalog: None,
            query: ContentQuery::new(),
        }
    }

    /// Fetch the catalog if it has not been fetched yet.
    pub async fn load(&mut self) {
        if self.catalog.is_none() {
            self.catalog = Some(self.repository.list_all().await);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_none()
    }

    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    pub fn query(&self) -> &ContentQuery {
        &self.query
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Chip tap: selects `category`, or clears it when it is already selected.
    pub fn toggle_category(&mut self, category: &str) {
        if self.query.category.as_deref() == Some(category) {
            self.query.category = None;
        } else {
            self.query.category = Some(category.to_string());
        }
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.query.category.as_deref()
    }

    /// Catalog items matching the current text and category.
    pub fn results(&self) -> Vec<ContentItem> {
        self.catalog
            .as_deref()
            .map(|items| filter_content(items, &self.query))
            .unwrap_or_default()
    }
}
