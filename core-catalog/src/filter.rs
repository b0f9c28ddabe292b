//! Title and category filtering for the search and category screens.
//!
//! Matching is a conjunction: an item is kept only when its title contains
//! the query text (case-insensitive) *and* its category equals the selected
//! category, if one is selected.

use crate::models::ContentItem;
use serde::{Deserialize, Serialize};

/// Categories offered by the app's pickers and category chips.
pub const CATEGORIES: [&str; 4] = [
    "Salud Mental",
    "Productividad",
    "Técnicas de Estudio",
    "Habilidades Sociales",
];

/// Filter options for the content list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Substring to look for in titles. Empty matches everything.
    pub text: String,
    /// Exact category label, or `None` for all categories.
    pub category: Option<String>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category.is_none()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        let title_matches = self.text.is_empty()
            || item
                .title
                .to_lowercase()
                .contains(&self.text.to_lowercase());

        let category_matches = self
            .category
            .as_deref()
            .map_or(true, |category| item.category == category);

        title_matches && category_matches
    }
}

/// Items matching `query`, in input order.
pub fn filter_content(items: &[ContentItem], query: &ContentQuery) -> Vec<ContentItem> {
    if query.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| query.matches(item))
        .cloned()
        .collect()
}

/// Items whose category equals `category` exactly.
pub fn by_category(items: &[ContentItem], category: &str) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| item.category == category)
        .cloned()
        .collect()
}
