//! # Content Repository
//!
//! Data-access contract for the lesson catalog.
//!
//! ## Architecture
//!
//! - [`ContentRepository`] is the seam the screens and the upload flow use
//! - [`HttpContentRepository`] talks to the hosted backend through the host's
//!   `HttpClient`
//! - [`InMemoryContentRepository`] keeps an indexed catalog in process for
//!   tests and offline hosts
//!
//! ## Failure policy
//!
//! | Operation        | On failure                          |
//! |------------------|-------------------------------------|
//! | `fetch_all`      | `Err`                               |
//! | `list_all`       | logged at `error`, empty list       |
//! | `get_by_id`      | logged, `None`                      |
//! | `upload_media`   | `Err` (`CatalogError::Upload`)      |
//! | `add_content`    | `Err` (`CatalogError::Write`)       |

use crate::error::Result;
use crate::filter::by_category;
use crate::models::{ContentItem, NewContent};
use async_trait::async_trait;
use std::path::Path;
use tracing::error;

pub mod http;
pub mod memory;

pub use http::HttpContentRepository;
pub use memory::InMemoryContentRepository;

/// Content repository interface for the lesson catalog.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch the whole catalog, newest first.
    ///
    /// Distinguishes an empty catalog (`Ok(vec![])`) from a failed fetch.
    async fn fetch_all(&self) -> Result<Vec<ContentItem>>;

    /// Whole catalog, newest first. Failures yield an empty list.
    async fn list_all(&self) -> Vec<ContentItem> {
        match self.fetch_all().await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Failed to fetch content; showing empty catalog");
                Vec::new()
            }
        }
    }

    /// Look up one item.
    ///
    /// The default scans the full list; implementations with an index
    /// should override it.
    async fn get_by_id(&self, id: &str) -> Option<ContentItem> {
        self.list_all().await.into_iter().find(|item| item.id == id)
    }

    /// Items in `category`, newest first. Failures yield an empty list.
    async fn list_by_category(&self, category: &str) -> Vec<ContentItem> {
        by_category(&self.list_all().await, category)
    }

    /// Upload the file at `local_path` to blob storage under
    /// `destination_key` and return its public URL.
    async fn upload_media(&self, local_path: &Path, destination_key: &str) -> Result<String>;

    /// Persist a new item and return it with its assigned id and timestamp.
    async fn add_content(&self, content: NewContent) -> Result<ContentItem>;
}
