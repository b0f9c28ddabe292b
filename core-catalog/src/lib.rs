//! # Content Catalog Module
//!
//! Owns the lesson catalog as seen by the app and everything derived from it.
//!
//! ## Overview
//!
//! This module manages:
//! - The `ContentItem` model and validated decoding of backend records
//! - The `ContentRepository` contract with HTTP and in-memory implementations
//! - The process-scoped favorites set
//! - Title/category filtering for search screens
//! - The admin upload form and its submission sequence
//!
//! Retrieval failures never reach the UI as errors: `list_all` logs them and
//! yields an empty catalog. Writes and uploads propagate their failures so
//! the admin screen can show them.

pub mod error;
pub mod favorites;
pub mod filter;
pub mod models;
pub mod repositories;
pub mod upload;

pub use error::{CatalogError, Result};
pub use favorites::FavoritesStore;
pub use filter::{by_category, filter_content, ContentQuery, CATEGORIES};
pub use models::{ContentItem, ContentType, NewContent, RawContentRecord};
pub use repositories::{ContentRepository, HttpContentRepository, InMemoryContentRepository};
pub use upload::{ContentUploader, UploadForm};
