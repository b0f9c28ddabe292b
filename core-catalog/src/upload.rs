//! Admin upload flow.
//!
//! A submission validates the form locally, uploads the cover image, uploads
//! the media file for audio/video lessons and finally creates the content
//! record. Nothing is sent until validation passes, and the form is only
//! borrowed so a failed submission can be retried as-is.

use crate::error::{CatalogError, Result};
use crate::filter::CATEGORIES;
use crate::models::{ContentItem, ContentType, NewContent};
use crate::repositories::ContentRepository;
use bridge_traits::Clock;
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Duration label stored on new media lessons.
pub const DEFAULT_MEDIA_DURATION: &str = "5:00";

/// Folder for cover images in blob storage.
pub const IMAGE_PREFIX: &str = "images";

/// State of the admin upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub author: String,
    pub category: String,
    pub content_type: ContentType,
    /// Lesson text, used for text lessons only.
    pub body: String,
    /// Cover image picked from the device.
    pub image_path: Option<PathBuf>,
    /// Audio or video file picked from the device.
    pub media_path: Option<PathBuf>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            category: CATEGORIES[0].to_string(),
            content_type: ContentType::Text,
            body: String::new(),
            image_path: None,
            media_path: None,
        }
    }
}

impl UploadForm {
    /// Check the form before anything is uploaded.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::validation(
                "title",
                "Title, author and cover image are required",
            ));
        }

        if self.author.trim().is_empty() {
            return Err(CatalogError::validation(
                "author",
                "Title, author and cover image are required",
            ));
        }

        if self.image_path.is_none() {
            return Err(CatalogError::validation(
                "image",
                "Title, author and cover image are required",
            ));
        }

        if self.content_type.is_media() && self.media_path.is_none() {
            return Err(CatalogError::validation(
                "media",
                format!("Select the {} file to upload", self.content_type),
            ));
        }

        Ok(())
    }

    /// Blob key for the cover image.
    pub fn image_key(&self, millis: i64) -> String {
        storage_key(IMAGE_PREFIX, millis, &self.title)
    }

    /// Blob key for the media file (`audios/...`, `videos/...`).
    pub fn media_key(&self, millis: i64) -> String {
        storage_key(&self.content_type.storage_prefix(), millis, &self.title)
    }

    fn to_new_content(&self, image_url: String, content_url: Option<String>) -> NewContent {
        let is_media = self.content_type.is_media();
        NewContent {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            content_type: self.content_type,
            image_url,
            duration: is_media.then(|| DEFAULT_MEDIA_DURATION.to_string()),
            content_url: if is_media { content_url } else { None },
            body: (!is_media).then(|| self.body.clone()),
            script: None,
        }
    }
}

/// `{prefix}/{millis}_{title}` with every whitespace character in the title
/// replaced by `_`.
pub fn storage_key(prefix: &str, millis: i64, title: &str) -> String {
    let title: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}/{}_{}", prefix, millis, title)
}

/// Runs admin submissions against a content repository.
pub struct ContentUploader {
    repository: Arc<dyn ContentRepository>,
    clock: Arc<dyn Clock>,
    events: Option<EventBus>,
}

impl ContentUploader {
    pub fn new(repository: Arc<dyn ContentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Validate and submit `form`: image, then media, then the record.
    ///
    /// Upload and write errors are returned unchanged; earlier uploads are
    /// not rolled back.
    #[instrument(skip(self, form), fields(title = %form.title, content_type = %form.content_type))]
    pub async fn submit(&self, form: &UploadForm) -> Result<ContentItem> {
        form.validate()?;

        let result = self.upload_and_create(form).await;

        match &result {
            Ok(item) => info!(content_id = %item.id, "Content submitted"),
            Err(e) => {
                warn!(error = %e, "Content submission failed");
                if let Some(bus) = &self.events {
                    let _ = bus.emit(CoreEvent::Catalog(CatalogEvent::UploadFailed {
                        message: e.to_string(),
                    }));
                }
            }
        }

        result
    }

    async fn upload_and_create(&self, form: &UploadForm) -> Result<ContentItem> {
        let millis = self.clock.unix_timestamp_millis();

        // validate() guarantees both paths for the branches below
        let image_path = form
            .image_path
            .as_deref()
            .ok_or_else(|| CatalogError::validation("image", "Cover image is required"))?;
        let image_url = self
            .repository
            .upload_media(image_path, &form.image_key(millis))
            .await?;

        let content_url = match (&form.media_path, form.content_type.is_media()) {
            (Some(media_path), true) => Some(
                self.repository
                    .upload_media(media_path, &form.media_key(millis))
                    .await?,
            ),
            _ => None,
        };

        self.repository
            .add_content(form.to_new_content(image_url, content_url))
            .await
    }
}
