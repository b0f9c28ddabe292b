use crate::error::Result;
use core_catalog::{ContentItem, ContentType, ContentUploader, UploadForm};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Admin form for publishing a lesson.
///
/// A failed submission keeps every field and records the error message as
/// it should be shown to the admin; a successful one clears the form.
pub struct AdminUploadScreen {
    uploader: Arc<ContentUploader>,
    form: UploadForm,
    last_error: Option<String>,
}

impl AdminUploadScreen {
    pub fn new(uploader: Arc<ContentUploader>) -> Self {
        Self {
            uploader,
            form: UploadForm::default(),
            last_error: None,
        }
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    /// Switching type keeps a previously picked media file; text lessons
    /// simply ignore it.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.form.content_type = content_type;
    }

    pub fn pick_image(&mut self, path: impl Into<PathBuf>) {
        self.form.image_path = Some(path.into());
    }

    pub fn pick_media(&mut self, path: impl Into<PathBuf>) {
        self.form.media_path = Some(path.into());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn submit(&mut self) -> Result<ContentItem> {
        match self.uploader.submit(&self.form).await {
            Ok(item) => {
                debug!(content_id = %item.id, "Upload screen submission accepted");
                self.form = UploadForm::default();
                self.last_error = None;
                Ok(item)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}
