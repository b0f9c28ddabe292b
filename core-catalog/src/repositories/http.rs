//! HTTP implementation of the content repository.
//!
//! Endpoints, relative to the configured API base URL:
//!
//! - `GET  /api/app/content` returns a JSON array of content records
//! - `POST /api/app/content` takes a `NewContent` and returns the created record
//! - `PUT  /api/app/storage/{key}` takes raw file bytes and returns `{"url": ...}`
//!
//! Storage keys carry the lesson title, so each `/`-separated segment is
//! percent-encoded before it goes into the URL.

use crate::error::{CatalogError, Result};
use crate::models::{sort_newest_first, ContentItem, NewContent, RawContentRecord};
use crate::repositories::ContentRepository;
use async_trait::async_trait;
use bridge_traits::{FileSystemAccess, HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
use core_runtime::logging::strip_path;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const CONTENT_PATH: &str = "api/app/content";
const STORAGE_PATH: &str = "api/app/storage";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Outcome of decoding a content list response.
#[derive(Debug, Default)]
pub struct DecodedCatalog {
    pub items: Vec<ContentItem>,
    pub rejected: usize,
}

/// Decode a content list body, skipping malformed records individually.
///
/// Only a body that is not a JSON array at all fails as a whole.
pub fn decode_catalog(body: &[u8]) -> Result<DecodedCatalog> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| CatalogError::Decode(format!("expected a JSON array of records: {}", e)))?;

    let mut decoded = DecodedCatalog::default();

    for (index, value) in values.into_iter().enumerate() {
        let item = serde_json::from_value::<RawContentRecord>(value)
            .map_err(|e| CatalogError::Decode(e.to_string()))
            .and_then(ContentItem::try_from);

        match item {
            Ok(item) => decoded.items.push(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed content record");
                decoded.rejected += 1;
            }
        }
    }

    sort_newest_first(&mut decoded.items);
    Ok(decoded)
}

/// Content repository backed by the hosted content API.
pub struct HttpContentRepository {
    base_url: String,
    http: Arc<dyn HttpClient>,
    fs: Arc<dyn FileSystemAccess>,
    events: Option<EventBus>,
}

impl HttpContentRepository {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        fs: Arc<dyn FileSystemAccess>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            fs,
            events: None,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            Arc::clone(&config.http_client),
            Arc::clone(&config.file_system),
        )
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn storage_url(&self, key: &str) -> String {
        let segments: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.url(STORAGE_PATH), segments.join("/"))
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.emit(CoreEvent::Catalog(event));
        }
    }

    async fn fetch_catalog(&self) -> Result<DecodedCatalog> {
        let response = self
            .http
            .execute(HttpRequest::get(self.url(CONTENT_PATH)))
            .await
            .map_err(|e| CatalogError::Retrieval(e.to_string()))?
            .error_for_status()
            .map_err(|e| CatalogError::Retrieval(e.to_string()))?;

        decode_catalog(&response.body)
    }

    async fn put_blob(&self, local_path: &Path, key: &str) -> Result<String> {
        let upload_error = |message: String| CatalogError::Upload {
            key: key.to_string(),
            message,
        };

        let bytes = self
            .fs
            .read_file(local_path)
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        let mime = mime_guess::from_path(local_path).first_or_octet_stream();
        debug!(
            file = strip_path(&local_path.to_string_lossy()),
            size = bytes.len(),
            mime = %mime,
            "Uploading media"
        );

        let request = HttpRequest::new(HttpMethod::Put, self.storage_url(key))
            .header("Content-Type", mime.essence_str())
            .body(bytes);

        let response = self
            .http
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| upload_error(e.to_string()))?;

        let uploaded: UploadResponse = response
            .json()
            .map_err(|e| upload_error(format!("unexpected storage response: {}", e)))?;

        Ok(uploaded.url)
    }
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<ContentItem>> {
        match self.fetch_catalog().await {
            Ok(decoded) => {
                info!(
                    count = decoded.items.len(),
                    rejected = decoded.rejected,
                    "Fetched content catalog"
                );
                self.emit(CatalogEvent::Loaded {
                    count: decoded.items.len(),
                    rejected: decoded.rejected,
                });
                Ok(decoded.items)
            }
            Err(e) => {
                self.emit(CatalogEvent::LoadFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    #[instrument(skip(self, local_path))]
    async fn upload_media(&self, local_path: &Path, destination_key: &str) -> Result<String> {
        let url = self.put_blob(local_path, destination_key).await?;

        info!(key = destination_key, "Media uploaded");
        self.emit(CatalogEvent::MediaUploaded {
            key: destination_key.to_string(),
            url: url.clone(),
        });

        Ok(url)
    }

    #[instrument(skip(self, content), fields(title = %content.title))]
    async fn add_content(&self, content: NewContent) -> Result<ContentItem> {
        let request = HttpRequest::new(HttpMethod::Post, self.url(CONTENT_PATH))
            .json(&content)
            .map_err(|e| CatalogError::Write(e.to_string()))?;

        let response = self
            .http
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CatalogError::Write(e.to_string()))?;

        let record: RawContentRecord = response
            .json()
            .map_err(|e| CatalogError::Write(format!("unexpected response: {}", e)))?;
        let item = ContentItem::try_from(record.fill_from(&content))
            .map_err(|e| CatalogError::Write(format!("unexpected response: {}", e)))?;

        info!(content_id = %item.id, "Content added");
        self.emit(CatalogEvent::ContentAdded {
            content_id: item.id.clone(),
            title: item.title.clone(),
            content_type: item.content_type.to_string(),
        });

        Ok(item)
    }
}
