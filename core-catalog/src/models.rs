//! Domain models for the content catalog
//!
//! Backend records arrive as loosely typed JSON. They are decoded into
//! [`RawContentRecord`] first and only become a [`ContentItem`] through
//! `TryFrom`, so a malformed record is rejected whole instead of leaking
//! half-filled items into the UI.

use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Content Type
// =============================================================================

/// Kind of lesson. Determines which player surface renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Audio,
    Video,
    Text,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Audio, ContentType::Video, ContentType::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Audio => "audio",
            ContentType::Video => "video",
            ContentType::Text => "text",
        }
    }

    /// Audio and video need an uploaded media file; text does not.
    pub fn is_media(&self) -> bool {
        !matches!(self, ContentType::Text)
    }

    /// Blob storage folder for media of this type (`audios`, `videos`, ...).
    pub fn storage_prefix(&self) -> String {
        format!("{}s", self.as_str())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(ContentType::Audio),
            "video" => Ok(ContentType::Video),
            "text" => Ok(ContentType::Text),
            other => Err(CatalogError::Decode(format!(
                "unknown content type '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Content Item
// =============================================================================

/// A lesson in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Free-text label; see [`crate::filter::CATEGORIES`] for the ones the app offers.
    pub category: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub image_url: String,
    /// Display label such as `"5:00"`. Not parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Media items are playable only with a media URL. Text items never are.
    pub fn is_playable(&self) -> bool {
        self.content_type.is_media() && self.content_url.is_some()
    }

    /// Text to render for text lessons: `body`, falling back to `script`.
    pub fn text_payload(&self) -> Option<&str> {
        self.body
            .as_deref()
            .or(self.script.as_deref())
            .filter(|text| !text.trim().is_empty())
    }

    /// Newest-first ordering. Items without a timestamp sort last.
    pub fn newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
        match (&a.created_at, &b.created_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sort a catalog newest first, keeping backend order among equal timestamps.
pub fn sort_newest_first(items: &mut [ContentItem]) {
    items.sort_by(ContentItem::newest_first);
}

// =============================================================================
// Wire Records
// =============================================================================

/// Creation timestamp as the backend may send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// RFC 3339 string.
    Text(String),
    /// Unix epoch milliseconds.
    Millis(i64),
    /// Document-store timestamp object.
    Document {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

impl RawTimestamp {
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, CatalogError> {
        let parsed = match self {
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
            RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            RawTimestamp::Document {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
        };

        parsed.ok_or_else(|| CatalogError::Decode(format!("invalid createdAt {:?}", self)))
    }
}

/// A content record exactly as decoded from the backend, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
}

impl RawContentRecord {
    /// Fill fields the backend left out of a write response from the
    /// submitted content.
    pub fn fill_from(mut self, submitted: &NewContent) -> Self {
        self.title = self.title.or_else(|| Some(submitted.title.clone()));
        self.author = self.author.or_else(|| Some(submitted.author.clone()));
        self.category = self.category.or_else(|| Some(submitted.category.clone()));
        self.content_type = self
            .content_type
            .or_else(|| Some(submitted.content_type.as_str().to_string()));
        self.image_url = self.image_url.or_else(|| Some(submitted.image_url.clone()));
        self.duration = self.duration.or_else(|| submitted.duration.clone());
        self.content_url = self.content_url.or_else(|| submitted.content_url.clone());
        self.body = self.body.or_else(|| submitted.body.clone());
        self.script = self.script.or_else(|| submitted.script.clone());
        self
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, CatalogError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::Decode(format!("missing {}", field))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawContentRecord> for ContentItem {
    type Error = CatalogError;

    fn try_from(raw: RawContentRecord) -> Result<Self, Self::Error> {
        let id = required(raw.id, "id")?;
        let content_type = required(raw.content_type, "type")?
            .parse::<ContentType>()
            .map_err(|e| CatalogError::Decode(format!("{} (id {})", e, id)))?;

        let created_at = raw
            .created_at
            .as_ref()
            .map(RawTimestamp::to_datetime)
            .transpose()?;

        Ok(ContentItem {
            title: required(raw.title, "title")?,
            author: required(raw.author, "author")?,
            category: required(raw.category, "category")?,
            image_url: required(raw.image_url, "imageUrl")?,
            content_type,
            duration: optional(raw.duration),
            content_url: optional(raw.content_url),
            body: optional(raw.body),
            script: optional(raw.script),
            created_at,
            id,
        })
    }
}

// =============================================================================
// Write Shape
// =============================================================================

/// Content to create. The backend assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl NewContent {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Content title cannot be empty".to_string());
        }

        if self.author.trim().is_empty() {
            return Err("Content author cannot be empty".to_string());
        }

        if self.image_url.trim().is_empty() {
            return Err("Content image URL cannot be empty".to_string());
        }

        if self.content_type.is_media() && self.content_url.is_none() {
            return Err(format!(
                "{} content requires a media URL",
                self.content_type
            ));
        }

        Ok(())
    }

    /// Materialize the item once the backend has assigned identity.
    pub fn into_item(self, id: String, created_at: Option<DateTime<Utc>>) -> ContentItem {
        ContentItem {
            id,
            title: self.title,
            author: self.author,
            category: self.category,
            content_type: self.content_type,
            image_url: self.image_url,
            duration: self.duration,
            content_url: self.content_url,
            body: self.body,
            script: self.script,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawContentRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_complete_record() {
        let item = ContentItem::try_from(raw(json!({
            "id": "c1",
            "title": "Calma en 5 minutos",
            "author": "Lucía Ramos",
            "type": "audio",
            "category": "Salud Mental",
            "imageUrl": "https://cdn/img.jpg",
            "duration": "5:00",
            "contentUrl": "https://cdn/calma.mp3",
            "createdAt": "2024-03-01T10:00:00Z"
        })))
        .unwrap();

        assert_eq!(item.content_type, ContentType::Audio);
        assert!(item.is_playable());
        assert_eq!(item.duration.as_deref(), Some("5:00"));
        assert_eq!(item.created_at.unwrap().timestamp(), 1_709_287_200);
    }

    #[test]
    fn test_decode_rejects_missing_required() {
        let err = ContentItem::try_from(raw(json!({
            "id": "c1",
            "author": "x",
            "type": "text",
            "category": "Productividad",
            "imageUrl": "https://cdn/img.jpg"
        })))
        .unwrap_err();

        assert!(err.to_string().contains("missing title"));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let err = ContentItem::try_from(raw(json!({
            "id": "c1",
            "title": "t",
            "author": "a",
            "type": "podcast",
            "category": "Productividad",
            "imageUrl": "https://cdn/img.jpg"
        })))
        .unwrap_err();

        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn test_timestamp_variants() {
        let millis = RawTimestamp::Millis(1_700_000_000_000).to_datetime().unwrap();
        let doc: RawTimestamp =
            serde_json::from_value(json!({"_seconds": 1_700_000_000, "_nanoseconds": 0})).unwrap();
        let text = RawTimestamp::Text("2023-11-14T22:13:20Z".to_string());

        assert_eq!(doc.to_datetime().unwrap(), millis);
        assert_eq!(text.to_datetime().unwrap(), millis);
        assert!(RawTimestamp::Text("yesterday".to_string()).to_datetime().is_err());
    }

    #[test]
    fn test_text_payload_falls_back_to_script() {
        let mut item = ContentItem::try_from(raw(json!({
            "id": "t1",
            "title": "Pomodoro",
            "author": "a",
            "type": "text",
            "category": "Productividad",
            "imageUrl": "https://cdn/img.jpg",
            "body": "   ",
            "script": "Trabaja 25 minutos."
        })))
        .unwrap();

        assert!(item.body.is_none());
        assert_eq!(item.text_payload(), Some("Trabaja 25 minutos."));
        assert!(!item.is_playable());

        item.script = None;
        assert_eq!(item.text_payload(), None);
    }

    #[test]
    fn test_newest_first_puts_untimestamped_last() {
        let base = NewContent {
            title: "t".into(),
            author: "a".into(),
            category: "c".into(),
            content_type: ContentType::Text,
            image_url: "i".into(),
            duration: None,
            content_url: None,
            body: None,
            script: None,
        };
        let old = base.clone().into_item("old".into(), DateTime::from_timestamp(100, 0));
        let new = base.clone().into_item("new".into(), DateTime::from_timestamp(200, 0));
        let none = base.into_item("none".into(), None);

        let mut items = vec![none, old, new];
        sort_newest_first(&mut items);

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
    }

    #[test]
    fn test_new_content_validation() {
        let mut content = NewContent {
            title: "Respira".into(),
            author: "Ana".into(),
            category: "Salud Mental".into(),
            content_type: ContentType::Video,
            image_url: "https://cdn/i.jpg".into(),
            duration: Some("5:00".into()),
            content_url: None,
            body: None,
            script: None,
        };
        assert!(content.validate().is_err());

        content.content_url = Some("https://cdn/v.mp4".into());
        assert!(content.validate().is_ok());

        let wire = serde_json::to_value(&content).unwrap();
        assert_eq!(wire["type"], "video");
        assert_eq!(wire["imageUrl"], "https://cdn/i.jpg");
        assert!(wire.get("body").is_none());
    }
}
