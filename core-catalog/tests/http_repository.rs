//! HTTP content repository against scripted backend responses.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, FileMetadata, FileSystemAccess, HttpClient, HttpMethod, HttpRequest, HttpResponse,
};
use bytes::Bytes;
use core_catalog::upload::{storage_key, IMAGE_PREFIX};
use core_catalog::{
    CatalogError, ContentRepository, ContentType, HttpContentRepository, NewContent,
};
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
use mockall::mock;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mock! {
    pub Fs {}

    #[async_trait]
    impl FileSystemAccess for Fs {
        async fn exists(&self, path: &Path) -> BridgeResult<bool>;
        async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata>;
        async fn read_file(&self, path: &Path) -> BridgeResult<Bytes>;
    }
}

/// Replays queued responses and records every request it sees.
#[derive(Default)]
struct ScriptedHttp {
    responses: Mutex<VecDeque<BridgeResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().push_back(Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }));
        self
    }

    fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .push_back(Err(BridgeError::OperationFailed(message.to_string())));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no scripted response".into())))
    }
}

fn repository(http: Arc<ScriptedHttp>, fs: MockFs) -> HttpContentRepository {
    HttpContentRepository::new("https://api.example.test/", http, Arc::new(fs))
}

fn text_content() -> NewContent {
    NewContent {
        title: "Pausa activa".to_string(),
        author: "Marta".to_string(),
        category: "Actividad Física".to_string(),
        content_type: ContentType::Text,
        image_url: "https://cdn.example.test/images/1_Pausa_activa".to_string(),
        duration: None,
        content_url: None,
        body: Some("Levántate y estira".to_string()),
        script: None,
    }
}

#[tokio::test]
async fn test_list_all_is_empty_when_backend_fails() {
    let http = Arc::new(ScriptedHttp::default().fail("connection refused"));
    let repo = repository(Arc::clone(&http), MockFs::new());

    assert!(repo.list_all().await.is_empty());
    assert_eq!(http.requests()[0].url, "https://api.example.test/api/app/content");
}

#[tokio::test]
async fn test_fetch_all_distinguishes_server_error() {
    let http = Arc::new(ScriptedHttp::default().respond(503, "maintenance"));
    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let repo = repository(http, MockFs::new()).with_event_bus(bus);

    let err = repo.fetch_all().await.unwrap_err();
    assert!(matches!(err, CatalogError::Retrieval(_)));
    assert!(matches!(
        rx.recv().await.unwrap(),
        CoreEvent::Catalog(CatalogEvent::LoadFailed { .. })
    ));
}

#[tokio::test]
async fn test_malformed_records_are_skipped_and_sorted() {
    let body = r#"[
        {"id": "old", "title": "Viejo", "author": "a", "type": "audio", "category": "Salud Mental",
         "imageUrl": "i", "contentUrl": "c", "createdAt": {"seconds": 1600000000, "nanoseconds": 0}},
        {"id": "broken", "type": "podcast", "title": "x", "author": "a", "category": "c", "imageUrl": "i"},
        {"id": "new", "title": "Nuevo", "author": "a", "type": "video", "category": "Productividad",
         "imageUrl": "i", "contentUrl": "c", "createdAt": "2023-11-14T22:13:20Z"},
        {"id": "undated", "title": "Sin fecha", "author": "a", "type": "text", "category": "Nutrición",
         "imageUrl": "i", "body": "hola"}
    ]"#;
    let http = Arc::new(ScriptedHttp::default().respond(200, body));
    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let repo = repository(http, MockFs::new()).with_event_bus(bus);

    let items = repo.list_all().await;

    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old", "undated"]);
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Catalog(CatalogEvent::Loaded {
            count: 3,
            rejected: 1
        })
    );
}

#[tokio::test]
async fn test_get_by_id_and_category_use_catalog() {
    let body = r#"[
        {"id": "a", "title": "A", "author": "x", "type": "text", "category": "Productividad", "imageUrl": "i"},
        {"id": "b", "title": "B", "author": "x", "type": "text", "category": "Nutrición", "imageUrl": "i"}
    ]"#;
    let http = Arc::new(
        ScriptedHttp::default()
            .respond(200, body)
            .respond(200, body)
            .fail("offline"),
    );
    let repo = repository(http, MockFs::new());

    assert_eq!(repo.get_by_id("b").await.unwrap().title, "B");
    assert_eq!(repo.list_by_category("Productividad").await.len(), 1);
    assert!(repo.get_by_id("a").await.is_none());
}

#[tokio::test]
async fn test_upload_media_puts_file_bytes() {
    let mut fs = MockFs::new();
    fs.expect_read_file()
        .withf(|path| path == Path::new("/photos/cover.png"))
        .times(1)
        .returning(|_| Ok(Bytes::from_static(b"png-bytes")));

    let http = Arc::new(
        ScriptedHttp::default().respond(200, r#"{"url": "https://cdn.example.test/images/1_A"}"#),
    );
    let repo = repository(Arc::clone(&http), fs);

    let url = repo
        .upload_media(&PathBuf::from("/photos/cover.png"), "images/1_A")
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example.test/images/1_A");
    let request = &http.requests()[0];
    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(request.url, "https://api.example.test/api/app/storage/images/1_A");
    assert_eq!(request.headers.get("Content-Type").map(String::as_str), Some("image/png"));
    assert_eq!(request.body.as_deref(), Some(&b"png-bytes"[..]));
}

#[tokio::test]
async fn test_upload_url_escapes_title_characters() {
    let key = storage_key(IMAGE_PREFIX, 1_700_000_000_000, "¿Qué es la calma? #1 a/b");
    assert_eq!(key, "images/1700000000000_¿Qué_es_la_calma?_#1_a/b");

    let mut fs = MockFs::new();
    fs.expect_read_file().returning(|_| Ok(Bytes::from_static(b"jpg-bytes")));
    let http = Arc::new(ScriptedHttp::default().respond(200, r#"{"url": "https://cdn.test/x"}"#));
    let repo = repository(Arc::clone(&http), fs);

    repo.upload_media(Path::new("/photos/calma.jpg"), &key).await.unwrap();

    let url = http.requests()[0].url.clone();
    assert_eq!(
        url,
        "https://api.example.test/api/app/storage/\
         images/1700000000000_%C2%BFQu%C3%A9_es_la_calma%3F_%231_a/b"
    );
    assert!(!url.contains('?') && !url.contains('#'));

    let path = url.split("api/app/storage/").nth(1).unwrap();
    let decoded: Vec<String> = path
        .split('/')
        .map(|segment| urlencoding::decode(segment).unwrap().into_owned())
        .collect();
    assert_eq!(decoded.join("/"), key);
}

#[tokio::test]
async fn test_upload_errors_carry_the_key() {
    let mut fs = MockFs::new();
    fs.expect_read_file()
        .returning(|path| Err(BridgeError::OperationFailed(format!("{} missing", path.display()))));

    let http = Arc::new(ScriptedHttp::default());
    let repo = repository(Arc::clone(&http), fs);

    let err = repo
        .upload_media(Path::new("/gone.mp3"), "audios/1_Gone")
        .await
        .unwrap_err();

    match err {
        CatalogError::Upload { key, .. } => assert_eq!(key, "audios/1_Gone"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_add_content_posts_json_and_fills_response() {
    let http = Arc::new(
        ScriptedHttp::default().respond(201, r#"{"id": "srv-1", "createdAt": 1700000000000}"#),
    );
    let repo = repository(Arc::clone(&http), MockFs::new());

    let item = repo.add_content(text_content()).await.unwrap();

    assert_eq!(item.id, "srv-1");
    assert_eq!(item.title, "Pausa activa");
    assert_eq!(item.body.as_deref(), Some("Levántate y estira"));
    assert_eq!(item.created_at.unwrap().timestamp(), 1_700_000_000);

    let request = &http.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    let sent: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(sent["type"], "text");
    assert_eq!(sent["imageUrl"], "https://cdn.example.test/images/1_Pausa_activa");
    assert!(sent.get("contentUrl").is_none());
}

#[tokio::test]
async fn test_add_content_write_failure() {
    let http = Arc::new(ScriptedHttp::default().respond(403, "forbidden"));
    let repo = repository(http, MockFs::new());

    let err = repo.add_content(text_content()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Write(_)));
}
