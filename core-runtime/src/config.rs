//! # Core Configuration Module
//!
//! Provides configuration management for the Bienestar core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary dependencies and settings for the core library.
//! It enforces fail-fast validation to ensure all required bridges are provided
//! before initialization.
//!
//! ## Required Dependencies
//!
//! - `api_base_url` - Root of the content backend (`{api}/api/app/content`)
//! - `PlaybackAdapter` - The host's native media engine
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `FileSystemAccess` - Reading picked media (desktop default: tokio fs)
//! - `Clock` - Time source (default: `SystemClock`)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for
//! `HttpClient` and `FileSystemAccess` are injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://bienestar.example.com")
//!     .playback_adapter(Arc::new(MyMediaEngine::new()))
//!     .event_buffer_size(256)
//!     .build()?;
//! ```
//!
//! Hosts that ship the API URL through the environment can start from
//! [`CoreConfig::from_env`], which reads `BIENESTAR_API_URL` and optionally
//! `BIENESTAR_EVENT_BUFFER`.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, FileSystemAccess, HttpClient, PlaybackAdapter, SystemClock};
use std::sync::Arc;

/// Environment variable holding the content backend base URL.
pub const API_URL_ENV: &str = "BIENESTAR_API_URL";

/// Environment variable overriding the event bus buffer size.
pub const EVENT_BUFFER_ENV: &str = "BIENESTAR_EVENT_BUFFER";

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the Bienestar core.
///
/// This struct holds all dependencies and settings required to initialize
/// the core library. Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Base URL of the content backend, without trailing slash
    pub api_base_url: String,

    /// HTTP client for the content API
    pub http_client: Arc<dyn HttpClient>,

    /// File system access for reading media picked for upload
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Native media engine (required)
    pub playback_adapter: Arc<dyn PlaybackAdapter>,

    /// Time source used for upload keys and in-memory timestamps
    pub clock: Arc<dyn Clock>,

    /// Capacity of the core event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("playback_adapter", &"PlaybackAdapter { ... }")
            .field("clock", &"Clock { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Creates a builder pre-populated from the process environment.
    ///
    /// The playback adapter still has to be supplied by the host.
    pub fn from_env() -> Result<CoreConfigBuilder> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CoreConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<CoreConfigBuilder>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup(API_URL_ENV).ok_or_else(|| {
            Error::Config(format!(
                "{} is not set. Export the content backend URL or use CoreConfig::builder().",
                API_URL_ENV
            ))
        })?;

        let mut builder = Self::builder().api_base_url(api_base_url);

        if let Some(raw) = lookup(EVENT_BUFFER_ENV) {
            let size = raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    EVENT_BUFFER_ENV, raw
                ))
            })?;
            builder = builder.event_buffer_size(size);
        }

        Ok(builder)
    }

    /// Full URL of a path under the content backend.
    ///
    /// ```
    /// # use core_runtime::config::CoreConfig;
    /// # fn demo(config: &CoreConfig) {
    /// let url = config.endpoint("/api/app/content");
    /// # }
    /// ```
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - API base URL is not empty and uses http(s)
    /// - Event buffer size is reasonable (> 0 and <= 10,000)
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

fn playback_adapter_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlaybackAdapter".to_string(),
        message: "PlaybackAdapter implementation is required to play lessons. \
                 iOS: wrap AVPlayer. Android: wrap ExoPlayer. \
                 Desktop: inject the shell's audio backend."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new()
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the content API. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Mobile: inject URLSession/OkHttp-backed clients."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    Ok(Arc::new(TokioFileSystem::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "FileSystemAccess implementation is required to read media for uploads. \
                 Desktop: enable the 'desktop-shims' feature to use TokioFileSystem. \
                 Mobile: inject a picker-aware file reader."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    playback_adapter: Option<Arc<dyn PlaybackAdapter>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the content backend base URL (required).
    ///
    /// A trailing slash is stripped.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = Some(url.trim().trim_end_matches('/').to_string());
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system implementation.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the media engine (required).
    pub fn playback_adapter(mut self, adapter: Arc<dyn PlaybackAdapter>) -> Self {
        self.playback_adapter = Some(adapter);
        self
    }

    /// Overrides the time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if:
    /// - The API base URL or playback adapter is missing
    /// - A bridge without platform default is missing
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let api_base_url = self.api_base_url.ok_or_else(|| {
            Error::Config("API base URL is required. Use .api_base_url() to set it.".to_string())
        })?;

        let playback_adapter = self
            .playback_adapter
            .ok_or_else(playback_adapter_missing_error)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let config = CoreConfig {
            api_base_url,
            http_client,
            file_system,
            playback_adapter,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
