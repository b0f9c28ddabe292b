//! Playback bridge traits and supporting media types.
//!
//! The core never decodes media itself. Hosts hand it a [`PlaybackAdapter`]
//! wrapping the platform's native media engine (AVPlayer, ExoPlayer, a
//! desktop decoder), and the core drives loaded sessions through it: play,
//! pause, seek, loop, stop, unload. Session state flows back either through
//! [`PlaybackAdapter::status`] polling or through host status callbacks that
//! carry a [`PlaybackStatus`].

use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// High-level media source descriptor provided to playback adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Local file accessible to the host runtime.
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) resource to be fetched by the host.
    RemoteStream {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl MediaSource {
    /// Build a source from a URI as stored on content records.
    ///
    /// `file://` URIs and bare paths map to [`MediaSource::LocalFile`];
    /// everything else is treated as a remote stream.
    pub fn from_uri(uri: &str) -> Self {
        if let Some(path) = uri.strip_prefix("file://") {
            return MediaSource::LocalFile {
                path: PathBuf::from(path),
            };
        }

        if uri.starts_with('/') {
            return MediaSource::LocalFile {
                path: PathBuf::from(uri),
            };
        }

        MediaSource::RemoteStream {
            url: uri.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaSource::RemoteStream { .. })
    }
}

/// Additional playback options supplied alongside a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    /// Start playing as soon as the source is loaded.
    pub should_play: bool,
    /// Whether playback should loop automatically.
    pub looping: bool,
    /// Requested interval between host status callbacks.
    pub status_interval: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            should_play: false,
            looping: false,
            status_interval: Duration::from_millis(500),
        }
    }
}

/// Unique identifier for playback sessions managed by a host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackSessionId(Uuid);

impl PlaybackSessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlaybackSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a loaded session as reported by the media engine.
///
/// `duration` is `None` while the engine has not determined it (live streams,
/// partially buffered remote files). Consumers must treat that the same as a
/// zero duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub is_looping: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Set on the first status after the end of media was reached.
    pub did_just_finish: bool,
}

impl PlaybackStatus {
    /// Status for a freshly loaded, paused session.
    pub fn loaded(duration: Option<Duration>) -> Self {
        Self {
            is_loaded: true,
            duration,
            ..Self::default()
        }
    }
}

/// Request describing the playback session a host adapter should provision.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    /// Source to feed into the adapter.
    pub source: MediaSource,
    /// Playback options such as auto-play or looping.
    pub options: PlaybackOptions,
}

impl PlaybackRequest {
    /// Construct a new playback request with default options.
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            options: PlaybackOptions::default(),
        }
    }

    /// Attach playback options to the request.
    pub fn with_options(mut self, options: PlaybackOptions) -> Self {
        self.options = options;
        self
    }
}

/// Session returned by [`PlaybackAdapter::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedSession {
    pub session: PlaybackSessionId,
    pub status: PlaybackStatus,
}

/// Trait for platform-specific playback adapters that drive native media engines.
#[async_trait::async_trait]
pub trait PlaybackAdapter: Send + Sync {
    /// Load a media source. Implementations may allocate native resources,
    /// configure audio routes, or start buffering. Returns the session
    /// identifier that subsequent control calls reference, plus the initial
    /// status (duration when already known).
    async fn load(&self, request: PlaybackRequest) -> Result<LoadedSession>;

    /// Begin or resume playback for the provided session.
    async fn play(&self, session: PlaybackSessionId) -> Result<()>;

    /// Pause playback without releasing the session.
    async fn pause(&self, session: PlaybackSessionId) -> Result<()>;

    /// Stop playback. The session stays loaded.
    async fn stop(&self, session: PlaybackSessionId) -> Result<()>;

    /// Seek to an absolute position within the media.
    async fn seek(&self, session: PlaybackSessionId, position: Duration) -> Result<()>;

    /// Enable or disable looping for the session.
    async fn set_looping(&self, session: PlaybackSessionId, looping: bool) -> Result<()>;

    /// Fetch the adapter's current view of the session.
    async fn status(&self, session: PlaybackSessionId) -> Result<PlaybackStatus>;

    /// Release resources associated with a playback session.
    async fn unload(&self, session: PlaybackSessionId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_options_default_values() {
        let opts = PlaybackOptions::default();
        assert!(!opts.should_play);
        assert!(!opts.looping);
        assert_eq!(opts.status_interval, Duration::from_millis(500));
    }

    #[test]
    fn session_id_is_unique() {
        let a = PlaybackSessionId::new();
        let b = PlaybackSessionId::new();
        assert_ne!(a, b);
        assert_eq!(a, PlaybackSessionId::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn media_source_from_uri() {
        assert!(MediaSource::from_uri("https://cdn.example.com/calma.mp3").is_remote());
        assert_eq!(
            MediaSource::from_uri("file:///tmp/calma.mp3"),
            MediaSource::LocalFile {
                path: PathBuf::from("/tmp/calma.mp3")
            }
        );
        assert!(!MediaSource::from_uri("/var/mobile/calma.m4a").is_remote());
    }

    #[test]
    fn loaded_status_is_paused() {
        let status = PlaybackStatus::loaded(Some(Duration::from_secs(120)));
        assert!(status.is_loaded);
        assert!(!status.is_playing);
        assert_eq!(status.position, Duration::ZERO);
    }
}
