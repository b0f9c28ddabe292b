//! # Event Bus System
//!
//! Provides an event-driven architecture for the Bienestar core using `tokio::sync::broadcast`.
//! This module enables decoupled communication between core modules through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ Auth Manager ├────────────>│           │
//! └──────────────┘             │           │
//! ┌──────────────┐    emit     │ EventBus  │    subscribe    ┌──────────────┐
//! │ Catalog      ├────────────>│ (broadcast├────────────────>│ Host UI      │
//! └──────────────┘             │  channel) │                 └──────────────┘
//! ┌──────────────┐    emit     │           │    subscribe    ┌──────────────┐
//! │ Favorites    ├────────────>│           ├────────────────>│ Analytics    │
//! └──────────────┘             │           │                 └──────────────┘
//! ┌──────────────┐    emit     │           │
//! │ Playback     ├────────────>│           │
//! └──────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, FavoritesEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Favorites(FavoritesEvent::Added {
//!         content_id: "respiracion-478".to_string(),
//!     }))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Favorites(_)));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Emitting with no subscribers returns an error. Core modules ignore it:
//! events are advisory and nothing in the core depends on delivery.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Authentication and profile events
    Auth(AuthEvent),
    /// Catalog retrieval and admin upload events
    Catalog(CatalogEvent),
    /// Favorite membership changes
    Favorites(FavoritesEvent),
    /// Media playback events
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Catalog(e) => e.description(),
            CoreEvent::Favorites(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Catalog(CatalogEvent::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Catalog(CatalogEvent::UploadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Catalog(CatalogEvent::Loaded { rejected, .. }) if *rejected > 0 => {
                EventSeverity::Warning
            }
            CoreEvent::Playback(PlaybackEvent::Superseded { .. }) => EventSeverity::Warning,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Auth(AuthEvent::Registered { .. }) => EventSeverity::Info,
            CoreEvent::Catalog(CatalogEvent::ContentAdded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events related to authentication and the user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Existing account signed in.
    SignedIn { uid: String },
    /// New account created and signed in.
    Registered { uid: String },
    /// Display name changed from the profile screen.
    ProfileUpdated { uid: String, display_name: String },
    /// Session ended.
    SignedOut { uid: Option<String> },
    /// Provider rejected an operation.
    AuthError { message: String },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::Registered { .. } => "Account registered",
            AuthEvent::ProfileUpdated { .. } => "Profile updated",
            AuthEvent::SignedOut { .. } => "User signed out",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

// ============================================================================
// Catalog Events
// ============================================================================

/// Events emitted by the content repository and the admin upload flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CatalogEvent {
    /// Content list fetched. `rejected` counts malformed records skipped.
    Loaded { count: usize, rejected: usize },
    /// Content list could not be fetched; callers saw an empty list.
    LoadFailed { message: String },
    /// A media or image file reached blob storage.
    MediaUploaded { key: String, url: String },
    /// A new content record was created.
    ContentAdded {
        content_id: String,
        title: String,
        content_type: String,
    },
    /// Admin submission failed after validation.
    UploadFailed { message: String },
}

impl CatalogEvent {
    fn description(&self) -> &str {
        match self {
            CatalogEvent::Loaded { .. } => "Catalog loaded",
            CatalogEvent::LoadFailed { .. } => "Catalog load failed",
            CatalogEvent::MediaUploaded { .. } => "Media uploaded",
            CatalogEvent::ContentAdded { .. } => "Content added",
            CatalogEvent::UploadFailed { .. } => "Content upload failed",
        }
    }
}

// ============================================================================
// Favorites Events
// ============================================================================

/// Membership changes in the favorites set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum FavoritesEvent {
    Added { content_id: String },
    Removed { content_id: String },
}

impl FavoritesEvent {
    fn description(&self) -> &str {
        match self {
            FavoritesEvent::Added { .. } => "Added to favorites",
            FavoritesEvent::Removed { .. } => "Removed from favorites",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events related to media playback. `handle_id` is the engine session id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// Media finished loading and is paused at zero.
    Loaded {
        handle_id: String,
        uri: String,
        duration_ms: Option<u64>,
    },
    /// Playback started or resumed.
    Started { handle_id: String, position_ms: u64 },
    /// Playback paused.
    Paused { handle_id: String, position_ms: u64 },
    /// Playback stopped and rewound; the media stays loaded.
    Stopped { handle_id: String },
    /// End of media reached without looping.
    Finished { handle_id: String },
    /// Another player took over; this handle was released.
    Superseded { handle_id: String },
    /// Handle released on unload or shutdown.
    Released { handle_id: String },
    /// Loading or engine control failed.
    Failed { uri: Option<String>, message: String },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Loaded { .. } => "Media loaded",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::Finished { .. } => "Playback finished",
            PlaybackEvent::Superseded { .. } => "Playback superseded",
            PlaybackEvent::Released { .. } => "Media released",
            PlaybackEvent::Failed { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventSeverity, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let errors = EventStream::new(event_bus.subscribe())
///     .filter(|event| event.severity() >= EventSeverity::Error);
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
