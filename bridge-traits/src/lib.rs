//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the Bienestar core and
//! platform-specific implementations. Each trait represents a capability that
//! the core requires but that must be implemented differently per platform
//! (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP against the content backend
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Reading picked media for uploads
//!
//! ### Media
//! - [`PlaybackAdapter`](playback::PlaybackAdapter) - Native media engine sessions
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ HTTP + filesystem |
//! | iOS      | Host app (Swift)    | 📋 Planned |
//! | Android  | Host app (Kotlin)   | 📋 Planned |
//!
//! The media engine has no desktop default; every host injects its own
//! [`PlaybackAdapter`](playback::PlaybackAdapter).
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths, HTTP status)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so the core can share them across
//! async tasks behind `Arc`.

pub mod error;
pub mod http;
pub mod playback;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use playback::{
    LoadedSession, MediaSource, PlaybackAdapter, PlaybackOptions, PlaybackRequest,
    PlaybackSessionId, PlaybackStatus,
};
pub use storage::{FileMetadata, FileSystemAccess};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
