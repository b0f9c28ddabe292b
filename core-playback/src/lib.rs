//! # Playback Module
//!
//! Single-active-playback policy and the inline player state machine.
//!
//! ## Overview
//!
//! This module handles:
//! - `PlaybackHandle`: one loaded engine session plus a shared released flag
//! - `PlaybackCoordinator`: owns the current handle and stops/unloads the
//!   previous one whenever another handle is acquired
//! - `InlinePlayer`: Idle/Loading/Ready/Failed state machine driving the
//!   host's `PlaybackAdapter` through the coordinator
//! - `m:ss` time labels
//!
//! The media engine itself lives in the host and is reached only through
//! `bridge_traits::PlaybackAdapter`.

pub mod coordinator;
pub mod error;
pub mod format;
pub mod handle;
pub mod player;

pub use coordinator::PlaybackCoordinator;
pub use error::{PlaybackError, Result};
pub use format::{format_time, time_label};
pub use handle::PlaybackHandle;
pub use player::{InlinePlayer, PlayerSnapshot, PlayerState, Transport};
