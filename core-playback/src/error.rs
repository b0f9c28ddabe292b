//! # Playback Error Types
//!
//! Errors raised by the coordinator and the inline player.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Operation is not allowed in the player's current state.
    #[error("Cannot {operation} while the player is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// Another player took over the audio session and released this handle.
    #[error("Playback handle {0} was superseded by another player")]
    Superseded(String),

    /// Media could not be loaded by the engine.
    #[error("Failed to load {uri}: {message}")]
    LoadFailed { uri: String, message: String },

    /// The engine reported a state the player cannot act on.
    #[error("Media engine error: {0}")]
    Engine(String),

    /// Control call rejected by the host adapter.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, PlaybackError::Superseded(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
