//! Playback handles.
//!
//! A handle names one loaded engine session. Clones share the released flag,
//! so once the coordinator tears a session down every widget still holding a
//! clone sees it as released and stops issuing engine calls. Clones also
//! share a stop flag the coordinator raises when it stops the session from
//! outside the widget (sign-out), so the owning widget can catch up.

use crate::error::{PlaybackError, Result};
use bridge_traits::PlaybackSessionId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    session: PlaybackSessionId,
    uri: Arc<str>,
    released: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl PlaybackHandle {
    pub fn new(session: PlaybackSessionId, uri: impl Into<Arc<str>>) -> Self {
        Self {
            session,
            uri: uri.into(),
            released: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> PlaybackSessionId {
        self.session
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Session id as used in events and logs.
    pub fn id(&self) -> String {
        self.session.to_string()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Flag the session as released. Returns `false` if it already was.
    pub(crate) fn mark_released(&self) -> bool {
        !self.released.swap(true, Ordering::SeqCst)
    }

    /// Record that the session was stopped and rewound outside its widget.
    pub(crate) fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Consume a pending external stop.
    pub(crate) fn take_stopped(&self) -> bool {
        self.stopped.swap(false, Ordering::SeqCst)
    }

    /// Fail with [`PlaybackError::Superseded`] once released.
    pub fn ensure_live(&self) -> Result<()> {
        if self.is_released() {
            Err(PlaybackError::Superseded(self.id()))
        } else {
            Ok(())
        }
    }
}

impl PartialEq for PlaybackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session
    }
}

impl Eq for PlaybackHandle {}

impl fmt::Display for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.session, self.uri)
    }
}
