//! # Playback Coordinator
//!
//! Process-wide owner of the single active playback handle.
//!
//! ## Policy
//!
//! - At most one handle is current. Acquiring a different handle stops and
//!   unloads the previous one before the new one becomes current.
//! - Teardown is best-effort: engine failures while stopping or unloading a
//!   superseded handle are logged and swallowed, and the handle is flagged
//!   released regardless.
//! - Every engine call made on behalf of a widget goes through the
//!   coordinator's mutex, so a superseded widget can never race the widget
//!   that replaced it.
//!
//! ```text
//! widget A ──load──▶ ┌─────────────────────┐
//!                    │ PlaybackCoordinator │──▶ PlaybackAdapter (host engine)
//! widget B ──load──▶ │  current: Option<H> │
//!                    └─────────────────────┘
//!   B's acquire: stop(A) → unload(A) → A released → current = B
//! ```

use crate::error::{PlaybackError, Result};
use crate::handle::PlaybackHandle;
use bridge_traits::{
    MediaSource, PlaybackAdapter, PlaybackOptions, PlaybackRequest, PlaybackStatus,
};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub struct PlaybackCoordinator {
    adapter: Arc<dyn PlaybackAdapter>,
    current: Mutex<Option<PlaybackHandle>>,
    events: Option<EventBus>,
}

impl PlaybackCoordinator {
    pub fn new(adapter: Arc<dyn PlaybackAdapter>) -> Self {
        Self {
            adapter,
            current: Mutex::new(None),
            events: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub(crate) fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.emit(CoreEvent::Playback(event));
        }
    }

    /// Load `uri` in the engine and make the new session current.
    #[instrument(skip(self, options))]
    pub async fn load(
        &self,
        uri: &str,
        options: PlaybackOptions,
    ) -> Result<(PlaybackHandle, PlaybackStatus)> {
        let request = PlaybackRequest::new(MediaSource::from_uri(uri)).with_options(options);

        let loaded = match self.adapter.load(request).await {
            Ok(loaded) => loaded,
            Err(e) => {
                let message = e.to_string();
                self.emit(PlaybackEvent::Failed {
                    uri: Some(uri.to_string()),
                    message: message.clone(),
                });
                return Err(PlaybackError::LoadFailed {
                    uri: uri.to_string(),
                    message,
                });
            }
        };

        let handle = PlaybackHandle::new(loaded.session, uri);
        self.emit(PlaybackEvent::Loaded {
            handle_id: handle.id(),
            uri: uri.to_string(),
            duration_ms: loaded.status.duration.map(|d| d.as_millis() as u64),
        });

        self.acquire(handle.clone()).await?;
        Ok((handle, loaded.status))
    }

    /// Make `handle` the current one, tearing down any different handle.
    ///
    /// Acquiring the handle that is already current does nothing.
    pub async fn acquire(&self, handle: PlaybackHandle) -> Result<()> {
        handle.ensure_live()?;

        let mut current = self.current.lock().await;

        if let Some(previous) = current.take() {
            if previous == handle {
                *current = Some(previous);
                return Ok(());
            }

            self.teardown(&previous).await;
            info!(previous = %previous, next = %handle, "Superseded playback handle");
            self.emit(PlaybackEvent::Superseded {
                handle_id: previous.id(),
            });
        }

        *current = Some(handle);
        Ok(())
    }

    /// Stop the current handle and rewind it. It stays loaded and current.
    pub async fn stop_current(&self) {
        let current = self.current.lock().await;

        if let Some(handle) = current.as_ref() {
            if let Err(e) = self.adapter.stop(handle.session()).await {
                warn!(handle = %handle, error = %e, "Failed to stop current playback");
            }
            if let Err(e) = self.adapter.seek(handle.session(), Duration::ZERO).await {
                warn!(handle = %handle, error = %e, "Failed to rewind current playback");
            }
            handle.mark_stopped();
            self.emit(PlaybackEvent::Stopped {
                handle_id: handle.id(),
            });
        }
    }

    /// Release the current handle, if any.
    pub async fn shutdown(&self) {
        let mut current = self.current.lock().await;

        if let Some(handle) = current.take() {
            self.unload_quietly(&handle).await;
            debug!(handle = %handle, "Released playback handle on shutdown");
        }
    }

    /// Release `handle` on behalf of its owner.
    ///
    /// Clears the current slot if `handle` holds it. Already released
    /// handles are left alone.
    pub async fn release(&self, handle: &PlaybackHandle) {
        let mut current = self.current.lock().await;

        if current.as_ref() == Some(handle) {
            *current = None;
        }

        if !handle.is_released() {
            self.unload_quietly(handle).await;
        }
    }

    pub async fn current(&self) -> Option<PlaybackHandle> {
        self.current.lock().await.clone()
    }

    pub async fn is_current(&self, handle: &PlaybackHandle) -> bool {
        self.current.lock().await.as_ref() == Some(handle)
    }

    pub async fn play(&self, handle: &PlaybackHandle) -> Result<()> {
        let _guard = self.current.lock().await;
        handle.ensure_live()?;
        self.adapter.play(handle.session()).await?;
        Ok(())
    }

    pub async fn pause(&self, handle: &PlaybackHandle) -> Result<()> {
        let _guard = self.current.lock().await;
        handle.ensure_live()?;
        self.adapter.pause(handle.session()).await?;
        Ok(())
    }

    pub async fn seek(&self, handle: &PlaybackHandle, position: Duration) -> Result<()> {
        let _guard = self.current.lock().await;
        handle.ensure_live()?;
        self.adapter.seek(handle.session(), position).await?;
        Ok(())
    }

    pub async fn set_looping(&self, handle: &PlaybackHandle, looping: bool) -> Result<()> {
        let _guard = self.current.lock().await;
        handle.ensure_live()?;
        self.adapter.set_looping(handle.session(), looping).await?;
        Ok(())
    }

    pub async fn status(&self, handle: &PlaybackHandle) -> Result<PlaybackStatus> {
        let _guard = self.current.lock().await;
        handle.ensure_live()?;
        Ok(self.adapter.status(handle.session()).await?)
    }

    /// Stop then unload `handle`, swallowing engine errors.
    async fn teardown(&self, handle: &PlaybackHandle) {
        if handle.is_released() {
            return;
        }

        if let Err(e) = self.adapter.stop(handle.session()).await {
            warn!(handle = %handle, error = %e, "Failed to stop superseded playback");
        }
        if let Err(e) = self.adapter.unload(handle.session()).await {
            warn!(handle = %handle, error = %e, "Failed to unload superseded playback");
        }
        handle.mark_released();
    }

    async fn unload_quietly(&self, handle: &PlaybackHandle) {
        if let Err(e) = self.adapter.unload(handle.session()).await {
            warn!(handle = %handle, error = %e, "Failed to unload playback");
        }
        if handle.mark_released() {
            self.emit(PlaybackEvent::Released {
                handle_id: handle.id(),
            });
        }
    }
}
