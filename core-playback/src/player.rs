//! # Inline Player
//!
//! State machine behind the inline audio widget. Rendering stays in the host;
//! this type owns the widget's handle, its last known engine status and the
//! transitions between states:
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Ready{Paused} ◀──toggle──▶ Ready{Playing}
//!                   │                   │
//!                   └──err──▶ Failed ◀──┘ (load of a new uri may fail)
//! ```
//!
//! Control operations are only valid in `Ready`. When another widget takes
//! over the coordinator, the next operation returns
//! [`PlaybackError::Superseded`] and the widget falls back to `Idle`. A
//! [`PlaybackCoordinator::stop_current`] on this widget's handle shows up
//! as `Ready{Paused}` at the start on the next read.

use crate::coordinator::PlaybackCoordinator;
use crate::error::{PlaybackError, Result};
use crate::format;
use crate::handle::PlaybackHandle;
use bridge_traits::{PlaybackOptions, PlaybackStatus};
use core_runtime::events::PlaybackEvent;
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlayerState {
    Idle,
    Loading,
    Ready { transport: Transport },
    Failed { message: String },
}

impl PlayerState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PlayerState::Ready { .. })
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            PlayerState::Ready {
                transport: Transport::Playing
            }
        )
    }

    fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Loading => "loading",
            PlayerState::Ready {
                transport: Transport::Paused,
            } => "paused",
            PlayerState::Ready {
                transport: Transport::Playing,
            } => "playing",
            PlayerState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a host needs to render the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub uri: Option<String>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub looping: bool,
}

impl PlayerSnapshot {
    /// Position as a fraction of duration, zero while the duration is unknown.
    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) if !duration.is_zero() => {
                (self.position.as_secs_f64() / duration.as_secs_f64()).min(1.0)
            }
            _ => 0.0,
        }
    }

    pub fn time_label(&self) -> String {
        format::time_label(self.position, self.duration)
    }
}

#[derive(Debug)]
struct Inner {
    state: PlayerState,
    handle: Option<PlaybackHandle>,
    uri: Option<String>,
    position: Duration,
    duration: Option<Duration>,
    looping: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            state: PlayerState::Idle,
            handle: None,
            uri: None,
            position: Duration::ZERO,
            duration: None,
            looping: false,
        }
    }
}

impl Inner {
    fn reset(&mut self) {
        self.state = PlayerState::Idle;
        self.handle = None;
        self.position = Duration::ZERO;
        self.duration = None;
    }

    /// Apply a stop the coordinator issued for this widget's handle.
    fn sync_external_stop(&mut self) {
        let stopped = self.handle.as_ref().is_some_and(|h| h.take_stopped());
        if stopped && self.state.is_ready() {
            debug!("Handle stopped by coordinator");
            self.set_transport(Transport::Paused);
            self.position = Duration::ZERO;
        }
    }

    fn set_transport(&mut self, transport: Transport) {
        if self.state.is_ready() {
            self.state = PlayerState::Ready { transport };
        }
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state.clone(),
            uri: self.uri.clone(),
            position: self.position,
            duration: self.duration,
            looping: self.looping,
        }
    }
}

/// Copy of the ready state taken before an engine call.
struct Ready {
    handle: PlaybackHandle,
    playing: bool,
    position: Duration,
    duration: Duration,
}

pub struct InlinePlayer {
    coordinator: Arc<PlaybackCoordinator>,
    inner: Mutex<Inner>,
}

impl InlinePlayer {
    pub fn new(coordinator: Arc<PlaybackCoordinator>) -> Self {
        Self {
            coordinator,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock();
        inner.sync_external_stop();
        inner
    }

    pub fn state(&self) -> PlayerState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.lock().snapshot()
    }

    pub fn handle(&self) -> Option<PlaybackHandle> {
        self.lock().handle.clone()
    }

    pub fn position(&self) -> Duration {
        self.lock().position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.lock().duration
    }

    pub fn is_playing(&self) -> bool {
        self.lock().state.is_playing()
    }

    pub fn is_looping(&self) -> bool {
        self.lock().looping
    }

    pub fn progress_fraction(&self) -> f64 {
        self.snapshot().progress_fraction()
    }

    /// `m:ss / m:ss`
    pub fn time_label(&self) -> String {
        self.snapshot().time_label()
    }

    /// Load `uri`, replacing this widget's previous media.
    ///
    /// On success the widget is `Ready` and paused at the start. On failure
    /// it is `Failed` and the error is returned.
    pub async fn load(&self, uri: &str) -> Result<()> {
        let (previous, looping) = {
            let mut inner = self.lock();
            if inner.state == PlayerState::Loading {
                return Err(PlaybackError::InvalidState {
                    operation: "load",
                    state: inner.state.to_string(),
                });
            }
            let previous = inner.handle.take();
            inner.state = PlayerState::Loading;
            inner.uri = Some(uri.to_string());
            inner.position = Duration::ZERO;
            inner.duration = None;
            (previous, inner.looping)
        };

        if let Some(previous) = previous {
            self.coordinator.release(&previous).await;
        }

        let options = PlaybackOptions {
            should_play: false,
            looping,
            ..PlaybackOptions::default()
        };

        match self.coordinator.load(uri, options).await {
            Ok((handle, status)) => {
                info!(handle = %handle, duration = ?status.duration, "Inline player ready");
                let mut inner = self.lock();
                inner.handle = Some(handle);
                inner.state = PlayerState::Ready {
                    transport: Transport::Paused,
                };
                inner.position = status.position;
                inner.duration = status.duration;
                inner.looping = status.is_looping;
                Ok(())
            }
            Err(e) => {
                error!(uri, error = %e, "Failed to load media");
                self.lock().state = PlayerState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Pause if playing, otherwise play. Finished media restarts from zero.
    ///
    /// Returns whether the widget is now playing.
    pub async fn toggle_play_pause(&self) -> Result<bool> {
        let ready = self.ready("toggle playback")?;

        if ready.playing {
            let result = self.coordinator.pause(&ready.handle).await;
            self.settle(&ready.handle, result)?;
            self.update(&ready.handle, |inner| inner.set_transport(Transport::Paused));
            self.coordinator.emit(PlaybackEvent::Paused {
                handle_id: ready.handle.id(),
                position_ms: ready.position.as_millis() as u64,
            });
            return Ok(false);
        }

        let mut position = ready.position;
        if !ready.duration.is_zero() && ready.position >= ready.duration {
            let result = self.coordinator.seek(&ready.handle, Duration::ZERO).await;
            self.settle(&ready.handle, result)?;
            position = Duration::ZERO;
            self.update(&ready.handle, |inner| inner.position = Duration::ZERO);
        }

        let result = self.coordinator.play(&ready.handle).await;
        self.settle(&ready.handle, result)?;
        self.update(&ready.handle, |inner| inner.set_transport(Transport::Playing));
        self.coordinator.emit(PlaybackEvent::Started {
            handle_id: ready.handle.id(),
            position_ms: position.as_millis() as u64,
        });

        Ok(true)
    }

    /// Move by `delta_seconds`, clamped to `[0, duration]`. Returns the new
    /// position.
    pub async fn skip(&self, delta_seconds: i64) -> Result<Duration> {
        let ready = self.ready("skip")?;

        let duration_ms = ready.duration.as_millis() as i64;
        let target_ms = (ready.position.as_millis() as i64)
            .saturating_add(delta_seconds.saturating_mul(1000))
            .clamp(0, duration_ms);
        let target = Duration::from_millis(target_ms as u64);

        self.seek_to(&ready.handle, target).await?;
        Ok(target)
    }

    /// Jump to `fraction` of the duration, clamped to `[0, 1]`.
    ///
    /// Does nothing while the duration is unknown. Returns the position
    /// after the call.
    pub async fn seek_to_fraction(&self, fraction: f64) -> Result<Duration> {
        let ready = self.ready("seek")?;

        if ready.duration.is_zero() {
            return Ok(ready.position);
        }

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = ready.duration.mul_f64(fraction);

        self.seek_to(&ready.handle, target).await?;
        Ok(target)
    }

    /// Flip looping. Returns the new flag.
    pub async fn toggle_loop(&self) -> Result<bool> {
        let ready = self.ready("toggle looping")?;
        let looping = !self.is_looping();

        let result = self.coordinator.set_looping(&ready.handle, looping).await;
        self.settle(&ready.handle, result)?;
        self.update(&ready.handle, |inner| inner.looping = looping);

        Ok(looping)
    }

    /// Pause and rewind to zero. The media stays loaded.
    pub async fn stop(&self) -> Result<()> {
        let ready = self.ready("stop")?;

        let result = self.coordinator.pause(&ready.handle).await;
        self.settle(&ready.handle, result)?;
        let result = self.coordinator.seek(&ready.handle, Duration::ZERO).await;
        self.settle(&ready.handle, result)?;

        self.update(&ready.handle, |inner| {
            inner.set_transport(Transport::Paused);
            inner.position = Duration::ZERO;
        });
        self.coordinator.emit(PlaybackEvent::Stopped {
            handle_id: ready.handle.id(),
        });

        Ok(())
    }

    /// Apply a status report from the engine.
    ///
    /// Reports may arrive at any cadence and are ignored outside `Ready`.
    pub fn on_status(&self, status: PlaybackStatus) {
        let finished = {
            let mut inner = self.lock();

            let handle = match (&inner.state, &inner.handle) {
                (PlayerState::Ready { .. }, Some(handle)) => handle.clone(),
                _ => return,
            };

            if handle.is_released() {
                debug!(handle = %handle, "Status for superseded handle; resetting player");
                inner.reset();
                return;
            }

            if !status.is_loaded {
                return;
            }

            let finished = status.did_just_finish && !status.is_looping;

            inner.position = status.position;
            if status.duration.is_some() {
                inner.duration = status.duration;
            }
            inner.looping = status.is_looping;
            inner.set_transport(if status.is_playing && !finished {
                Transport::Playing
            } else {
                Transport::Paused
            });

            finished.then(|| handle.id())
        };

        if let Some(handle_id) = finished {
            self.coordinator.emit(PlaybackEvent::Finished { handle_id });
        }
    }

    /// Poll the engine and apply its status, for hosts without status
    /// callbacks.
    pub async fn refresh(&self) -> Result<PlayerSnapshot> {
        let ready = self.ready("refresh")?;

        let result = self.coordinator.status(&ready.handle).await;
        let status = self.settle(&ready.handle, result)?;
        if !status.is_loaded {
            return Err(PlaybackError::Engine(format!(
                "session {} is no longer loaded",
                ready.handle.id()
            )));
        }

        self.on_status(status);
        Ok(self.snapshot())
    }

    /// Release this widget's media and return to `Idle`.
    pub async fn unload(&self) {
        let handle = {
            let mut inner = self.lock();
            let handle = inner.handle.take();
            inner.reset();
            handle
        };

        if let Some(handle) = handle {
            self.coordinator.release(&handle).await;
        }
    }

    fn ready(&self, operation: &'static str) -> Result<Ready> {
        let mut inner = self.lock();

        let (playing, handle) = match (&inner.state, &inner.handle) {
            (PlayerState::Ready { transport }, Some(handle)) => {
                (*transport == Transport::Playing, handle.clone())
            }
            (state, _) => {
                return Err(PlaybackError::InvalidState {
                    operation,
                    state: state.to_string(),
                })
            }
        };

        if handle.is_released() {
            inner.reset();
            return Err(PlaybackError::Superseded(handle.id()));
        }

        Ok(Ready {
            handle,
            playing,
            position: inner.position,
            duration: inner.duration.unwrap_or_default(),
        })
    }

    async fn seek_to(&self, handle: &PlaybackHandle, target: Duration) -> Result<()> {
        let result = self.coordinator.seek(handle, target).await;
        self.settle(handle, result)?;
        self.update(handle, |inner| inner.position = target);
        Ok(())
    }

    /// Mutate state only if `handle` is still this widget's handle.
    fn update(&self, handle: &PlaybackHandle, apply: impl FnOnce(&mut Inner)) {
        let mut inner = self.lock();
        if inner.handle.as_ref() == Some(handle) {
            apply(&mut *inner);
        }
    }

    /// Log engine failures and fall back to `Idle` when superseded.
    fn settle<T>(&self, handle: &PlaybackHandle, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_superseded() {
                debug!(handle = %handle, "Player handle superseded");
                self.update(handle, Inner::reset);
            } else {
                warn!(handle = %handle, error = %e, "Playback control failed");
            }
        }
        result
    }
}
