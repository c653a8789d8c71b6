//! Recording session controller
//!
//! Owns the single active recording and the library of saved recordings,
//! and wires user actions (toggle, play, delete) to the capture device,
//! the persistence backend and the player.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::library::{ItemId, Library, RecordedItem};
use crate::domain::recording::{BackendKind, CaptureHandle, RecordingFileName};
use crate::domain::session::{
    InvalidStateTransition, PermissionState, RecordingSession, RecordingStatus,
};

use super::permission_gate::PermissionGate;
use super::ports::{
    CaptureDevice, CaptureError, CapturePreset, Clock, DeleteError, PermissionError,
    PermissionService, PersistenceBackend, PersistenceError, PlaybackError, Player,
    SessionOptions, SystemClock,
};

/// Errors from controller operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Saving recording failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Delete failed: {0}")]
    Delete(#[from] DeleteError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("No recording with id {0}")]
    ItemNotFound(ItemId),
}

/// Controller settings
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Preset every capture is prepared with
    pub preset: CapturePreset,
    /// Replay a recording as soon as it has been saved
    pub autoplay_on_save: bool,
    /// Refuse to start capturing when microphone access was denied
    pub require_permission: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            preset: CapturePreset::HighQuality,
            autoplay_on_save: false,
            require_permission: true,
        }
    }
}

/// What a toggle press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Started,
    /// Stopped; carries the new item if the recording was saved
    Stopped(Option<ItemId>),
}

/// Immutable view of the controller for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: RecordingStatus,
    pub permission: PermissionState,
    pub backend: BackendKind,
    pub items: Vec<RecordedItem>,
}

struct ActiveRecording {
    handle: CaptureHandle,
    started_at: Instant,
}

struct RecorderState {
    session: RecordingSession,
    active: Option<ActiveRecording>,
}

struct LibraryState {
    library: Library,
    deleting: HashSet<ItemId>,
}

/// Recording session controller.
///
/// The recorder lock is held for the whole of a start or stop, so presses
/// arriving while one is in flight wait for it instead of racing it.
/// The library lock only guards mutations; deletes of different items run
/// concurrently.
pub struct RecordingController<C, P, B, L>
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    capture: C,
    permission: PermissionGate<P>,
    backend: B,
    player: L,
    clock: Box<dyn Clock>,
    recorder: Mutex<RecorderState>,
    library: Mutex<LibraryState>,
    config: ControllerConfig,
}

impl<C, P, B, L> RecordingController<C, P, B, L>
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    /// Create a new controller instance
    pub fn new(capture: C, permission: P, backend: B, player: L, config: ControllerConfig) -> Self {
        Self {
            capture,
            permission: PermissionGate::new(permission),
            backend,
            player,
            clock: Box::new(SystemClock),
            recorder: Mutex::new(RecorderState {
                session: RecordingSession::new(),
                active: None,
            }),
            library: Mutex::new(LibraryState {
                library: Library::new(),
                deleting: HashSet::new(),
            }),
            config,
        }
    }

    /// Replace the clock used for file names and item ids
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Request microphone access. Only the first call reaches the platform.
    pub async fn initialize(&self) -> PermissionState {
        self.permission.initialize().await
    }

    /// Get current recording status
    pub async fn status(&self) -> RecordingStatus {
        self.recorder.lock().await.session.status()
    }

    /// Time since the active recording started
    pub async fn recording_elapsed(&self) -> Option<Duration> {
        self.recorder
            .lock()
            .await
            .active
            .as_ref()
            .map(|active| active.started_at.elapsed())
    }

    /// Snapshot of status and library for rendering
    pub async fn snapshot(&self) -> SessionSnapshot {
        let status = self.status().await;
        let items = self.library.lock().await.library.items().to_vec();
        SessionSnapshot {
            status,
            permission: self.permission.state(),
            backend: self.backend.kind(),
            items,
        }
    }

    /// Id of the item at a zero-based list position
    pub async fn item_at(&self, index: usize) -> Option<ItemId> {
        self.library.lock().await.library.at(index).map(|item| item.id)
    }

    /// Record button: stop if a recording is active, start otherwise.
    ///
    /// The decision and the transition happen under one lock, so two quick
    /// presses always resolve to a start followed by a stop.
    pub async fn toggle(&self) -> Result<Toggled, SessionError> {
        let mut recorder = self.recorder.lock().await;
        if recorder.active.is_some() {
            let outcome = self.stop_locked(&mut recorder).await;
            drop(recorder);
            self.after_stop(outcome).await.map(Toggled::Stopped)
        } else {
            let result = self.start_locked(&mut recorder).await;
            if let Err(e) = &result {
                error!(error = %e, "Failed to start recording");
            }
            result.map(|()| Toggled::Started)
        }
    }

    /// Start a new recording.
    ///
    /// On failure the status is left unchanged.
    pub async fn start(&self) -> Result<(), SessionError> {
        let mut recorder = self.recorder.lock().await;
        let result = self.start_locked(&mut recorder).await;
        if let Err(e) = &result {
            error!(error = %e, "Failed to start recording");
        }
        result
    }

    async fn start_locked(&self, recorder: &mut RecorderState) -> Result<(), SessionError> {
        recorder.session.can_begin()?;

        match self.permission.state() {
            PermissionState::Granted => {
                self.capture
                    .configure_session(SessionOptions::for_recording())
                    .await?;
            }
            PermissionState::Denied if self.config.require_permission => {
                return Err(PermissionError::Denied.into());
            }
            // Let the device itself decide
            _ => {}
        }

        let handle = self.capture.prepare(self.config.preset).await?;
        if let Err(e) = self.capture.start(handle).await {
            if let Err(discard) = self.capture.discard(handle).await {
                warn!(%handle, error = %discard, "Failed to release capture handle");
            }
            return Err(e.into());
        }

        recorder.session.begin()?;
        recorder.active = Some(ActiveRecording {
            handle,
            started_at: Instant::now(),
        });
        info!(%handle, "Recording started");
        Ok(())
    }

    /// Stop the active recording and save it.
    ///
    /// A no-op returning `Ok(None)` when nothing is recording. Whether or
    /// not saving succeeds, the status becomes `Stopped` and the active
    /// recording is released; only a successful save adds an item.
    pub async fn stop(&self) -> Result<Option<ItemId>, SessionError> {
        let outcome = {
            let mut recorder = self.recorder.lock().await;
            self.stop_locked(&mut recorder).await
        };
        self.after_stop(outcome).await
    }

    async fn stop_locked(
        &self,
        recorder: &mut RecorderState,
    ) -> Result<Option<ItemId>, SessionError> {
        if !recorder.session.is_recording() {
            debug!("Stop requested while not recording");
            return Ok(None);
        }
        let Some(active) = recorder.active.take() else {
            debug!("Stop requested without an active recording");
            return Ok(None);
        };

        info!(handle = %active.handle, "Stopping recording");
        let outcome = self.finalize_and_save(active.handle).await;
        recorder.session.finish()?;
        outcome.map(Some)
    }

    /// Autoplay and error logging once the recorder lock is released
    async fn after_stop(
        &self,
        outcome: Result<Option<ItemId>, SessionError>,
    ) -> Result<Option<ItemId>, SessionError> {
        match outcome {
            Ok(Some(id)) => {
                if self.config.autoplay_on_save {
                    // Playback problems don't undo a successful save
                    let _ = self.play(id).await;
                }
                Ok(Some(id))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                error!(error = %e, "Failed to stop recording");
                Err(e)
            }
        }
    }

    async fn finalize_and_save(&self, handle: CaptureHandle) -> Result<ItemId, SessionError> {
        let temp_file = self.capture.stop_and_finalize(handle).await?;

        let now = self.clock.now_millis();
        let file_name = RecordingFileName::new(now, self.capture.container_extension());
        let location = match self.backend.persist(&temp_file, &file_name).await {
            Ok(location) => location,
            Err(e) => {
                if let Err(cleanup) = self.capture.discard_file(&temp_file).await {
                    warn!(path = %temp_file.display(), error = %cleanup, "Failed to remove unsaved capture");
                }
                return Err(e.into());
            }
        };

        let playback = match self.player.load(&location).await {
            Ok(playback) => playback,
            Err(e) => {
                // Don't leave an object behind that no item points to
                if let Err(cleanup) = self.backend.remove(&location).await {
                    warn!(%location, error = %cleanup, "Failed to remove unplayable recording");
                }
                return Err(PersistenceError::Load(e).into());
            }
        };

        let id = self
            .library
            .lock()
            .await
            .library
            .append(now, file_name.clone(), location, playback);
        info!(%id, file = %file_name, "Recording added to library");
        Ok(id)
    }

    /// Replay a recorded item from the start
    pub async fn play(&self, id: ItemId) -> Result<(), SessionError> {
        let result = self.try_play(id).await;
        if let Err(e) = &result {
            error!(%id, error = %e, "Failed to replay audio");
        }
        result
    }

    async fn try_play(&self, id: ItemId) -> Result<(), SessionError> {
        let playback = self
            .library
            .lock()
            .await
            .library
            .get(id)
            .map(|item| item.playback)
            .ok_or(SessionError::ItemNotFound(id))?;

        self.player.replay(playback).await?;
        debug!(%id, "Replaying recording");
        Ok(())
    }

    /// Delete a recorded item: release playback, delete the stored bytes,
    /// then drop it from the library.
    ///
    /// On failure the item stays in the library.
    pub async fn delete(&self, id: ItemId) -> Result<(), SessionError> {
        let result = self.try_delete(id).await;
        if let Err(e) = &result {
            error!(%id, error = %e, "Failed to delete audio");
        }
        result.map_err(SessionError::from)
    }

    async fn try_delete(&self, id: ItemId) -> Result<(), DeleteError> {
        let item = {
            let mut state = self.library.lock().await;
            let item = state
                .library
                .get(id)
                .cloned()
                .ok_or(DeleteError::ItemNotFound(id))?;
            if !state.deleting.insert(id) {
                return Err(DeleteError::InProgress(id));
            }
            item
        };

        let result = self.release_and_remove(&item).await;

        let mut state = self.library.lock().await;
        state.deleting.remove(&id);
        result?;
        state.library.remove(id);
        info!(%id, file = %item.file_name, "Recording deleted");
        Ok(())
    }

    async fn release_and_remove(&self, item: &RecordedItem) -> Result<(), DeleteError> {
        let was_loaded = self.player.is_loaded(item.playback);
        if was_loaded {
            self.player.unload(item.playback).await?;
        }

        if let Err(e) = self.backend.remove(&item.location).await {
            if was_loaded {
                self.reload(item).await;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Best-effort reload so an item that survived a failed delete stays playable
    async fn reload(&self, item: &RecordedItem) {
        match self.player.load(&item.location).await {
            Ok(playback) => {
                self.library
                    .lock()
                    .await
                    .library
                    .replace_playback(item.id, playback);
            }
            Err(e) => {
                warn!(id = %item.id, error = %e, "Failed to reload recording after failed delete");
            }
        }
    }

    /// Teardown: finish an in-progress recording so the capture handle isn't leaked
    pub async fn shutdown(&self) -> Result<Option<ItemId>, SessionError> {
        if self.recorder.lock().await.active.is_none() {
            return Ok(None);
        }
        info!("Stopping active recording before shutdown");
        self.stop().await
    }
}
