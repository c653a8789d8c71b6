//! Playback port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{LocationRef, PlaybackHandle};

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to load audio: {0}")]
    LoadFailed(String),

    #[error("Failed to replay audio: {0}")]
    ReplayFailed(String),

    #[error("Audio output not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Playback handle is not loaded: {0}")]
    NotLoaded(PlaybackHandle),
}

/// Port for loading and replaying recordings
#[async_trait]
pub trait Player: Send + Sync {
    /// Load a recording without starting playback
    async fn load(&self, location: &LocationRef) -> Result<PlaybackHandle, PlaybackError>;

    /// Play a loaded recording from the start.
    ///
    /// Replays are independent: calling this again while audio is still
    /// playing starts another playback.
    async fn replay(&self, handle: PlaybackHandle) -> Result<(), PlaybackError>;

    /// Release a loaded recording
    async fn unload(&self, handle: PlaybackHandle) -> Result<(), PlaybackError>;

    /// Check whether a handle is still loaded
    fn is_loaded(&self, handle: PlaybackHandle) -> bool;
}

/// Blanket implementation for boxed players
#[async_trait]
impl Player for Box<dyn Player> {
    async fn load(&self, location: &LocationRef) -> Result<PlaybackHandle, PlaybackError> {
        self.as_ref().load(location).await
    }

    async fn replay(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        self.as_ref().replay(handle).await
    }

    async fn unload(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        self.as_ref().unload(handle).await
    }

    fn is_loaded(&self, handle: PlaybackHandle) -> bool {
        self.as_ref().is_loaded(handle)
    }
}
