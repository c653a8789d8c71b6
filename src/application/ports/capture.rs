//! Audio capture port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::CaptureHandle;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Failed to configure audio session: {0}")]
    SessionFailed(String),

    #[error("Failed to prepare recording: {0}")]
    PrepareFailed(String),

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to finalize recording: {0}")]
    FinalizeFailed(String),

    #[error("Unknown capture handle: {0}")]
    UnknownHandle(CaptureHandle),

    #[error("Failed to remove capture file: {0}")]
    CleanupFailed(String),
}

/// Quality preset a capture is prepared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePreset {
    /// 44.1kHz mono, 16-bit
    #[default]
    HighQuality,
    /// 16kHz mono, 16-bit
    LowQuality,
}

impl CapturePreset {
    /// Sample rate the finalized file is written at
    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::HighQuality => 44_100,
            Self::LowQuality => 16_000,
        }
    }
}

/// Audio session options applied before capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Route the microphone to the app
    pub allows_recording: bool,
    /// Keep playback audible when the device is in silent mode
    pub plays_in_silent_mode: bool,
}

impl SessionOptions {
    /// Options used right before a recording starts
    pub const fn for_recording() -> Self {
        Self {
            allows_recording: true,
            plays_in_silent_mode: true,
        }
    }
}

/// Port for microphone capture.
///
/// A handle goes through `prepare` -> `start` -> `stop_and_finalize`.
/// `discard` releases a handle that will never be finalized, and
/// `discard_file` drops a finalized file nobody took ownership of.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Configure the platform audio session for capture
    async fn configure_session(&self, options: SessionOptions) -> Result<(), CaptureError>;

    /// Allocate a capture handle and prepare it with a preset
    async fn prepare(&self, preset: CapturePreset) -> Result<CaptureHandle, CaptureError>;

    /// Begin capturing into a prepared handle
    async fn start(&self, handle: CaptureHandle) -> Result<(), CaptureError>;

    /// Stop capturing, release the handle and return the temporary file it produced
    async fn stop_and_finalize(&self, handle: CaptureHandle) -> Result<PathBuf, CaptureError>;

    /// Release a handle without producing a file
    async fn discard(&self, handle: CaptureHandle) -> Result<(), CaptureError>;

    /// Delete a file returned by `stop_and_finalize`
    async fn discard_file(&self, path: &Path) -> Result<(), CaptureError>;

    /// Container extension of finalized files (without the dot)
    fn container_extension(&self) -> &str;
}

/// Blanket implementation for boxed capture devices
#[async_trait]
impl CaptureDevice for Box<dyn CaptureDevice> {
    async fn configure_session(&self, options: SessionOptions) -> Result<(), CaptureError> {
        self.as_ref().configure_session(options).await
    }

    async fn prepare(&self, preset: CapturePreset) -> Result<CaptureHandle, CaptureError> {
        self.as_ref().prepare(preset).await
    }

    async fn start(&self, handle: CaptureHandle) -> Result<(), CaptureError> {
        self.as_ref().start(handle).await
    }

    async fn stop_and_finalize(&self, handle: CaptureHandle) -> Result<PathBuf, CaptureError> {
        self.as_ref().stop_and_finalize(handle).await
    }

    async fn discard(&self, handle: CaptureHandle) -> Result<(), CaptureError> {
        self.as_ref().discard(handle).await
    }

    async fn discard_file(&self, path: &Path) -> Result<(), CaptureError> {
        self.as_ref().discard_file(path).await
    }

    fn container_extension(&self) -> &str {
        self.as_ref().container_extension()
    }
}
