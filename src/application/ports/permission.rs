//! Microphone permission port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::PermissionState;

/// Permission errors
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("Microphone access was denied")]
    Denied,

    #[error("Failed to request microphone access: {0}")]
    RequestFailed(String),
}

/// Port for the platform's audio-capture authorization
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Ask for microphone access.
    ///
    /// # Returns
    /// `Granted` or `Denied` as reported by the platform
    async fn request(&self) -> Result<PermissionState, PermissionError>;
}

/// Blanket implementation for boxed permission services
#[async_trait]
impl PermissionService for Box<dyn PermissionService> {
    async fn request(&self) -> Result<PermissionState, PermissionError> {
        self.as_ref().request().await
    }
}
