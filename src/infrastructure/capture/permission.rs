//! Microphone permission adapter
//!
//! Desktop hosts have no consent prompt; access counts as granted when the
//! host exposes a default input device.

use async_trait::async_trait;
use cpal::traits::HostTrait;

use crate::application::ports::{PermissionError, PermissionService};
use crate::domain::session::PermissionState;

/// Permission service backed by cpal device discovery
pub struct CpalPermission;

impl CpalPermission {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalPermission {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionService for CpalPermission {
    async fn request(&self) -> Result<PermissionState, PermissionError> {
        let has_input =
            tokio::task::spawn_blocking(|| cpal::default_host().default_input_device().is_some())
                .await
                .map_err(|e| PermissionError::RequestFailed(format!("Task join error: {}", e)))?;

        Ok(if has_input {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        })
    }
}
