//! One-time microphone permission check

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::domain::session::PermissionState;

use super::ports::PermissionService;

/// Requests microphone access once and remembers the answer.
///
/// There is no re-prompt: later calls to `initialize` return the cached state.
pub struct PermissionGate<P: PermissionService> {
    service: P,
    state: OnceCell<PermissionState>,
}

impl<P: PermissionService> PermissionGate<P> {
    pub fn new(service: P) -> Self {
        Self {
            service,
            state: OnceCell::new(),
        }
    }

    /// Request access if that has not happened yet.
    /// A failed request counts as a denial.
    pub async fn initialize(&self) -> PermissionState {
        *self
            .state
            .get_or_init(|| async {
                match self.service.request().await {
                    Ok(PermissionState::Granted) => {
                        info!("Audio recording permission granted");
                        PermissionState::Granted
                    }
                    Ok(state) => {
                        warn!(%state, "Audio recording permission not granted");
                        state
                    }
                    Err(e) => {
                        error!(error = %e, "Audio recording permission request failed");
                        PermissionState::Denied
                    }
                }
            })
            .await
    }

    /// Current state; `Unknown` until `initialize` completes
    pub fn state(&self) -> PermissionState {
        self.state.get().copied().unwrap_or_default()
    }
}
