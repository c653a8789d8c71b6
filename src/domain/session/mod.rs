//! Recording session domain module

mod permission;
mod status;

pub use permission::PermissionState;
pub use status::{InvalidStateTransition, RecordingSession, RecordingStatus};
