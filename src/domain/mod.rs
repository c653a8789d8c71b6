//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod library;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use library::{ItemId, Library, RecordedItem};
pub use recording::{BackendKind, LocationRef, RecordingFileName};
pub use session::{PermissionState, RecordingSession, RecordingStatus};
