//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod clock;
pub mod config;
pub mod permission;
pub mod player;
pub mod storage;

// Re-export common types
pub use capture::{CaptureDevice, CaptureError, CapturePreset, SessionOptions};
pub use clock::{Clock, SystemClock};
pub use config::ConfigStore;
pub use permission::{PermissionError, PermissionService};
pub use player::{PlaybackError, Player};
pub use storage::{
    DeleteError, FileStore, FileStoreError, ObjectStore, ObjectStoreError, PersistenceBackend,
    PersistenceError,
};
