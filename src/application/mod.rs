//! Application layer - Use cases and port interfaces
//!
//! Contains the recording session controller, the persistence backend
//! variants and the trait definitions for external system interactions.

pub mod controller;
pub mod permission_gate;
pub mod persistence;
pub mod ports;

// Re-export use cases
pub use controller::{
    ControllerConfig, RecordingController, SessionError, SessionSnapshot, Toggled,
};
pub use permission_gate::PermissionGate;
pub use persistence::{LocalPersistence, RemotePersistence};
