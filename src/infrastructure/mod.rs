//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces, integrating
//! with the microphone, audio output, the local disk and a remote object
//! store.

pub mod capture;
pub mod config;
pub mod logging;
pub mod playback;
pub mod storage;

// Re-export adapters
pub use capture::{CpalCaptureDevice, CpalPermission};
pub use config::XdgConfigStore;
pub use logging::init_logging;
pub use playback::RodioPlayer;
pub use storage::{create_backend, HttpObjectStore, TokioFileStore};
