//! Capture infrastructure module
//!
//! Microphone capture and permission checks via cpal. Finalized
//! recordings are FLAC files.

mod cpal_capture;
mod flac_encoder;
mod permission;

pub use cpal_capture::CpalCaptureDevice;
pub use flac_encoder::{encode_to_flac, EncodingError, FLAC_EXTENSION};
pub use permission::CpalPermission;
