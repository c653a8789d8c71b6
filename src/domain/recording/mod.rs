//! Recording domain module

mod file_name;
mod handle;
mod location;

pub use file_name::{RecordingFileName, FILE_NAME_PREFIX, RECORDINGS_NAMESPACE};
pub use handle::{CaptureHandle, PlaybackHandle};
pub use location::{BackendKind, LocationRef};
