//! Recording file name value object

use std::fmt;

/// Prefix shared by every saved recording
pub const FILE_NAME_PREFIX: &str = "recording-";

/// Namespace under which recordings live, both on disk and in object storage
pub const RECORDINGS_NAMESPACE: &str = "recordings";

/// Value object for `recording-<millisecond-epoch>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingFileName {
    timestamp_ms: u64,
    extension: String,
    value: String,
}

impl RecordingFileName {
    /// Build a file name from a capture timestamp and a container extension.
    /// A leading dot on the extension is ignored.
    pub fn new(timestamp_ms: u64, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_string();
        let value = format!("{}{}.{}", FILE_NAME_PREFIX, timestamp_ms, extension);
        Self {
            timestamp_ms,
            extension,
            value,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Path-style key used for the object store (`recordings/<file name>`)
    pub fn object_key(&self) -> String {
        format!("{}/{}", RECORDINGS_NAMESPACE, self.value)
    }
}

impl fmt::Display for RecordingFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
