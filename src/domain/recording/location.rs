//! Where a recording's bytes are durably stored

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::error::InvalidBackendError;

/// Identifies the persistence backend that stored a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Local,
    Remote,
}

impl BackendKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            _ => Err(InvalidBackendError {
                input: s.to_string(),
            }),
        }
    }
}

/// Durable location of a recording.
///
/// The variant records which backend owns the bytes, so deletion can be
/// routed to the store that actually holds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRef {
    /// File moved into the app-owned recordings directory
    Local { path: PathBuf },
    /// Object uploaded to remote storage
    Remote { key: String, url: String },
}

impl LocationRef {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn remote(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Remote {
            key: key.into(),
            url: url.into(),
        }
    }

    /// Backend that owns this location
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Local { .. } => BackendKind::Local,
            Self::Remote { .. } => BackendKind::Remote,
        }
    }

    /// Local path, if this is a local location
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Local { path } => Some(path),
            Self::Remote { .. } => None,
        }
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => write!(f, "{}", path.display()),
            Self::Remote { url, .. } => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_variant() {
        assert_eq!(LocationRef::local("/tmp/a.flac").backend(), BackendKind::Local);
        assert_eq!(
            LocationRef::remote("recordings/a.flac", "https://x/a").backend(),
            BackendKind::Remote
        );
    }

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("Local".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!(" remote ".parse::<BackendKind>().unwrap(), BackendKind::Remote);
        assert!("s3".parse::<BackendKind>().is_err());
    }

    #[test]
    fn display_shows_path_or_url() {
        assert_eq!(LocationRef::local("/tmp/a.flac").to_string(), "/tmp/a.flac");
        assert_eq!(
            LocationRef::remote("k", "https://host/o/k").to_string(),
            "https://host/o/k"
        );
    }

    #[test]
    fn as_path_only_for_local() {
        assert!(LocationRef::local("/tmp/a").as_path().is_some());
        assert!(LocationRef::remote("k", "u").as_path().is_none());
    }
}
