//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::BackendKind;

/// Default REST endpoint for the remote object store
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0";

/// Remote object store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub token: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: Option<String>,
    pub document_dir: Option<String>,
    pub autoplay_on_save: Option<bool>,
    pub require_permission: Option<bool>,
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            storage: Some("local".to_string()),
            document_dir: None,
            autoplay_on_save: Some(false),
            require_permission: Some(true),
            remote: Some(RemoteConfig {
                endpoint: Some(DEFAULT_REMOTE_ENDPOINT.to_string()),
                bucket: None,
                token: None,
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            storage: other.storage.or(self.storage),
            document_dir: other.document_dir.or(self.document_dir),
            autoplay_on_save: other.autoplay_on_save.or(self.autoplay_on_save),
            require_permission: other.require_permission.or(self.require_permission),
            remote: Self::merge_remote_config(self.remote, other.remote),
        }
    }

    /// Merge remote config sections
    fn merge_remote_config(
        base: Option<RemoteConfig>,
        other: Option<RemoteConfig>,
    ) -> Option<RemoteConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(RemoteConfig {
                endpoint: o.endpoint.or(b.endpoint),
                bucket: o.bucket.or(b.bucket),
                token: o.token.or(b.token),
            }),
        }
    }

    /// Get storage backend, or local if not set/invalid
    pub fn storage_or_default(&self) -> BackendKind {
        self.storage
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(BackendKind::Local)
    }

    /// Get the document directory; recordings are kept in its `recordings/` child.
    ///
    /// Falls back to the platform data directory, then the working directory.
    pub fn document_dir_or_default(&self) -> PathBuf {
        match self.document_dir.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("voice-memo"),
        }
    }

    /// Get autoplay-on-save setting, or false if not set
    pub fn autoplay_on_save_or_default(&self) -> bool {
        self.autoplay_on_save.unwrap_or(false)
    }

    /// Get require-permission setting, or true if not set
    pub fn require_permission_or_default(&self) -> bool {
        self.require_permission.unwrap_or(true)
    }

    /// Get the remote endpoint, or the default endpoint if not set
    pub fn remote_endpoint_or_default(&self) -> &str {
        self.remote
            .as_ref()
            .and_then(|r| r.endpoint.as_deref())
            .unwrap_or(DEFAULT_REMOTE_ENDPOINT)
    }

    pub fn remote_bucket(&self) -> Option<&str> {
        self.remote.as_ref().and_then(|r| r.bucket.as_deref())
    }

    pub fn remote_token(&self) -> Option<&str> {
        self.remote.as_ref().and_then(|r| r.token.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.storage, Some("local".to_string()));
        assert_eq!(config.autoplay_on_save, Some(false));
        assert_eq!(config.require_permission, Some(true));
        assert_eq!(config.remote_endpoint_or_default(), DEFAULT_REMOTE_ENDPOINT);
        assert!(config.remote_bucket().is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.storage.is_none());
        assert!(config.document_dir.is_none());
        assert!(config.autoplay_on_save.is_none());
        assert!(config.remote.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            storage: Some("local".to_string()),
            document_dir: Some("/base".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            storage: Some("remote".to_string()),
            document_dir: None,
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.storage, Some("remote".to_string()));
        assert_eq!(merged.document_dir, Some("/base".to_string()));
    }

    #[test]
    fn merge_remote_config_field_by_field() {
        let base = AppConfig {
            remote: Some(RemoteConfig {
                endpoint: Some("http://base".to_string()),
                bucket: Some("base-bucket".to_string()),
                token: None,
            }),
            ..Default::default()
        };
        let other = AppConfig {
            remote: Some(RemoteConfig {
                token: Some("secret".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.remote_endpoint_or_default(), "http://base");
        assert_eq!(merged.remote_bucket(), Some("base-bucket"));
        assert_eq!(merged.remote_token(), Some("secret"));
    }

    #[test]
    fn storage_or_default_parses() {
        let config = AppConfig {
            storage: Some("remote".to_string()),
            ..Default::default()
        };
        assert_eq!(config.storage_or_default(), BackendKind::Remote);
    }

    #[test]
    fn storage_or_default_uses_local_on_invalid() {
        let config = AppConfig {
            storage: Some("floppy".to_string()),
            ..Default::default()
        };
        assert_eq!(config.storage_or_default(), BackendKind::Local);
    }

    #[test]
    fn document_dir_uses_configured_value() {
        let config = AppConfig {
            document_dir: Some("/data/memos".to_string()),
            ..Default::default()
        };
        assert_eq!(config.document_dir_or_default(), PathBuf::from("/data/memos"));
    }

    #[test]
    fn document_dir_default_is_app_scoped() {
        let dir = AppConfig::empty().document_dir_or_default();
        assert!(dir.ends_with("voice-memo"));
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(!config.autoplay_on_save_or_default());
        assert!(config.require_permission_or_default());
    }
}
