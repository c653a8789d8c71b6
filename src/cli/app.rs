//! Shared app wiring: exit codes and configuration loading

use std::env;

use crate::application::ports::{CapturePreset, ConfigStore};
use crate::application::ControllerConfig;
use crate::domain::config::{AppConfig, RemoteConfig};
use crate::infrastructure::XdgConfigStore;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Environment variable holding the remote storage token
pub const STORAGE_TOKEN_ENV: &str = "VOICE_MEMO_STORAGE_TOKEN";

/// Config layer contributed by the environment
fn env_config(token: Option<String>) -> AppConfig {
    AppConfig {
        remote: token.filter(|t| !t.is_empty()).map(|token| RemoteConfig {
            token: Some(token),
            ..RemoteConfig::default()
        }),
        ..AppConfig::empty()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config(env::var(STORAGE_TOKEN_ENV).ok()))
        .merge(cli_config)
}

/// Controller settings from the merged config
pub fn controller_config(config: &AppConfig, preset: CapturePreset) -> ControllerConfig {
    ControllerConfig {
        preset,
        autoplay_on_save: config.autoplay_on_save_or_default(),
        require_permission: config.require_permission_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_token_lands_in_remote_section() {
        let config = env_config(Some("secret".to_string()));
        assert_eq!(config.remote_token(), Some("secret"));
        assert!(config.storage.is_none());
    }

    #[test]
    fn empty_env_token_is_ignored() {
        assert!(env_config(Some(String::new())).remote.is_none());
        assert!(env_config(None).remote.is_none());
    }

    #[test]
    fn env_token_keeps_file_bucket() {
        let file = AppConfig {
            remote: Some(RemoteConfig {
                bucket: Some("memos".to_string()),
                ..RemoteConfig::default()
            }),
            ..AppConfig::empty()
        };

        let merged = AppConfig::defaults()
            .merge(file)
            .merge(env_config(Some("secret".to_string())));

        assert_eq!(merged.remote_bucket(), Some("memos"));
        assert_eq!(merged.remote_token(), Some("secret"));
    }

    #[test]
    fn controller_config_follows_merged_values() {
        let config = AppConfig {
            autoplay_on_save: Some(true),
            require_permission: Some(false),
            ..AppConfig::defaults()
        };

        let controller = controller_config(&config, CapturePreset::LowQuality);
        assert_eq!(controller.preset, CapturePreset::LowQuality);
        assert!(controller.autoplay_on_save);
        assert!(!controller.require_permission);
    }

    #[test]
    fn controller_config_defaults() {
        let controller = controller_config(&AppConfig::defaults(), CapturePreset::HighQuality);
        assert!(!controller.autoplay_on_save);
        assert!(controller.require_permission);
    }
}
