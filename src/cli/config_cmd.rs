//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, RemoteConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::BackendKind;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Write a validated value into the config
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    validate_config_value(key, value)?;

    match key {
        "storage" => config.storage = Some(value.trim().to_lowercase()),
        "document_dir" => config.document_dir = Some(value.to_string()),
        "autoplay_on_save" => config.autoplay_on_save = Some(bool_value(key, value)?),
        "require_permission" => config.require_permission = Some(bool_value(key, value)?),
        "remote.endpoint" | "remote.bucket" | "remote.token" => {
            let remote = config.remote.get_or_insert_with(RemoteConfig::default);
            let slot = match key {
                "remote.endpoint" => &mut remote.endpoint,
                "remote.bucket" => &mut remote.bucket,
                _ => &mut remote.token,
            };
            *slot = Some(value.to_string());
        }
        _ => return check_key(key),
    }
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "remote.token" {
        mask_secret(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

/// Display value of a key; secrets are masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    let remote = config.remote.as_ref();
    match key {
        "storage" => config.storage.clone(),
        "document_dir" => config.document_dir.clone(),
        "autoplay_on_save" => config.autoplay_on_save.map(|b| b.to_string()),
        "require_permission" => config.require_permission.map(|b| b.to_string()),
        "remote.endpoint" => remote.and_then(|r| r.endpoint.clone()),
        "remote.bucket" => remote.and_then(|r| r.bucket.clone()),
        "remote.token" => remote.and_then(|r| r.token.as_deref()).map(mask_secret),
        _ => None,
    }
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "storage" => {
            value
                .parse::<BackendKind>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "autoplay_on_save" | "require_permission" => {
            bool_value(key, value)?;
        }
        "remote.endpoint" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid("Endpoint must be an http(s) URL".to_string()));
            }
        }
        "document_dir" | "remote.bucket" | "remote.token" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Mask a secret for display (show first 4 and last 4 chars)
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
