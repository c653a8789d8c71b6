//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, RemoteConfig, DEFAULT_REMOTE_ENDPOINT};
