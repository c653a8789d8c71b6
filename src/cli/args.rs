//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::ports::CapturePreset;
use crate::domain::recording::BackendKind;

/// VoiceMemo - record, keep, replay and delete voice memos
#[derive(Parser, Debug)]
#[command(name = "voice-memo")]
#[command(version)]
#[command(about = "Record voice memos from the microphone, then replay or delete them")]
#[command(long_about = None)]
pub struct Cli {
    /// Where recordings are stored
    #[arg(short = 's', long, value_name = "BACKEND")]
    pub storage: Option<StorageArg>,

    /// Document directory; recordings go to its recordings/ folder
    #[arg(long, value_name = "DIR")]
    pub document_dir: Option<String>,

    /// Replay each recording once it has been saved
    #[arg(short = 'a', long)]
    pub autoplay: bool,

    /// Try to record even if microphone access looks denied
    #[arg(long)]
    pub ignore_permission: bool,

    /// Capture quality
    #[arg(short = 'Q', long, value_name = "PRESET", default_value = "high")]
    pub quality: QualityArg,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Storage argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Local,
    Remote,
}

impl From<StorageArg> for BackendKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Local => BackendKind::Local,
            StorageArg::Remote => BackendKind::Remote,
        }
    }
}

/// Capture quality argument
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    #[default]
    High,
    Low,
}

impl From<QualityArg> for CapturePreset {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::High => CapturePreset::HighQuality,
            QualityArg::Low => CapturePreset::LowQuality,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "storage",
    "document_dir",
    "autoplay_on_save",
    "require_permission",
    "remote.endpoint",
    "remote.bucket",
    "remote.token",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["voice-memo"]);
        assert!(cli.storage.is_none());
        assert!(cli.document_dir.is_none());
        assert!(!cli.autoplay);
        assert!(!cli.ignore_permission);
        assert_eq!(cli.quality, QualityArg::High);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_storage() {
        let cli = Cli::parse_from(["voice-memo", "-s", "remote"]);
        assert_eq!(cli.storage, Some(StorageArg::Remote));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "voice-memo",
            "-a",
            "--ignore-permission",
            "--document-dir",
            "/tmp/memos",
            "-Q",
            "low",
        ]);
        assert!(cli.autoplay);
        assert!(cli.ignore_permission);
        assert_eq!(cli.document_dir, Some("/tmp/memos".to_string()));
        assert_eq!(cli.quality, QualityArg::Low);
    }

    #[test]
    fn cli_rejects_unknown_storage() {
        assert!(Cli::try_parse_from(["voice-memo", "--storage", "cloud"]).is_err());
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["voice-memo", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-memo", "config", "set", "storage", "remote"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "storage");
            assert_eq!(value, "remote");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn args_convert_to_domain_values() {
        assert_eq!(BackendKind::from(StorageArg::Local), BackendKind::Local);
        assert_eq!(CapturePreset::from(QualityArg::Low), CapturePreset::LowQuality);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("storage"));
        assert!(is_valid_config_key("remote.bucket"));
        assert!(!is_valid_config_key("remote"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
