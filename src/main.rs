//! VoiceMemo CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_memo::cli::{
    app::{load_merged_config, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    session_app::run_session,
};
use voice_memo::domain::config::AppConfig;
use voice_memo::domain::recording::BackendKind;
use voice_memo::infrastructure::{init_logging, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    if let Err(e) = init_logging() {
        presenter.warn(&format!("File logging disabled: {}", e));
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        storage: cli
            .storage
            .map(|s| BackendKind::from(s).as_str().to_string()),
        document_dir: cli.document_dir.clone(),
        autoplay_on_save: if cli.autoplay { Some(true) } else { None },
        require_permission: if cli.ignore_permission {
            Some(false)
        } else {
            None
        },
        remote: None,
    };

    let config = load_merged_config(cli_config).await;
    tracing::info!(
        storage = %config.storage_or_default(),
        autoplay = config.autoplay_on_save_or_default(),
        "Starting session"
    );

    run_session(config, cli.quality.into()).await
}
