//! Interactive recording session runner

use std::process::ExitCode;

use crate::application::ports::{
    CaptureDevice, CapturePreset, PermissionService, PersistenceBackend, Player,
};
use crate::application::{RecordingController, SessionError, Toggled};
use crate::domain::config::AppConfig;
use crate::domain::library::ItemId;
use crate::domain::recording::BackendKind;
use crate::domain::session::RecordingStatus;
use crate::infrastructure::{create_backend, CpalCaptureDevice, CpalPermission, RodioPlayer};

use super::app::{controller_config, EXIT_ERROR, EXIT_SUCCESS};
use super::input::UiCommand;
use super::presenter::Presenter;
use super::signals::{spawn_stdin_reader, SessionSignal, SessionSignalHandler};

/// Run the interactive session until the user quits or a shutdown signal arrives
pub async fn run_session(config: AppConfig, preset: CapturePreset) -> ExitCode {
    let mut presenter = Presenter::new();

    let backend = match create_backend(&config) {
        Ok(backend) => backend,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let controller = RecordingController::new(
        CpalCaptureDevice::new(),
        CpalPermission::new(),
        backend,
        RodioPlayer::new(),
        controller_config(&config, preset),
    );

    presenter.permission(controller.initialize().await);

    let (mut signals, signal_tx) = match SessionSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    spawn_stdin_reader(signal_tx);

    let snapshot = controller.snapshot().await;
    presenter.info(&format!(
        "Storage: {} | Enter: record/stop | h: help | q: quit",
        snapshot.backend
    ));
    if snapshot.backend == BackendKind::Local {
        presenter.info(&format!(
            "Saving to {}",
            config.document_dir_or_default().join("recordings").display()
        ));
    }
    presenter.status_line(snapshot.status);

    if session_loop(&controller, &mut signals, &mut presenter).await {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn session_loop<C, P, B, L>(
    controller: &RecordingController<C, P, B, L>,
    signals: &mut SessionSignalHandler,
    presenter: &mut Presenter,
) -> bool
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    loop {
        let Some(signal) = signals.recv().await else {
            // Channel closed
            return false;
        };

        match signal {
            SessionSignal::Invalid(e) => presenter.warn(&e.to_string()),
            SessionSignal::Command(UiCommand::Toggle) => toggle(controller, presenter).await,
            SessionSignal::Command(UiCommand::List) => {
                presenter.item_list(&controller.snapshot().await.items);
            }
            SessionSignal::Command(UiCommand::Play(position)) => {
                let Some(id) = controller.item_at(position - 1).await else {
                    presenter.warn(&format!("No recording number {}", position));
                    continue;
                };
                match controller.play(id).await {
                    Ok(()) => presenter.info(&format!("Playing recording {}", position)),
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            SessionSignal::Command(UiCommand::Delete(position)) => {
                let Some(id) = controller.item_at(position - 1).await else {
                    presenter.warn(&format!("No recording number {}", position));
                    continue;
                };
                match controller.delete(id).await {
                    Ok(()) => {
                        presenter.success(&format!("Deleted recording {}", position));
                        presenter.item_list(&controller.snapshot().await.items);
                    }
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            SessionSignal::Command(UiCommand::Status) => status(controller, presenter).await,
            SessionSignal::Command(UiCommand::Help) => presenter.help(),
            SessionSignal::Command(UiCommand::Quit) | SessionSignal::Shutdown => {
                return shutdown(controller, presenter).await;
            }
        }
    }
}

async fn file_name_of<C, P, B, L>(controller: &RecordingController<C, P, B, L>, id: ItemId) -> String
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    controller
        .snapshot()
        .await
        .items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.file_name.to_string())
        .unwrap_or_else(|| id.to_string())
}

async fn toggle<C, P, B, L>(controller: &RecordingController<C, P, B, L>, presenter: &mut Presenter)
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    if controller.status().await == RecordingStatus::Recording {
        presenter.start_spinner("Saving recording...");
    }

    match controller.toggle().await {
        Ok(Toggled::Started) => presenter.stop_spinner(),
        Ok(Toggled::Stopped(Some(id))) => {
            let name = file_name_of(controller, id).await;
            presenter.spinner_success(&format!("Saved {}", name));
        }
        Ok(Toggled::Stopped(None)) => presenter.stop_spinner(),
        Err(e) => report_failure(presenter, &e),
    }

    presenter.status_line(controller.status().await);
}

async fn status<C, P, B, L>(controller: &RecordingController<C, P, B, L>, presenter: &Presenter)
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    let snapshot = controller.snapshot().await;
    presenter.status_line(snapshot.status);
    if let Some(elapsed) = controller.recording_elapsed().await {
        presenter.info(&format!("Recording for {}", Presenter::format_elapsed(elapsed)));
    }
    presenter.info(&format!(
        "{} recording(s) | storage: {} | microphone: {}",
        snapshot.items.len(),
        snapshot.backend,
        snapshot.permission
    ));
}

async fn shutdown<C, P, B, L>(
    controller: &RecordingController<C, P, B, L>,
    presenter: &mut Presenter,
) -> bool
where
    C: CaptureDevice,
    P: PermissionService,
    B: PersistenceBackend,
    L: Player,
{
    if controller.status().await == RecordingStatus::Recording {
        presenter.start_spinner("Saving recording before exit...");
    }

    let ok = match controller.shutdown().await {
        Ok(Some(id)) => {
            let name = file_name_of(controller, id).await;
            presenter.spinner_success(&format!("Saved {}", name));
            true
        }
        Ok(None) => {
            presenter.stop_spinner();
            true
        }
        Err(e) => {
            report_failure(presenter, &e);
            false
        }
    };

    presenter.info("Goodbye");
    ok
}

/// Transient notice for a failed action
fn report_failure(presenter: &mut Presenter, error: &SessionError) {
    presenter.spinner_fail("Failed");
    presenter.error(&error.to_string());
}
