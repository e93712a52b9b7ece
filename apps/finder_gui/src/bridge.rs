//! Command and event plumbing between the egui thread and the backend worker.

use std::{sync::Arc, thread, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use finder_core::{GithubProfileClient, ProfileSearchController, SearchSnapshot};

use crate::config::Settings;

pub enum BackendCommand {
    Search { username: String },
    SelectFromHistory { username: String },
    RemoveFromHistory { username: String },
    ClearHistory,
    ToggleHistoryVisibility,
}

pub enum UiEvent {
    Info(String),
    BackendFailed(String),
    SnapshotChanged(SearchSnapshot),
}

/// Runs the search controller on its own tokio runtime and shuttles
/// commands in and snapshots out over the crossbeam channels. The thread
/// exits once the GUI side drops its command sender.
pub fn spawn_backend_thread(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let remote = match GithubProfileClient::new(
                settings.api_base_url.clone(),
                Duration::from_secs(settings.request_timeout_secs),
            ) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                        "backend worker startup failure: could not build the API client: {err}"
                    )));
                    tracing::error!("failed to build the github client: {err}");
                    return;
                }
            };
            let controller = ProfileSearchController::new(remote);

            let mut events = controller.subscribe_events();
            let pump_controller = controller.clone();
            let pump_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    tracing::debug!(?event, "bridge: controller state changed");
                    let snapshot = pump_controller.snapshot().await;
                    let _ = pump_tx.try_send(UiEvent::SnapshotChanged(snapshot));
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            let _ = ui_tx.try_send(UiEvent::SnapshotChanged(controller.snapshot().await));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Search { username } => {
                        // Runs as its own task so a follow-up search can
                        // supersede it instead of queueing behind it. The
                        // outcome reaches the GUI through the event pump.
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            let _ = controller.search(&username).await;
                        });
                    }
                    BackendCommand::SelectFromHistory { username } => {
                        controller.select_from_history(&username).await;
                    }
                    BackendCommand::RemoveFromHistory { username } => {
                        controller.remove_from_history(&username).await;
                    }
                    BackendCommand::ClearHistory => {
                        controller.clear_history().await;
                    }
                    BackendCommand::ToggleHistoryVisibility => {
                        controller.toggle_history_visibility().await;
                    }
                }
            }
        });
    });
}
