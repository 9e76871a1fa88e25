//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{outcome_from_result, ClientSettings, HttpProcessTransport, ProcessTransport};
use crossbeam_channel::{Receiver, Sender};
use shared::protocol::ProcessOutcome;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let transport =
            match HttpProcessTransport::new(&settings.server_url, settings.request_timeout()) {
                Ok(transport) => {
                    tracing::info!(endpoint = %transport.endpoint(), "backend worker ready");
                    Some(transport)
                }
                Err(err) => {
                    tracing::error!(error = %err, "processing client unavailable");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    None
                }
            };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Process(request) => {
                        let ticket = request.ticket;
                        let outcome = match &transport {
                            Some(transport) => {
                                outcome_from_result(transport.process(request).await)
                            }
                            None => ProcessOutcome::connection_failed(),
                        };
                        if ui_tx
                            .send(UiEvent::ProcessSettled { ticket, outcome })
                            .is_err()
                        {
                            break;
                        }
                    }
                    BackendCommand::SaveDownload { link, path } => {
                        let Some(transport) = &transport else {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                                UiErrorContext::Download,
                                "processing client unavailable",
                            )));
                            continue;
                        };
                        let result = match transport.download(&link).await {
                            Ok(bytes) => tokio::fs::write(&path, bytes)
                                .await
                                .map_err(|err| format!("failed to write '{}': {err}", path.display())),
                            Err(err) => Err(err.to_string()),
                        };
                        let event = match result {
                            Ok(()) => UiEvent::DownloadSaved(path),
                            Err(message) => {
                                tracing::warn!(%message, "download failed");
                                UiEvent::Error(UiError::new(UiErrorContext::Download, message))
                            }
                        };
                        let _ = ui_tx.try_send(event);
                    }
                }
            }
            tracing::debug!("backend command queue closed");
        });
    });
}
