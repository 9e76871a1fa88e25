mod backend_bridge;
mod controller;
mod ui;

use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{PersistedGuiSettings, UploadApp, SETTINGS_STORAGE_KEY};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let default_sensitivity = settings.sensitivity;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF Watermark Remover")
            .with_inner_size([640.0, 560.0])
            .with_min_inner_size([480.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "PDF Watermark Remover",
        options,
        Box::new(move |cc| {
            let sensitivity = cc
                .storage
                .and_then(|storage| {
                    storage
                        .get_string(SETTINGS_STORAGE_KEY)
                        .and_then(|text| serde_json::from_str::<PersistedGuiSettings>(&text).ok())
                })
                .map(|persisted| persisted.sensitivity)
                .unwrap_or(default_sensitivity);
            Ok(Box::new(UploadApp::new(cmd_tx, ui_rx, sensitivity)))
        }),
    )
}
