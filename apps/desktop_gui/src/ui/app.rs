use std::{io, time::Duration};

use client_core::{
    candidate_from_path, candidate_with_declared_type, suggested_file_name, DropZoneIcon,
    StatusView, UploadController, WidgetView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{FileCandidate, Sensitivity},
    error::SelectionError,
    protocol::ProcessOutcome,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};
use crate::ui::surface::GuiSurface;

pub const SETTINGS_STORAGE_KEY: &str = "unmark_gui_settings";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedGuiSettings {
    pub sensitivity: Sensitivity,
}

pub struct UploadApp {
    controller: UploadController<GuiSurface>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
}

impl UploadApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        sensitivity: Sensitivity,
    ) -> Self {
        Self {
            controller: UploadController::new(GuiSurface::default(), sensitivity),
            cmd_tx,
            ui_rx,
            status: String::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ProcessSettled { ticket, outcome } => {
                    self.controller.settle(ticket, outcome);
                }
                UiEvent::DownloadSaved(path) => {
                    self.status = format!("Saved {}", path.display());
                }
                UiEvent::Error(err) => {
                    self.status = err.status_line();
                }
            }
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });

        if hovering {
            self.controller.drag_enter();
        } else {
            self.controller.drag_leave();
        }

        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        match dropped_candidate(file) {
            Ok(candidate) => {
                if let Err(err) = self.controller.drop_files([candidate]) {
                    tracing::debug!(error = %err, "dropped file rejected");
                }
            }
            Err(err) => self.controller.reject_selection(&err),
        }
    }

    fn pick_file(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("PDF", &["pdf"]);
        if let Some(dir) = self.controller.surface().last_directory() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.controller.surface_mut().remember_pick(&path);

        match candidate_from_path(&path) {
            Ok(candidate) => {
                if let Err(err) = self.controller.select_file(candidate) {
                    tracing::debug!(error = %err, "picked file rejected");
                }
            }
            Err(err) => self.controller.reject_selection(&err),
        }
    }

    fn start_processing(&mut self) {
        let Some(request) = self.controller.begin_submit() else {
            return;
        };
        let ticket = request.ticket;
        self.status.clear();
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Process(request),
            &mut self.status,
        ) {
            self.controller
                .settle(ticket, ProcessOutcome::connection_failed());
        }
    }

    fn save_download(&mut self, link: String, service_name: Option<String>) {
        let original_name = self
            .controller
            .selected_file()
            .map(|file| file.name().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        let suggested = suggested_file_name(service_name.as_deref(), &original_name);

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(&suggested)
            .save_file()
        else {
            return;
        };
        self.status = format!("Saving {}...", path.display());
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SaveDownload { link, path },
            &mut self.status,
        );
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        let zone = &view.drop_zone;
        let stroke_color = if zone.highlighted {
            ui.visuals().selection.stroke.color
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };
        let fill = if zone.highlighted {
            ui.visuals().selection.bg_fill.gamma_multiply(0.25)
        } else {
            ui.visuals().extreme_bg_color
        };

        let frame = egui::Frame::NONE
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(24, 28))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(icon_glyph(zone.icon)).size(40.0));
                    ui.label(egui::RichText::new(&zone.title).strong().size(18.0));
                    ui.weak(&zone.subtitle);
                });
            });

        let response = ui.interact(
            frame.response.rect,
            ui.id().with("drop_zone"),
            egui::Sense::click(),
        );
        if zone.interactive && response.clicked() {
            self.pick_file();
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        let mut value = self.controller.sensitivity().value();
        let slider = egui::Slider::new(&mut value, Sensitivity::MIN..=Sensitivity::MAX)
            .step_by(Sensitivity::STEP)
            .fixed_decimals(2)
            .text("Sensitivity");
        if ui.add(slider).changed() {
            self.controller.set_sensitivity(Sensitivity::new(value));
        }

        ui.add_space(8.0);
        let button = egui::Button::new(egui::RichText::new("Remove watermarks").strong())
            .min_size(egui::vec2(200.0, 32.0));
        if ui.add_enabled(view.submit_enabled, button).clicked() {
            self.start_processing();
        }
    }

    fn show_status_area(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        if !view.status.is_visible() {
            return;
        }

        let mut reset_requested = false;
        let mut download_requested = None;
        ui.add_space(12.0);
        egui::Frame::NONE
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(16, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                match &view.status {
                    StatusView::Hidden => {}
                    StatusView::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Processing your PDF...");
                        });
                    }
                    StatusView::Success {
                        download_url,
                        filename,
                        removed_count,
                    } => {
                        ui.label(egui::RichText::new("Watermarks removed").strong());
                        if let Some(count) = removed_count {
                            ui.weak(format!("{count} watermark(s) found and removed."));
                        }
                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!download_url.is_empty(), egui::Button::new("Download"))
                                .clicked()
                            {
                                download_requested = Some((download_url.clone(), filename.clone()));
                            }
                            if ui.button("Process another file").clicked() {
                                reset_requested = true;
                            }
                        });
                    }
                    StatusView::Error { message } => {
                        ui.colored_label(ui.visuals().error_fg_color, message);
                        if ui.button("Try again").clicked() {
                            reset_requested = true;
                        }
                    }
                }
            });

        if let Some((link, service_name)) = download_requested {
            self.save_download(link, service_name);
        }
        if reset_requested {
            self.status.clear();
            self.controller.reset();
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.surface().pending_alert().map(str::to_string) else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.controller.surface_mut().dismiss_alert();
        }
    }
}

impl eframe::App for UploadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let alert_pending = self.controller.surface().pending_alert().is_some();
        if !alert_pending {
            self.handle_file_drops(ctx);
        }

        let view = self.controller.view();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!alert_pending, |ui| {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.set_max_width(520.0);
                    ui.heading("PDF Watermark Remover");
                    ui.weak("Detects text repeated across pages and strips it.");
                    ui.add_space(16.0);
                    self.show_drop_zone(ui, &view);
                    ui.add_space(12.0);
                    self.show_controls(ui, &view);
                    self.show_status_area(ui, &view);
                    if !self.status.is_empty() {
                        ui.add_space(8.0);
                        ui.small(egui::RichText::new(&self.status).weak());
                    }
                });
            });
        });
        self.show_alert(ctx);

        if self.controller.state().is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedGuiSettings {
            sensitivity: self.controller.sensitivity(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

fn icon_glyph(icon: DropZoneIcon) -> &'static str {
    match icon {
        DropZoneIcon::CloudUpload => "📤",
        DropZoneIcon::FilePdf => "📄",
    }
}

/// Native drops usually carry a path; web-style drops carry the bytes and a
/// declared type.
fn dropped_candidate(file: egui::DroppedFile) -> Result<FileCandidate, SelectionError> {
    if let Some(bytes) = file.bytes {
        return Ok(candidate_with_declared_type(
            file.name,
            &file.mime,
            bytes.to_vec(),
        ));
    }
    if let Some(path) = file.path {
        let mut candidate = candidate_from_path(&path)?;
        if !file.mime.trim().is_empty() {
            candidate.mime_type = file.mime.trim().to_string();
        }
        return Ok(candidate);
    }
    Err(SelectionError::Unreadable {
        path: file.name,
        source: io::Error::new(io::ErrorKind::NotFound, "dropped file has no contents"),
    })
}
