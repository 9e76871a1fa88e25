use std::path::{Path, PathBuf};

use client_core::{WidgetSurface, WidgetView};

/// Widget surface for an immediate-mode window: keeps the latest view for
/// the next frame and holds a pending alert until it is dismissed.
#[derive(Debug, Default)]
pub struct GuiSurface {
    view: Option<WidgetView>,
    alert: Option<String>,
    last_directory: Option<PathBuf>,
}

impl GuiSurface {
    pub fn pending_alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn rendered(&self) -> Option<&WidgetView> {
        self.view.as_ref()
    }

    /// Directory the picker opens in, kept until the widget is reset.
    pub fn last_directory(&self) -> Option<&Path> {
        self.last_directory.as_deref()
    }

    pub fn remember_pick(&mut self, path: &Path) {
        self.last_directory = path.parent().map(Path::to_path_buf);
    }
}

impl WidgetSurface for GuiSurface {
    fn render(&mut self, view: &WidgetView) {
        self.view = Some(view.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn clear_picker(&mut self) {
        self.last_directory = None;
    }
}
