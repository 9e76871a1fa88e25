//! Widget state and the single render function derived from it.

use shared::{domain::SelectedFile, error::UploadFailure};

pub const DEFAULT_DROP_ZONE_TITLE: &str = "Upload your PDF";
pub const DEFAULT_DROP_ZONE_SUBTITLE: &str = "Drag & drop or browse files";

/// Identifies one submission so a late settlement cannot overwrite a newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FileChosen,
    Submitting {
        ticket: SubmissionTicket,
    },
    Success {
        download_url: String,
        filename: Option<String>,
        removed_count: Option<u64>,
    },
    Error {
        failure: UploadFailure,
    },
}

impl UploadState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// States from which the process action may start, given a selected file.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::FileChosen | Self::Error { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZoneIcon {
    CloudUpload,
    FilePdf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZoneView {
    pub icon: DropZoneIcon,
    pub title: String,
    pub subtitle: String,
    pub interactive: bool,
    pub highlighted: bool,
}

/// Contents of the status area. One variant, so at most one panel is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    Hidden,
    Loading,
    Success {
        download_url: String,
        filename: Option<String>,
        removed_count: Option<u64>,
    },
    Error {
        message: String,
    },
}

impl StatusView {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub drop_zone: DropZoneView,
    pub submit_enabled: bool,
    pub status: StatusView,
}

pub fn render(
    state: &UploadState,
    selected: Option<&SelectedFile>,
    drag_active: bool,
) -> WidgetView {
    let interactive = !state.is_submitting();
    let drop_zone = match selected {
        Some(file) => DropZoneView {
            icon: DropZoneIcon::FilePdf,
            title: file.name().to_string(),
            subtitle: file.size_label(),
            interactive,
            highlighted: interactive && drag_active,
        },
        None => DropZoneView {
            icon: DropZoneIcon::CloudUpload,
            title: DEFAULT_DROP_ZONE_TITLE.to_string(),
            subtitle: DEFAULT_DROP_ZONE_SUBTITLE.to_string(),
            interactive,
            highlighted: interactive && drag_active,
        },
    };

    let status = match state {
        UploadState::Idle | UploadState::FileChosen => StatusView::Hidden,
        UploadState::Submitting { .. } => StatusView::Loading,
        UploadState::Success {
            download_url,
            filename,
            removed_count,
        } => StatusView::Success {
            download_url: download_url.clone(),
            filename: filename.clone(),
            removed_count: *removed_count,
        },
        UploadState::Error { failure } => StatusView::Error {
            message: failure.message.clone(),
        },
    };

    WidgetView {
        drop_zone,
        submit_enabled: selected.is_some() && state.accepts_submit(),
        status,
    }
}
