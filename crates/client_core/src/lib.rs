//! Client side of the PDF watermark remover: the upload widget controller,
//! its render model, and the HTTP transport to the processing service.

pub mod config;
pub mod controller;
pub mod download;
pub mod files;
pub mod state;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use controller::{UploadController, WidgetSurface};
pub use download::{suggested_file_name, DownloadError};
pub use files::{candidate_from_path, candidate_with_declared_type};
pub use state::{
    DropZoneIcon, DropZoneView, StatusView, SubmissionTicket, UploadState, WidgetView,
};
pub use transport::{
    outcome_from_result, HttpProcessTransport, ProcessReply, ProcessRequest, ProcessTransport,
    TransportError,
};
