use thiserror::Error;

pub const NOT_PDF_ALERT: &str = "Please upload a PDF file.";
pub const CONNECT_FAILURE_MESSAGE: &str = "Failed to connect to the server.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The request never produced a usable response.
    Network,
    /// The service answered but did not report success.
    Application,
}

/// What the error panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl UploadFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorCode::Network, CONNECT_FAILURE_MESSAGE)
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{name} is not a PDF (declared type {mime_type:?})")]
    NotPdf { name: String, mime_type: String },
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SelectionError {
    /// Text for the blocking alert shown instead of a state change.
    pub fn alert_message(&self) -> String {
        match self {
            Self::NotPdf { .. } => NOT_PDF_ALERT.to_string(),
            Self::Unreadable { path, .. } => format!("Could not read {path}."),
        }
    }
}
