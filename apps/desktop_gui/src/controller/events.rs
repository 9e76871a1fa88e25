//! UI/backend events and error modeling for the desktop window.

use std::path::PathBuf;

use client_core::SubmissionTicket;
use shared::protocol::ProcessOutcome;

pub enum UiEvent {
    ProcessSettled {
        ticket: SubmissionTicket,
        outcome: ProcessOutcome,
    },
    DownloadSaved(PathBuf),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Download,
}

/// Failures outside the widget's own error panel, shown on the status line.
#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn status_line(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => format!("Backend unavailable: {}", self.message),
            UiErrorContext::Download => format!("Download failed: {}", self.message),
        }
    }
}
