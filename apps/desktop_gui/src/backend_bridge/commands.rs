//! Backend commands queued from UI to backend worker.

use client_core::ProcessRequest;
use std::path::PathBuf;

pub enum BackendCommand {
    Process(ProcessRequest),
    SaveDownload { link: String, path: PathBuf },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Process(_) => "process",
            Self::SaveDownload { .. } => "save_download",
        }
    }
}
