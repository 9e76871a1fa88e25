use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::Sensitivity;
use tracing::{debug, warn};

pub const SETTINGS_FILE_NAME: &str = "unmark.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub sensitivity: Sensitivity,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            sensitivity: Sensitivity::default(),
            request_timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    sensitivity: Option<Sensitivity>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the first settings file found, then environment overrides.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = settings_file_candidates().into_iter().find(|path| path.exists()) {
        match read_settings_file(&path) {
            Ok(file_cfg) => {
                debug!(path = %path.display(), "loaded settings file");
                apply_file_settings(&mut settings, file_cfg);
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "ignoring settings file");
            }
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("unmark").join(SETTINGS_FILE_NAME));
    }
    candidates
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.sensitivity {
        settings.sensitivity = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
}

/// `UNMARK_*` names first, then `APP__*` names, the latter winning.
fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    for name in ["UNMARK_SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = lookup(name).filter(|v| !v.trim().is_empty()) {
            settings.server_url = v;
        }
    }

    for name in ["UNMARK_SENSITIVITY", "APP__SENSITIVITY"] {
        if let Some(v) = lookup(name) {
            match v.trim().parse::<f64>() {
                Ok(parsed) => settings.sensitivity = Sensitivity::new(parsed),
                Err(_) => warn!(variable = name, value = %v, "ignoring non-numeric sensitivity"),
            }
        }
    }

    for name in ["UNMARK_TIMEOUT_SECS", "APP__TIMEOUT_SECS"] {
        if let Some(v) = lookup(name) {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                settings.request_timeout_secs = Some(parsed);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
